use nih_plug::prelude::*;

use crate::biquad::{peak_coefficients, ChannelFilter, CoefficientBank};
use crate::lfo::Lfo;
use crate::params::{ParameterSet, MAX_FREQUENCY_HZ, MIN_FREQUENCY_HZ};

/// What the host told us when the stream (re)started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamConfig {
    pub sample_rate: f64,
    pub max_block_size: usize,
    pub num_channels: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStatus {
    Processed,
    /// `prepare()` has not been called yet, the buffer was left as is.
    Unprepared,
}

/// Center frequency after modulation, kept inside the range the filter is designed for.
pub fn modulated_frequency(base_hz: f64, lfo_offset_hz: f64) -> f64 {
    (base_hz + lfo_offset_hz).clamp(MIN_FREQUENCY_HZ as f64, MAX_FREQUENCY_HZ as f64)
}

/// Peak filter whose center frequency is swept by a sine LFO.
///
/// Coefficients and the LFO update once per block rather than once per sample. Everything that
/// allocates happens in [`prepare()`][Self::prepare()]; [`process_block()`][Self::process_block()]
/// is safe to call from the audio thread.
pub struct PeakModulator {
    stream: Option<StreamConfig>,
    // one per channel, sized in `prepare()`
    filters: Vec<ChannelFilter>,
    coefficients: CoefficientBank,
    lfo: Lfo,
    last_frequency: f64,
}

impl PeakModulator {
    pub fn new() -> Self {
        Self {
            stream: None,
            filters: Vec::new(),
            coefficients: CoefficientBank::new(),
            lfo: Lfo::new(),
            last_frequency: ParameterSet::default().center_frequency,
        }
    }

    /// Starts a new stream. Rebuilds the per-channel state and resets the LFO phase and all
    /// delay registers.
    pub fn prepare(&mut self, config: StreamConfig) {
        nih_log!(
            "Preparing peak modulator: {} Hz, {} samples max, {} channels",
            config.sample_rate,
            config.max_block_size,
            config.num_channels
        );

        self.filters.clear();
        self.filters
            .resize_with(config.num_channels, ChannelFilter::new);
        self.stream = Some(config);

        let defaults = ParameterSet::default();
        self.lfo.reset();
        self.lfo.set_rate(defaults.lfo_rate, config.sample_rate);
        self.install_design(config.sample_rate, defaults.center_frequency, &defaults);
    }

    /// Clears the LFO phase and the filter memory without touching the stream setup.
    pub fn reset(&mut self) {
        self.lfo.reset();
        for filter in self.filters.iter_mut() {
            filter.reset();
        }
    }

    pub fn is_prepared(&self) -> bool {
        self.stream.is_some()
    }

    pub fn stream_config(&self) -> Option<StreamConfig> {
        self.stream
    }

    /// Filters one block in place.
    ///
    /// `channels` holds every output channel; only the first `num_input_channels` carry signal
    /// and any channel after those is silenced.
    pub fn process_block(
        &mut self,
        channels: &mut [&mut [f32]],
        num_input_channels: usize,
        params: &ParameterSet,
    ) -> BlockStatus {
        let Some(stream) = self.stream else {
            return BlockStatus::Unprepared;
        };

        let active_channels = num_input_channels
            .min(channels.len())
            .min(self.filters.len());
        for channel in channels[active_channels..].iter_mut() {
            channel.fill(0.0);
        }

        let num_samples = channels.first().map_or(0, |channel| channel.len());
        nih_debug_assert!(channels.iter().all(|channel| channel.len() == num_samples));
        if num_samples == 0 {
            return BlockStatus::Processed;
        }

        self.lfo.set_rate(params.lfo_rate, stream.sample_rate);
        let frequency =
            modulated_frequency(params.center_frequency, self.lfo.sample(params.lfo_depth));
        self.install_design(stream.sample_rate, frequency, params);

        let coefficients = self.coefficients.active();
        for (channel, filter) in channels[..active_channels]
            .iter_mut()
            .zip(self.filters.iter_mut())
        {
            filter.set_coefficients(coefficients);
            filter.process_slice(channel);
        }

        self.lfo.advance(num_samples);

        BlockStatus::Processed
    }

    fn install_design(&mut self, sample_rate: f64, frequency: f64, params: &ParameterSet) {
        self.coefficients.install(peak_coefficients(
            sample_rate,
            frequency,
            params.resonance,
            params.output_gain,
        ));
        self.last_frequency = frequency;
    }

    /// Center frequency the current coefficients were designed at.
    pub fn current_frequency(&self) -> f64 {
        self.last_frequency
    }

    pub fn lfo_phase(&self) -> f64 {
        self.lfo.phase()
    }
}

impl Default for PeakModulator {
    fn default() -> Self {
        Self::new()
    }
}
