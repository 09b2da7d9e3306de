use nih_plug::prelude::*;
use std::sync::Arc;

pub mod biquad;
pub mod lfo;
pub mod params;
pub mod processor;
pub mod store;

pub use crate::biquad::peak_coefficients;
pub use crate::lfo::Lfo;
pub use crate::params::{LfoPeakParams, ParamId, ParameterSet, ParameterSource};
pub use crate::processor::{modulated_frequency, BlockStatus, PeakModulator, StreamConfig};
pub use crate::store::AtomicParameterStore;

/// A peak filter with its center frequency swept by an LFO. The host shell only reads the
/// parameters once per block and hands the buffer to [`PeakModulator`].
pub struct LfoPeakFilter {
    params: Arc<LfoPeakParams>,
    engine: PeakModulator,
    /// Channels that carry signal. Outputs past this are cleared each block.
    num_input_channels: usize,
}

impl Default for LfoPeakFilter {
    fn default() -> Self {
        Self {
            params: Arc::new(LfoPeakParams::default()),
            engine: PeakModulator::new(),
            num_input_channels: 0,
        }
    }
}

impl Plugin for LfoPeakFilter {
    const NAME: &'static str = "LFO Peak Filter";
    const VENDOR: &'static str = "Kakeru3";
    const URL: &'static str = env!("CARGO_PKG_HOMEPAGE");
    const EMAIL: &'static str = "info@example.com";

    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // Input and output always share the same channel set
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),
            ..AudioIOLayout::const_default()
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),
            ..AudioIOLayout::const_default()
        },
    ];

    // The filter is redesigned once per block, splitting blocks at automation points buys nothing
    const SAMPLE_ACCURATE_AUTOMATION: bool = false;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let num_outputs = audio_io_layout
            .main_output_channels
            .map(NonZeroU32::get)
            .unwrap_or(0) as usize;
        self.num_input_channels = audio_io_layout
            .main_input_channels
            .map(NonZeroU32::get)
            .unwrap_or(0) as usize;

        if num_outputs == 0 {
            nih_error!("Refusing a layout without main outputs");
            return false;
        }

        self.engine.prepare(StreamConfig {
            sample_rate: buffer_config.sample_rate as f64,
            max_block_size: buffer_config.max_buffer_size as usize,
            num_channels: num_outputs,
        });

        true
    }

    fn reset(&mut self) {
        self.engine.reset();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        let params = ParameterSet::read_from(self.params.as_ref());
        self.engine
            .process_block(buffer.as_slice(), self.num_input_channels, &params);

        ProcessStatus::Normal
    }
}

impl ClapPlugin for LfoPeakFilter {
    const CLAP_ID: &'static str = "com.kakeru3.lfo-peak-filter";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("Peak filter with an LFO-modulated center frequency");
    const CLAP_MANUAL_URL: Option<&'static str> = Some(Self::URL);
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Filter,
        ClapFeature::Equalizer,
        ClapFeature::Stereo,
        ClapFeature::Mono,
    ];
}

impl Vst3Plugin for LfoPeakFilter {
    const VST3_CLASS_ID: [u8; 16] = *b"LfoPeakFilterKk3";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Filter];
}

nih_export_clap!(LfoPeakFilter);
nih_export_vst3!(LfoPeakFilter);
