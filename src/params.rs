use nih_plug::prelude::*;

/// Stable identifiers of the five automatable parameters. The strings double as the nih_plug
/// parameter ids and as the keys of the saved state, so they must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    FilterFreq,
    FilterResonance,
    LfoDepth,
    LfoRate,
    FilterGain,
}

impl ParamId {
    pub const ALL: [ParamId; 5] = [
        ParamId::FilterFreq,
        ParamId::FilterResonance,
        ParamId::LfoDepth,
        ParamId::LfoRate,
        ParamId::FilterGain,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParamId::FilterFreq => "FILTER_FREQ",
            ParamId::FilterResonance => "FILTER_RESONANCE",
            ParamId::LfoDepth => "LFO_DEPTH",
            ParamId::LfoRate => "LFO_RATE",
            ParamId::FilterGain => "FILTER_GAIN",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|param| param.as_str() == id)
    }

    /// Display name shown by the host.
    pub fn name(self) -> &'static str {
        match self {
            ParamId::FilterFreq => "Filter Frequency",
            ParamId::FilterResonance => "Filter Resonance",
            ParamId::LfoDepth => "LFO Depth",
            ParamId::LfoRate => "LFO Rate",
            ParamId::FilterGain => "Filter Gain",
        }
    }

    /// Declared `(min, max)` range in plain units.
    pub fn range(self) -> (f32, f32) {
        match self {
            ParamId::FilterFreq => (MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ),
            ParamId::FilterResonance => (0.1, 10.0),
            ParamId::LfoDepth => (0.0, 1000.0),
            ParamId::LfoRate => (0.1, 20.0),
            ParamId::FilterGain => (0.0, 10.0),
        }
    }

    pub fn default_value(self) -> f32 {
        match self {
            ParamId::FilterFreq => 1000.0,
            ParamId::FilterResonance => 1.0,
            ParamId::LfoDepth => 100.0,
            ParamId::LfoRate => 5.0,
            ParamId::FilterGain => 1.0,
        }
    }

    pub fn clamp(self, value: f32) -> f32 {
        let (min, max) = self.range();
        value.clamp(min, max)
    }
}

/// Lowest center frequency the filter is ever designed at, modulation included.
pub const MIN_FREQUENCY_HZ: f32 = 20.0;
/// Highest center frequency the filter is ever designed at, modulation included.
pub const MAX_FREQUENCY_HZ: f32 = 20000.0;

/// Anything the engine can read parameter values from. Implementations must be safe to read from
/// the audio thread: no locks, no allocation, each value an independently updated scalar.
pub trait ParameterSource {
    fn read_named(&self, id: ParamId) -> f64;
}

/// One block's worth of parameter values.
///
/// Each value is read independently; there is no consistency guarantee between two parameters
/// that the host changes at the same time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    pub center_frequency: f64,
    pub resonance: f64,
    pub lfo_depth: f64,
    pub lfo_rate: f64,
    pub output_gain: f64,
}

impl ParameterSet {
    pub fn read_from<S: ParameterSource + ?Sized>(source: &S) -> Self {
        Self {
            center_frequency: source.read_named(ParamId::FilterFreq),
            resonance: source.read_named(ParamId::FilterResonance),
            lfo_depth: source.read_named(ParamId::LfoDepth),
            lfo_rate: source.read_named(ParamId::LfoRate),
            output_gain: source.read_named(ParamId::FilterGain),
        }
    }

    pub fn get(&self, id: ParamId) -> f64 {
        match id {
            ParamId::FilterFreq => self.center_frequency,
            ParamId::FilterResonance => self.resonance,
            ParamId::LfoDepth => self.lfo_depth,
            ParamId::LfoRate => self.lfo_rate,
            ParamId::FilterGain => self.output_gain,
        }
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            center_frequency: ParamId::FilterFreq.default_value() as f64,
            resonance: ParamId::FilterResonance.default_value() as f64,
            lfo_depth: ParamId::LfoDepth.default_value() as f64,
            lfo_rate: ParamId::LfoRate.default_value() as f64,
            output_gain: ParamId::FilterGain.default_value() as f64,
        }
    }
}

// A snapshot is itself a source, which keeps tests and offline rendering free of any store.
impl ParameterSource for ParameterSet {
    fn read_named(&self, id: ParamId) -> f64 {
        self.get(id)
    }
}

#[derive(Params)]
pub struct LfoPeakParams {
    #[id = "FILTER_FREQ"]
    pub filter_freq: FloatParam,

    #[id = "FILTER_RESONANCE"]
    pub filter_resonance: FloatParam,

    #[id = "LFO_DEPTH"]
    pub lfo_depth: FloatParam,

    #[id = "LFO_RATE"]
    pub lfo_rate: FloatParam,

    #[id = "FILTER_GAIN"]
    pub filter_gain: FloatParam,
}

/// Builds a parameter from the shared range table. `skewed` selects the square-root style
/// mapping used for the frequency-like controls.
fn float_param(id: ParamId, skewed: bool, step_size: f32) -> FloatParam {
    let (min, max) = id.range();
    let range = if skewed {
        FloatRange::Skewed {
            min,
            max,
            factor: FloatRange::skew_factor(-1.0),
        }
    } else {
        FloatRange::Linear { min, max }
    };

    FloatParam::new(id.name(), id.default_value(), range).with_step_size(step_size)
}

impl Default for LfoPeakParams {
    fn default() -> Self {
        Self {
            filter_freq: float_param(ParamId::FilterFreq, true, 1.0)
                .with_unit(" Hz")
                .with_value_to_string(formatters::v2s_f32_rounded(0)),

            filter_resonance: float_param(ParamId::FilterResonance, false, 0.1)
                .with_value_to_string(formatters::v2s_f32_rounded(1)),

            lfo_depth: float_param(ParamId::LfoDepth, false, 1.0)
                .with_unit(" Hz")
                .with_value_to_string(formatters::v2s_f32_rounded(0)),

            lfo_rate: float_param(ParamId::LfoRate, true, 0.1)
                .with_unit(" Hz")
                .with_value_to_string(formatters::v2s_f32_rounded(1)),

            filter_gain: float_param(ParamId::FilterGain, false, 0.1)
                .with_value_to_string(formatters::v2s_f32_rounded(1)),
        }
    }
}

impl ParameterSource for LfoPeakParams {
    fn read_named(&self, id: ParamId) -> f64 {
        let param = match id {
            ParamId::FilterFreq => &self.filter_freq,
            ParamId::FilterResonance => &self.filter_resonance,
            ParamId::LfoDepth => &self.lfo_depth,
            ParamId::LfoRate => &self.lfo_rate,
            ParamId::FilterGain => &self.filter_gain,
        };

        param.value() as f64
    }
}
