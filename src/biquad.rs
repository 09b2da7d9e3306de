use ::biquad::{Biquad, Coefficients, DirectForm2Transposed};
use std::f64::consts::PI;

/// Gain values below this are treated as this amplitude, which keeps a gain of zero a very deep
/// cut instead of a division by zero in the denominator.
const MIN_GAIN: f64 = 1.0e-6;
/// Fraction of the sample rate the center frequency may reach before the design folds over.
const MAX_NORMALIZED_FREQ: f64 = 0.49;

/// Peaking (bell) filter design after the RBJ cookbook, with `gain_linear` fed straight in as the
/// amplitude factor of the peak: 1.0 is flat, above boosts, below cuts.
///
/// The design runs in `f64` and is only narrowed to `f32` for the filter itself. This is a pure
/// function and safe to call from the audio thread.
pub fn peak_coefficients(
    sample_rate: f64,
    frequency: f64,
    q: f64,
    gain_linear: f64,
) -> Coefficients<f32> {
    let frequency = frequency.min(sample_rate * MAX_NORMALIZED_FREQ).max(2.0);
    let a = gain_linear.max(MIN_GAIN).sqrt();

    let omega = 2.0 * PI * frequency / sample_rate;
    let cosw = omega.cos();
    let sinw = omega.sin();
    let alpha = sinw / (2.0 * q);

    let b0 = 1.0 + alpha * a;
    let b1 = -2.0 * cosw;
    let b2 = 1.0 - alpha * a;
    let a0 = 1.0 + alpha / a;
    let a1 = -2.0 * cosw;
    let a2 = 1.0 - alpha / a;

    Coefficients {
        a1: (a1 / a0) as f32,
        a2: (a2 / a0) as f32,
        b0: (b0 / a0) as f32,
        b1: (b1 / a0) as f32,
        b2: (b2 / a0) as f32,
    }
}

/// Coefficients that leave the signal untouched. Used before the first design is installed.
pub fn identity_coefficients() -> Coefficients<f32> {
    Coefficients {
        a1: 0.0,
        a2: 0.0,
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
    }
}

/// Two coefficient slots with a flipping index. A new design is written into the inactive slot
/// and only then published, so whatever reads `active()` always sees a complete set.
#[derive(Clone, Copy)]
pub struct CoefficientBank {
    slots: [Coefficients<f32>; 2],
    active: usize,
}

impl CoefficientBank {
    pub fn new() -> Self {
        Self {
            slots: [identity_coefficients(); 2],
            active: 0,
        }
    }

    pub fn install(&mut self, coefficients: Coefficients<f32>) {
        let next = self.active ^ 1;
        self.slots[next] = coefficients;
        self.active = next;
    }

    pub fn active(&self) -> Coefficients<f32> {
        self.slots[self.active]
    }
}

impl Default for CoefficientBank {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-channel delay registers of the peak filter.
pub struct ChannelFilter {
    filter: DirectForm2Transposed<f32>,
}

impl ChannelFilter {
    pub fn new() -> Self {
        Self {
            filter: DirectForm2Transposed::<f32>::new(identity_coefficients()),
        }
    }

    /// Swaps in new coefficients while keeping the delay registers, so a coefficient change does
    /// not restart the filter from silence.
    pub fn set_coefficients(&mut self, coefficients: Coefficients<f32>) {
        self.filter.update_coefficients(coefficients);
    }

    pub fn process_slice(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample = self.filter.run(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.filter.reset_state();
    }
}

impl Default for ChannelFilter {
    fn default() -> Self {
        Self::new()
    }
}
