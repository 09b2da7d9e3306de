use std::f64::consts::TAU;

/// Free-running sine LFO that ticks once per block.
///
/// The phase lives in `[0, 2π)` and only ever moves forward. Changing the rate swaps the
/// per-sample increment and leaves the phase alone, so live rate changes never jump.
#[derive(Debug, Clone, Copy)]
pub struct Lfo {
    phase: f64,
    increment: f64,
}

impl Lfo {
    pub fn new() -> Self {
        Self {
            phase: 0.0,
            increment: 0.0,
        }
    }

    /// Recomputes the per-sample phase increment. Called every block, whether or not the rate
    /// changed.
    pub fn set_rate(&mut self, rate_hz: f64, sample_rate: f64) {
        self.increment = TAU * rate_hz / sample_rate;
    }

    /// The modulation value for the current block, in Hz. Does not move the phase.
    pub fn sample(&self, depth_hz: f64) -> f64 {
        self.phase.sin() * depth_hz
    }

    /// Moves the phase forward by a whole block.
    pub fn advance(&mut self, num_samples: usize) {
        self.phase = wrap_phase(self.phase + self.increment * num_samples as f64);
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn increment(&self) -> f64 {
        self.increment
    }
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new()
    }
}

/// Floating modulo into `[0, 2π)`.
fn wrap_phase(phase: f64) -> f64 {
    let wrapped = phase.rem_euclid(TAU);
    // rem_euclid can round up to exactly 2π for values just below a multiple of it
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn starts_at_zero_phase() {
        let lfo = Lfo::new();
        assert_eq!(lfo.phase(), 0.0);
        assert_eq!(lfo.sample(100.0), 0.0);
    }

    #[test]
    fn increment_follows_rate_and_sample_rate() {
        let mut lfo = Lfo::new();
        lfo.set_rate(5.0, 44100.0);
        assert!((lfo.increment() - TAU * 5.0 / 44100.0).abs() < 1e-15);
    }

    #[test]
    fn sample_does_not_advance() {
        let mut lfo = Lfo::new();
        lfo.set_rate(5.0, 44100.0);
        lfo.advance(1000);

        let phase = lfo.phase();
        let _ = lfo.sample(100.0);
        let _ = lfo.sample(100.0);
        assert_eq!(lfo.phase(), phase);
    }

    #[test]
    fn sample_scales_sine_by_depth() {
        let mut lfo = Lfo::new();
        // A quarter cycle: 1 Hz at 4 Hz sample rate, one sample
        lfo.set_rate(1.0, 4.0);
        lfo.advance(1);

        assert!((lfo.phase() - TAU / 4.0).abs() < 1e-12);
        assert!((lfo.sample(250.0) - 250.0).abs() < 1e-9);
    }

    #[test]
    fn full_cycle_wraps_back_to_start() {
        let mut lfo = Lfo::new();
        lfo.set_rate(1.0, 48000.0);
        lfo.advance(48000);

        let phase = lfo.phase();
        assert!(phase < 1e-9 || (TAU - phase) < 1e-9, "got {}", phase);
        assert!(phase < TAU);
    }

    #[test]
    fn rate_change_keeps_phase() {
        let mut lfo = Lfo::new();
        lfo.set_rate(5.0, 44100.0);
        lfo.advance(512);
        let before = lfo.phase();

        lfo.set_rate(17.0, 44100.0);
        assert_eq!(lfo.phase(), before);

        lfo.advance(512);
        let expected = (before + TAU * 17.0 / 44100.0 * 512.0) % TAU;
        assert!((lfo.phase() - expected).abs() < 1e-12);
    }

    #[test]
    fn reset_returns_to_zero() {
        let mut lfo = Lfo::new();
        lfo.set_rate(3.0, 44100.0);
        lfo.advance(10_000);
        lfo.reset();

        assert_eq!(lfo.phase(), 0.0);
    }

    proptest! {
        #[test]
        fn phase_matches_accumulated_increments(
            rate in 0.1f64..=20.0,
            blocks in prop::collection::vec(1usize..=4096, 1..64),
        ) {
            let mut lfo = Lfo::new();
            lfo.set_rate(rate, 44100.0);

            let mut expected = 0.0f64;
            for &n in &blocks {
                lfo.advance(n);
                expected = (expected + lfo.increment() * n as f64) % TAU;

                prop_assert!(lfo.phase() >= 0.0 && lfo.phase() < TAU);
            }

            // Both sides may sit on opposite ends of the wrap point
            let diff = (lfo.phase() - expected).abs();
            prop_assert!(diff < 1e-9 || (TAU - diff) < 1e-9, "diff {}", diff);
        }
    }
}
