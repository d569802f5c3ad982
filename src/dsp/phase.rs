use std::f64::consts::TAU;

/*
Phase Accumulation
==================

Every oscillator in the engine is a phase accumulator feeding `sin()`. Each
sample the phase moves forward by

    increment = 2π × frequency / sample_rate

and is wrapped back into [0, 2π). Wrapping by subtraction (instead of `%`)
keeps the value exact for the common case of one overflow per step and
costs nothing when no wrap is needed.

    phase
     2π ┤    ╱│   ╱│   ╱│
        │   ╱ │  ╱ │  ╱ │
        │  ╱  │ ╱  │ ╱  │
      0 ┼─╱───┴╱───┴╱───┴──→ samples

Why f64?
--------
At 44.1 kHz a single-precision phase loses sub-sample accuracy after a few
minutes of accumulation. Entrainment sessions run for an hour or more, so
phases are stored as f64 and only narrowed to f32 at the `sin()` call.

Frequency may be changed every sample (journeys do this): only the increment
changes, the phase itself is continuous, so there are no clicks.
*/

/// Angle accumulator that always stays within `[0, 2π)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseAccumulator {
    phase: f64,
}

impl PhaseAccumulator {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Angular increment for one sample of `frequency_hz` at `sample_rate`.
    #[inline]
    pub fn increment_for(frequency_hz: f64, sample_rate: f64) -> f64 {
        TAU * frequency_hz / sample_rate
    }

    /// Add `increment` radians and wrap back into `[0, 2π)`.
    #[inline]
    pub fn advance(&mut self, increment: f64) {
        self.phase += increment;

        if self.phase >= TAU {
            self.phase -= TAU;
            // Only reachable when a single increment exceeds a full turn
            if self.phase >= TAU {
                self.phase = self.phase.rem_euclid(TAU);
            }
        } else if self.phase < 0.0 {
            self.phase += TAU;
            if self.phase < 0.0 {
                self.phase = self.phase.rem_euclid(TAU);
            }
        }

        // rem_euclid can round up to exactly TAU for tiny negative inputs
        if self.phase >= TAU {
            self.phase = 0.0;
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.phase
    }

    #[inline]
    pub fn sin(&self) -> f32 {
        (self.phase as f32).sin()
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_in_range(acc: &PhaseAccumulator) {
        let v = acc.value();
        assert!(
            (0.0..TAU).contains(&v),
            "phase {} escaped [0, 2π)",
            v
        );
    }

    #[test]
    fn test_increment_for() {
        // 1 Hz at 4 samples per second = quarter turn per sample
        let inc = PhaseAccumulator::increment_for(1.0, 4.0);
        assert!((inc - TAU / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_wraps_after_full_cycle() {
        let mut acc = PhaseAccumulator::new();
        let inc = PhaseAccumulator::increment_for(441.0, 44_100.0);
        for _ in 0..100 {
            acc.advance(inc);
            assert_in_range(&acc);
        }
        // 100 steps of 1/100 turn lands back near zero (or just under 2π)
        let v = acc.value();
        assert!(v < 1e-9 || (TAU - v) < 1e-9, "unexpected phase {}", v);
    }

    #[test]
    fn test_stays_in_range_for_large_increments() {
        let mut acc = PhaseAccumulator::new();
        for &inc in &[0.1, 1.0, 3.0, 6.2, 6.3, 9.5, 20.0] {
            for _ in 0..1000 {
                acc.advance(inc);
                assert_in_range(&acc);
            }
        }
    }

    #[test]
    fn test_negative_increment_wraps_upward() {
        let mut acc = PhaseAccumulator::new();
        acc.advance(-0.5);
        assert_in_range(&acc);
        assert!((acc.value() - (TAU - 0.5)).abs() < 1e-12);

        for _ in 0..1000 {
            acc.advance(-7.0);
            assert_in_range(&acc);
        }
    }

    #[test]
    fn test_long_run_stays_accurate() {
        // Ten minutes at 10 Hz / 44.1 kHz: phase must still match the closed form
        let sample_rate = 44_100.0;
        let inc = PhaseAccumulator::increment_for(10.0, sample_rate);
        let mut acc = PhaseAccumulator::new();
        let steps = 600 * 44_100u64;
        for _ in 0..steps {
            acc.advance(inc);
        }
        let expected = (inc * steps as f64).rem_euclid(TAU);
        let diff = (acc.value() - expected).abs();
        assert!(diff < 1e-6 || (TAU - diff) < 1e-6, "drifted by {}", diff);
    }
}
