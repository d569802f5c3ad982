//! Low Frequency Oscillator (LFO) used to sweep the noise filter.

use crate::dsp::phase::PhaseAccumulator;

/*
Low Frequency Oscillators
=========================

An LFO is an oscillator running at sub-audio frequencies. The same phase
math as the carrier applies; only the rate and the use differ.

Vocabulary
----------

  control-rate    Frequencies far below hearing: here 0.05 Hz - 0.2 Hz.
                  The LFO never reaches the output directly, it moves the
                  cutoff of the noise smoothing filter.

  bipolar         Output swings -1.0 to +1.0 (a raw sine).

  unipolar        Output is 0.0 to 1.0.
                  Convert: unipolar = (bipolar + 1.0) / 2.0

The noise filter wants a coefficient that only ever opens further from a
floor, so it reads the LFO as unipolar:

    alpha = 0.005 + unipolar * 0.05


Context-Dependent Rate
----------------------

The sweep speed follows the entrainment band the session starts in:

    reference < 8 Hz   →  0.05 Hz   (20 s swell, slow "waves")
    reference ≥ 8 Hz   →  0.2 Hz    (5 s shimmer, lighter "wind")

This is a perceptual choice. Delta/theta sessions get heavy, slow movement,
alpha/beta sessions get faster air.
*/

/// Entrainment frequency below which the slow sweep is used.
pub const SLOW_SWEEP_BELOW_HZ: f32 = 8.0;
pub const SLOW_SWEEP_HZ: f32 = 0.05;
pub const FAST_SWEEP_HZ: f32 = 0.2;

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// Sweep rate for a session whose entrainment starts at `reference_hz`.
#[inline]
pub fn sweep_rate_for(reference_hz: f32) -> f32 {
    if reference_hz < SLOW_SWEEP_BELOW_HZ {
        SLOW_SWEEP_HZ
    } else {
        FAST_SWEEP_HZ
    }
}

/// Free-running unipolar sine LFO.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lfo {
    phase: PhaseAccumulator,
    increment: f64,
}

impl Lfo {
    pub fn new(frequency_hz: f32, sample_rate: f64) -> Self {
        Self {
            phase: PhaseAccumulator::new(),
            increment: PhaseAccumulator::increment_for(frequency_hz as f64, sample_rate),
        }
    }

    /// Current value in [0, 1], then advance one sample.
    #[inline]
    pub fn next_unipolar(&mut self) -> f32 {
        let value = bipolar_to_unipolar(self.phase.value().sin() as f32);
        self.phase.advance(self.increment);
        value
    }

    pub fn reset(&mut self) {
        self.phase.reset();
    }
}
