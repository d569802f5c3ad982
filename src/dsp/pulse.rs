//! Entrainment pulse envelope.
//!
//! The pulse oscillator's sine is half-wave rectified and raised to a power
//! controlled by `softness`. The batch renderer and the live path use
//! different shapes.
//!
//! ```text
//! Narrowing (batch):   env = max(0, sin φ) ^ (1 + 4·softness)
//! Widening  (live):    env = |sin φ| ^ (1 − 0.9·softness),   0 when sin φ < 0
//!
//!   1.0 ┤  ╭─╮                ╭───╮
//!       │ ╭╯ ╰╮   narrowing   │   │   widening
//!       │╭╯   ╰╮             ╭╯   ╰╮
//!   0.0 ┼╯     ╰──────       ╯     ╰──────
//! ```
//!
//! Both outputs stay in [0, 1]. `0^x` with `x > 0` is 0, so neither shape has
//! a singularity at the rectification edge.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseShape {
    /// Exponent 1..5: more softness gives a narrower, rounder bell.
    Narrowing,
    /// Exponent 1..0.1: more softness flattens the top towards a gate.
    Widening,
}

impl PulseShape {
    /// Exponent applied to the rectified sine for a given softness.
    #[inline]
    pub fn exponent(self, softness: f32) -> f32 {
        match self {
            PulseShape::Narrowing => 1.0 + softness * 4.0,
            PulseShape::Widening => 1.0 - softness * 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PulseEnvelope {
    shape: PulseShape,
    exponent: f32,
}

impl PulseEnvelope {
    pub fn new(shape: PulseShape, softness: f32) -> Self {
        Self {
            shape,
            exponent: shape.exponent(softness),
        }
    }

    pub fn set_softness(&mut self, softness: f32) {
        self.exponent = self.shape.exponent(softness);
    }

    pub fn shape(&self) -> PulseShape {
        self.shape
    }

    /// Envelope level for a pulse phase in radians.
    #[inline]
    pub fn level(&self, phase: f64) -> f32 {
        let raw = (phase as f32).sin();
        match self.shape {
            PulseShape::Narrowing => raw.max(0.0).powf(self.exponent),
            PulseShape::Widening => {
                if raw < 0.0 {
                    0.0
                } else {
                    raw.abs().powf(self.exponent)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, PI, TAU};

    fn sweep(env: &PulseEnvelope) -> Vec<f32> {
        (0..1000)
            .map(|i| env.level(TAU * i as f64 / 1000.0))
            .collect()
    }

    #[test]
    fn test_levels_stay_in_unit_range() {
        for shape in [PulseShape::Narrowing, PulseShape::Widening] {
            for &softness in &[0.0, 0.25, 0.5, 1.0] {
                let env = PulseEnvelope::new(shape, softness);
                for level in sweep(&env) {
                    assert!(
                        (0.0..=1.0).contains(&level),
                        "{:?} softness {} produced {}",
                        shape,
                        softness,
                        level
                    );
                }
            }
        }
    }

    #[test]
    fn test_negative_half_is_silent() {
        for shape in [PulseShape::Narrowing, PulseShape::Widening] {
            let env = PulseEnvelope::new(shape, 0.5);
            assert_eq!(env.level(PI + 0.3), 0.0);
            assert_eq!(env.level(1.5 * PI), 0.0);
        }
    }

    #[test]
    fn test_zero_softness_is_half_rectified_sine() {
        for shape in [PulseShape::Narrowing, PulseShape::Widening] {
            let env = PulseEnvelope::new(shape, 0.0);
            let expected = (FRAC_PI_6 as f32).sin();
            assert!((env.level(FRAC_PI_6) - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_peak_is_unity() {
        for shape in [PulseShape::Narrowing, PulseShape::Widening] {
            let env = PulseEnvelope::new(shape, 0.7);
            assert!((env.level(FRAC_PI_2) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_narrowing_softness_lowers_shoulders() {
        let sharp = PulseEnvelope::new(PulseShape::Narrowing, 0.0);
        let soft = PulseEnvelope::new(PulseShape::Narrowing, 1.0);
        // sin(π/6) = 0.5 → 0.5 vs 0.5^5
        assert!((sharp.level(FRAC_PI_6) - 0.5).abs() < 1e-6);
        assert!((soft.level(FRAC_PI_6) - 0.03125).abs() < 1e-5);
    }

    #[test]
    fn test_widening_softness_raises_shoulders() {
        let soft = PulseEnvelope::new(PulseShape::Widening, 1.0);
        // 0.5^0.1 ≈ 0.933
        let level = soft.level(FRAC_PI_6);
        assert!((level - 0.5f32.powf(0.1)).abs() < 1e-5);
        assert!(level > 0.9);
    }

    #[test]
    fn test_shapes_differ_for_same_softness() {
        let narrowing = PulseEnvelope::new(PulseShape::Narrowing, 0.5);
        let widening = PulseEnvelope::new(PulseShape::Widening, 0.5);
        let a = narrowing.level(FRAC_PI_6);
        let b = widening.level(FRAC_PI_6);
        assert!(b > a * 2.0, "expected widening {} well above narrowing {}", b, a);
    }

    #[test]
    fn test_set_softness_updates_exponent() {
        let mut env = PulseEnvelope::new(PulseShape::Narrowing, 0.0);
        env.set_softness(1.0);
        assert!((env.level(FRAC_PI_6) - 0.03125).abs() < 1e-5);
    }
}
