//! Gain conversion between decibels and linear amplitude.

/*
Attenuation in Decibels
=======================

Hearing is logarithmic, so volume controls are expressed in decibels and
converted to a linear multiplier before touching samples:

    gain = 10 ^ (dB / 20)
    dB   = 20 × log₁₀(gain)

Reference points for the ranges used here:

    0 dB   = ×1.0      (unity, the live path's ceiling)
   -6 dB   ≈ ×0.5      (live default)
  -10 dB   ≈ ×0.316    (batch default)
  -60 dB   = ×0.001    (live floor, effectively silent)

Gain is applied to the tone only. Noise has its own linear level and is added
after the tone has been scaled.
*/

/// Convert decibels to a linear gain factor.
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}

/// Convert a linear gain factor to decibels. Silence maps to negative infinity.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    20.0 * gain.log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_points() {
        assert!((db_to_gain(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_gain(-6.0) - 0.501).abs() < 1e-3);
        assert!((db_to_gain(-20.0) - 0.1).abs() < 1e-6);
        assert!((db_to_gain(-60.0) - 0.001).abs() < 1e-7);
    }

    #[test]
    fn test_round_trip() {
        for &db in &[-60.0, -10.0, -3.0, 0.0, 6.0] {
            assert!((gain_to_db(db_to_gain(db)) - db).abs() < 1e-4);
        }
    }

    #[test]
    fn test_silence_is_negative_infinity() {
        assert_eq!(gain_to_db(0.0), f32::NEG_INFINITY);
    }
}
