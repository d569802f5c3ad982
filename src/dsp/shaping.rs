//! Output shaping
//!
//! The last stage before a sample leaves the engine keeps it away from the
//! 0 dBFS ceiling. Each mode has its own transfer function.
//!
//! # Saturate (batch)
//!
//!   f(x) = tanh(x)
//!   - Smooth everywhere, bounded to (-1, 1)
//!   - Nearly linear below ±0.3, so quiet renders pass almost unchanged
//!   - The reverb tail and noise can push peaks above 1.0; tanh folds them in
//!
//! # Soft knee (live)
//!
//!   f(x) = x                               |x| ≤ 0.9
//!   f(x) = ±(0.9 + (|x| - 0.9) × 0.1)       |x| > 0.9
//!   - Exactly linear below the knee, so the live tone is untouched at
//!     normal gains
//!   - Above the knee the slope drops to 0.1; not bounded, but a full-scale
//!     input only reaches 0.91
//!
//! ```text
//!  out
//!  1.0 ┤          ____----   tanh
//!  0.9 ┤      ,-'‾‾‾‾‾‾‾‾‾‾  soft knee
//!      │    ,'
//!      │  ,'
//!    0 ┼,'──────────────────→ in
//!      0        0.9   1.5
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const KNEE_THRESHOLD: f32 = 0.9;
pub const KNEE_RATIO: f32 = 0.1;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStage {
    Saturate,
    SoftKnee,
}

impl OutputStage {
    #[inline]
    pub fn apply(self, sample: f32) -> f32 {
        match self {
            OutputStage::Saturate => saturate(sample),
            OutputStage::SoftKnee => soft_knee(sample, KNEE_THRESHOLD, KNEE_RATIO),
        }
    }
}

/// Hyperbolic-tangent soft saturation.
#[inline]
pub fn saturate(sample: f32) -> f32 {
    sample.tanh()
}

/// Linear below `threshold`, slope `ratio` above it (both polarities).
#[inline]
pub fn soft_knee(sample: f32, threshold: f32, ratio: f32) -> f32 {
    if sample > threshold {
        threshold + (sample - threshold) * ratio
    } else if sample < -threshold {
        -threshold + (sample + threshold) * ratio
    } else {
        sample
    }
}
