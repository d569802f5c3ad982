//! Low-level DSP primitives used by the synthesis engine.
//!
//! These components never allocate once prepared and are realtime-safe, so
//! the engine can embed them directly in its session state. They stay
//! focused on the signal-processing math; orchestration lives in `engine`.

/// Decibel/linear gain conversion.
pub mod amplify;
/// Five-keyframe pulse/carrier automation.
pub mod journey;
/// Unipolar sine LFO and control-rate helpers.
pub mod lfo;
/// Colored noise sources with a swept smoothing filter.
pub mod noise;
/// Wrap-safe phase accumulator.
pub mod phase;
/// Entrainment pulse envelope shapes.
pub mod pulse;
/// Linear parameter ramps for block-rate control.
pub mod ramp;
/// Comb/all-pass reverb network.
pub mod reverb;
/// Output saturation and clipping.
pub mod shaping;

pub use journey::{Journey, JourneyCursor, JourneyPoint};
pub use noise::{NoiseSynth, PinkNoise};
pub use phase::PhaseAccumulator;
pub use pulse::{PulseEnvelope, PulseShape};
pub use reverb::SchroederReverb;
