//! Error types for configuration, output resources and rendering.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineState;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Broad class of a failure, used by callers that only care how to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input detected before any audio was produced. Never retried.
    Configuration,
    /// Output path or writer could not be opened or written.
    Resource,
    /// Something went wrong while rendering.
    Runtime,
}

/// Invalid session configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid journey: expected {expected} pulse and carrier values, got {pulse} and {carrier}")]
    JourneyPointCount {
        expected: usize,
        pulse: usize,
        carrier: usize,
    },

    #[error("pulse and carrier must both be single values or both be journeys")]
    MismatchedFrequencySpecs,

    #[error("journey keyframes must start at 0 s and strictly increase in time")]
    JourneyNotIncreasing,

    #[error("cannot parse frequency value '{token}'")]
    InvalidFrequencyToken { token: String },

    #[error("journey spans {journey} s but the session lasts {duration} s")]
    JourneySpan { journey: f64, duration: f64 },

    #[error("invalid duration: {seconds} seconds")]
    InvalidDuration { seconds: f64 },

    #[error("invalid sample rate: {rate} Hz")]
    InvalidSampleRate { rate: f64 },

    #[error("{name} frequency {hz} Hz is outside (0, {nyquist}) Hz")]
    FrequencyOutOfRange {
        name: &'static str,
        hz: f64,
        nyquist: f64,
    },

    #[error("{name} must be within [0, 1], got {value}")]
    UnitOutOfRange { name: &'static str, value: f32 },

    #[error("invalid gain: {db} dB")]
    InvalidGain { db: f32 },

    #[error("unsupported entrainment type index {index} (expected 0 or 1)")]
    UnknownEntrainmentType { index: i32 },

    #[error("unsupported noise type index {index} (expected -1, 0, 1 or 2)")]
    UnknownNoiseType { index: i32 },
}

/// Errors that can occur while preparing or running a render session.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("could not open output '{}': {source}", path.display())]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("failed to write audio: {0}")]
    Write(#[source] hound::Error),

    #[error("non-finite sample produced at frame {frame}")]
    NonFinite { frame: u64 },

    #[error("engine is {actual:?}, expected {expected:?}")]
    InvalidState {
        expected: EngineState,
        actual: EngineState,
    },
}

impl EngineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EngineError::Config(_) => ErrorCategory::Configuration,
            EngineError::OpenOutput { .. } | EngineError::Write(_) => ErrorCategory::Resource,
            EngineError::NonFinite { .. } | EngineError::InvalidState { .. } => {
                ErrorCategory::Runtime
            }
        }
    }
}
