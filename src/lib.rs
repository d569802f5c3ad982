pub mod dsp;
pub mod engine; // Session state machine, batch renderer, streaming adapter
pub mod error;
pub mod io;
pub mod params; // Parameter snapshot and command-line value parsing

pub use engine::{
    config::RenderConfig, render::Renderer, stream::StreamProcessor, Capabilities, EngineMode,
    EngineState, SynthesisEngine,
};
pub use error::{ConfigError, EngineError, ErrorCategory};
pub use params::{EntrainmentType, FrequencySpec, LiveParams, NoiseType, Parameters};

/// Largest block the streaming path renders in one go; host buffers are split into chunks of this size.
pub const MAX_BLOCK_SIZE: usize = 2048;
/// Block size used by the batch renderer.
pub const BATCH_BLOCK_SIZE: usize = 8192;
pub const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;
