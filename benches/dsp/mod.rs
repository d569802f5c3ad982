//! Benchmarks for low-level DSP primitives.

mod envelope;
mod noise;
mod reverb;
mod shaping;

pub use envelope::bench_envelope;
pub use noise::bench_noise;
pub use reverb::bench_reverb;
pub use shaping::bench_shaping;
