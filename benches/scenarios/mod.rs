//! Real-world scenario benchmarks.
//!
//! Full engine blocks as the batch renderer and a streaming host drive them.

mod session;
mod stream;

pub use session::bench_session;
pub use stream::bench_stream;
