//! Benchmarks for the streaming adapter at host buffer sizes.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use isotone::engine::stream::{AudioProcessor, SharedParams};
use isotone::StreamProcessor;

use crate::BLOCK_SIZES;

pub fn bench_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/stream");

    for &size in BLOCK_SIZES {
        for (name, smoothing) in [("ramped", true), ("stepped", false)] {
            let shared = Arc::new(SharedParams::default());
            let mut processor = StreamProcessor::new(Arc::clone(&shared)).with_smoothing(smoothing);
            processor.prepare(48_000.0, size).expect("prepare");

            let mut data = vec![0.0f32; size * 2];
            let mut toggle = false;

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    // A parameter change every buffer is the worst case
                    toggle = !toggle;
                    shared.set_carrier_hz(if toggle { 440.0 } else { 445.0 });
                    processor.process_interleaved(black_box(&mut data), 2);
                })
            });
        }
    }

    group.finish();
}
