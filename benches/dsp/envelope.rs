//! Benchmarks for the pulse envelope shapes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use isotone::dsp::{PhaseAccumulator, PulseEnvelope, PulseShape};

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let increment = PhaseAccumulator::increment_for(10.0, 48_000.0);

    for &size in BLOCK_SIZES {
        for (name, shape) in [
            ("narrowing", PulseShape::Narrowing),
            ("widening", PulseShape::Widening),
        ] {
            let envelope = PulseEnvelope::new(shape, 0.5);
            let mut phase = PhaseAccumulator::new();

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for _ in 0..size {
                        sum += envelope.level(black_box(phase.value()));
                        phase.advance(increment);
                    }
                    sum
                })
            });
        }
    }

    group.finish();
}
