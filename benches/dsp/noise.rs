//! Benchmarks for filtered colored noise.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use isotone::dsp::NoiseSynth;
use isotone::NoiseType;

use crate::BLOCK_SIZES;

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");

    for &size in BLOCK_SIZES {
        for (name, kind) in [
            ("white", NoiseType::White),
            ("pink", NoiseType::Pink),
            ("brown", NoiseType::Brown),
        ] {
            let mut synth = NoiseSynth::new(42);
            synth.prepare(48_000.0, kind, 10.0);

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for _ in 0..size {
                        sum += synth.process();
                    }
                    black_box(sum)
                })
            });
        }
    }

    group.finish();
}
