//! Benchmarks for the output stages.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use isotone::dsp::shaping::OutputStage;

use crate::BLOCK_SIZES;

pub fn bench_shaping(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/shaping");

    for &size in BLOCK_SIZES {
        // Sweep across the knee so both branches run
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 3.0 - 1.5)
            .collect();
        let mut output = vec![0.0f32; size];

        for (name, stage) in [
            ("saturate", OutputStage::Saturate),
            ("soft_knee", OutputStage::SoftKnee),
        ] {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for (out, &x) in output.iter_mut().zip(&input) {
                        *out = stage.apply(black_box(x));
                    }
                })
            });
        }
    }

    group.finish();
}
