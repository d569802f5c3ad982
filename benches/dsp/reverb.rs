//! Benchmarks for reverb processing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use isotone::dsp::reverb::SchroederReverb;

use crate::BLOCK_SIZES;

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    for &sample_rate in &[44_100.0, 96_000.0] {
        for &size in BLOCK_SIZES {
            // Impulse followed by a quiet tone
            let input: Vec<f32> = (0..size)
                .map(|i| {
                    if i < 10 {
                        1.0 - (i as f32 / 10.0)
                    } else {
                        (i as f32 * 0.05).sin() * 0.1
                    }
                })
                .collect();

            let mut reverb = SchroederReverb::new(sample_rate);
            let id = format!("{}hz", sample_rate as u32);
            group.bench_with_input(BenchmarkId::new(id, size), &size, |b, _| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for &sample in &input {
                        sum += reverb.process(black_box(sample));
                    }
                    sum
                })
            });
        }
    }

    group.finish();
}
