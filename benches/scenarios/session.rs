//! Benchmarks for offline render blocks.
//!
//! Each configuration keeps rendering into the same buffer; sessions are
//! open-ended so the engine never completes mid-measurement.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use isotone::dsp::Journey;
use isotone::{
    EngineMode, EntrainmentType, NoiseType, Parameters, RenderConfig, SynthesisEngine,
    BATCH_BLOCK_SIZE,
};

pub fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/session");

    let plain = RenderConfig::new(Parameters::default());
    let noisy = RenderConfig::new(Parameters {
        noise: NoiseType::Pink,
        ..Parameters::default()
    });
    let binaural = RenderConfig::new(Parameters {
        entrainment: EntrainmentType::BinauralOffset,
        noise: NoiseType::Brown,
        ..Parameters::default()
    });
    let journey = RenderConfig::new(Parameters::default()).journey(
        Journey::from_milestones(
            &[1.0, 5.0, 10.0, 15.0, 20.0],
            &[100.0, 150.0, 200.0, 250.0, 300.0],
            3600.0,
        )
        .expect("valid journey"),
    );

    let mut left = vec![0.0f32; BATCH_BLOCK_SIZE];
    let mut right = vec![0.0f32; BATCH_BLOCK_SIZE];

    for (name, config) in [
        ("isochronic", plain),
        ("isochronic_pink", noisy),
        ("binaural_brown", binaural),
        ("journey", journey),
    ] {
        let mut engine = SynthesisEngine::new(EngineMode::Offline);
        engine.prepare(&config).expect("valid config");

        group.bench_with_input(
            BenchmarkId::new(name, BATCH_BLOCK_SIZE),
            &BATCH_BLOCK_SIZE,
            |b, _| {
                b.iter(|| {
                    engine
                        .render_block(black_box(&mut left), black_box(&mut right))
                        .expect("rendering")
                })
            },
        );
    }

    group.finish();
}
