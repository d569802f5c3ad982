//! Shared helpers for the end-to-end audio tests.

#![allow(dead_code)]

use std::f32::consts::PI;

use isotone::{engine::render::Renderer, io::MemorySink, RenderConfig, SynthesisEngine};
use rustfft::{num_complex::Complex, FftPlanner};

/// Render `config` to memory with an explicitly built engine.
pub fn render_with(engine: SynthesisEngine, config: &RenderConfig) -> MemorySink {
    let mut renderer = Renderer::with_engine(engine, config).expect("valid config");
    let mut sink = MemorySink::new();
    renderer.render(&mut sink).expect("render succeeds");
    sink
}

/// Render `config` to memory with a default Offline engine.
pub fn render(config: &RenderConfig) -> MemorySink {
    let mut renderer = Renderer::new(config).expect("valid config");
    let mut sink = MemorySink::new();
    renderer.render(&mut sink).expect("render succeeds");
    sink
}

pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

/// Frequency of the strongest Hann-windowed FFT bin over the first
/// `fft_size` samples.
pub fn find_dominant_frequency(samples: &[f32], sample_rate: f32, fft_size: usize) -> f32 {
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);

    let mut input: Vec<Complex<f32>> = samples[..fft_size]
        .iter()
        .enumerate()
        .map(|(i, &sample)| {
            let window = 0.5 * (1.0 - (2.0 * PI * i as f32 / fft_size as f32).cos());
            Complex::new(sample * window, 0.0)
        })
        .collect();

    fft.process(&mut input);

    let (bin, _) = input[1..fft_size / 2]
        .iter()
        .enumerate()
        .map(|(i, c)| (i + 1, c.norm()))
        .fold((0, 0.0f32), |best, cur| if cur.1 > best.1 { cur } else { best });

    bin as f32 * sample_rate / fft_size as f32
}
