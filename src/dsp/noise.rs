//! Colored noise with a slowly swept smoothing filter.
//!
//! ```text
//!  white/pink/brown ──→ [one-pole lowpass] ──→ out
//!                              ↑
//!                     alpha = 0.005 + lfo·0.05
//! ```
//!
//! The lowpass is very dark (alpha ≤ 0.055), so the result reads as a
//! breathing wash rather than hiss. The LFO moves the cutoff between "deep"
//! and "airy" over tens of seconds.
//!
//! All randomness comes from a per-synth PCG32 generator. A synth prepared
//! twice with the same seed produces the same samples.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::dsp::lfo::{sweep_rate_for, Lfo};
use crate::params::NoiseType;

/// Voss-McCartney row count (octaves).
pub const PINK_ROWS: usize = 7;
const PINK_GAIN: f32 = 0.12;

const BROWN_STEP: f32 = 0.05;
const BROWN_LEAK: f32 = 1.01;
const BROWN_GAIN: f32 = 3.5;

const FILTER_FLOOR: f32 = 0.005;
const FILTER_SWEEP: f32 = 0.05;

/// Creates a PCG32 generator from a 64-bit seed.
pub fn create_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Derives an independent seed for one output channel.
pub fn derive_channel_seed(base_seed: u64, channel: usize) -> u64 {
    base_seed ^ (channel as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[inline]
fn white<R: Rng>(rng: &mut R) -> f32 {
    rng.gen_range(-1.0f32..=1.0)
}

/// Voss-McCartney pink noise.
///
/// Row `i` is refreshed with a fresh white sample every `2^i` samples, so
/// each row covers one octave and their sum falls off at roughly 3 dB per
/// octave.
#[derive(Debug, Clone, Default)]
pub struct PinkNoise {
    rows: [f32; PINK_ROWS],
    counter: u32,
    last_refresh: u8,
}

impl PinkNoise {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next<R: Rng>(&mut self, rng: &mut R) -> f32 {
        let mut refreshed = 0u8;
        for (i, row) in self.rows.iter_mut().enumerate() {
            let period_mask = (1u32 << i) - 1;
            if self.counter & period_mask == 0 {
                *row = white(rng);
                refreshed |= 1 << i;
            }
        }
        self.counter = self.counter.wrapping_add(1);
        self.last_refresh = refreshed;

        self.rows.iter().sum::<f32>() * PINK_GAIN
    }

    /// Bit `i` is set when row `i` was refreshed by the last `next` call.
    pub fn last_refresh(&self) -> u8 {
        self.last_refresh
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One channel of filtered colored noise.
pub struct NoiseSynth {
    seed: u64,
    rng: Pcg32,
    kind: NoiseType,
    brown: f32,
    pink: PinkNoise,
    filter_state: f32,
    lfo: Lfo,
}

impl NoiseSynth {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: create_rng(seed),
            kind: NoiseType::None,
            brown: 0.0,
            pink: PinkNoise::new(),
            filter_state: 0.0,
            lfo: Lfo::default(),
        }
    }

    /// Reset all state for a new session. Must be called before `process`.
    ///
    /// `reference_hz` is the entrainment frequency at session start; it picks
    /// the filter sweep rate.
    pub fn prepare(&mut self, sample_rate: f64, kind: NoiseType, reference_hz: f32) {
        self.kind = kind;
        self.rng = create_rng(self.seed);
        self.brown = 0.0;
        self.pink.reset();
        self.filter_state = 0.0;
        self.lfo = Lfo::new(sweep_rate_for(reference_hz), sample_rate);
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = create_rng(seed);
    }

    pub fn kind(&self) -> NoiseType {
        self.kind
    }

    /// One filtered noise sample.
    #[inline]
    pub fn process(&mut self) -> f32 {
        let raw = match self.kind {
            NoiseType::None => 0.0,
            NoiseType::White => white(&mut self.rng),
            NoiseType::Brown => {
                self.brown = (self.brown + BROWN_STEP * white(&mut self.rng)) / BROWN_LEAK;
                self.brown * BROWN_GAIN
            }
            NoiseType::Pink => self.pink.next(&mut self.rng),
        };

        let alpha = FILTER_FLOOR + self.lfo.next_unipolar() * FILTER_SWEEP;
        self.filter_state += alpha * (raw - self.filter_state);
        self.filter_state
    }
}
