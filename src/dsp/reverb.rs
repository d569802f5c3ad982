//! Reverb - Room Simulation via Delay Networks
//!
//! A small Schroeder network adds a sense of space around the tone. It is
//! mixed in quietly (12% wet), so it reads as "air" rather than a room.
//!
//! # Architecture
//!
//! ```text
//! Input ──┬──→ [Comb 1] ──┐
//!         ├──→ [Comb 2] ──┤
//!         ├──→ [Comb 3] ──┼──→ (+) × 0.25 ──→ [Allpass] ──→ Wet
//!         └──→ [Comb 4] ──┘
//! ```
//!
//! ## Comb Filters
//!
//! Each comb repeats its input every `delay` samples, scaled by the feedback
//! each time round:
//!
//! ```text
//! y[n] = x[n - delay] + feedback * y[n - delay]
//! ```
//!
//! The four delay times (29.7, 37.1, 41.1, 43.7 ms) share no common factor,
//! so their echoes interleave into a dense tail instead of reinforcing.
//!
//! ## Allpass Filter
//!
//! Passes all frequencies at equal magnitude but smears their phase, which
//! diffuses the comb echoes.
//!
//! ```text
//! y[n] = -g * x[n] + x[n - delay] + g * y[n - delay]
//! ```
//!
//! # Stability
//!
//! Comb feedback is fixed at 0.84 and allpass gain at 0.5, both below 1, so
//! an impulse decays geometrically: after `k` round trips a comb holds
//! `0.84^k` of its input.

const COMB_DELAYS_SEC: [f64; 4] = [0.0297, 0.0371, 0.0411, 0.0437];
const ALLPASS_DELAY_SEC: f64 = 0.005;

pub const COMB_FEEDBACK: f32 = 0.84;
pub const ALLPASS_GAIN: f32 = 0.5;

/// Delay length in samples for `seconds` at `sample_rate`, never below one.
#[inline]
fn delay_samples(seconds: f64, sample_rate: f64) -> usize {
    ((seconds * sample_rate) as usize).max(1)
}

/// A feedback comb filter (buffer allocated in `set_delay`, RT-safe process)
pub struct CombFilter {
    buffer: Vec<f32>,
    write_pos: usize,
    feedback: f32,
}

impl CombFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            write_pos: 0,
            feedback: COMB_FEEDBACK,
        }
    }

    /// Resize and clear the delay line. Allocates when the length changes.
    pub fn set_delay(&mut self, delay_samples: usize) {
        self.buffer.clear();
        self.buffer.resize(delay_samples.max(1), 0.0);
        self.write_pos = 0;
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.write_pos];

        // Write new sample: input + feedback
        self.buffer[self.write_pos] = input + output * self.feedback;

        // Advance write position
        self.write_pos += 1;
        if self.write_pos >= self.buffer.len() {
            self.write_pos = 0;
        }

        output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

/// An allpass filter for reverb diffusion
pub struct AllpassFilter {
    buffer: Vec<f32>,
    write_pos: usize,
    gain: f32,
}

impl AllpassFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            write_pos: 0,
            gain: ALLPASS_GAIN,
        }
    }

    pub fn set_delay(&mut self, delay_samples: usize) {
        self.buffer.clear();
        self.buffer.resize(delay_samples.max(1), 0.0);
        self.write_pos = 0;
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.write_pos];

        let output = -self.gain * input + delayed;
        self.buffer[self.write_pos] = input + self.gain * output;

        self.write_pos += 1;
        if self.write_pos >= self.buffer.len() {
            self.write_pos = 0;
        }

        output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

/// Schroeder reverb with 4 comb filters and 1 allpass filter
pub struct SchroederReverb {
    combs: [CombFilter; 4],
    allpass: AllpassFilter,
    sample_rate: f64,
}

impl SchroederReverb {
    /// Create a reverb sized for `sample_rate`.
    pub fn new(sample_rate: f64) -> Self {
        let combs = COMB_DELAYS_SEC.map(|sec| CombFilter::new(delay_samples(sec, sample_rate)));
        let allpass = AllpassFilter::new(delay_samples(ALLPASS_DELAY_SEC, sample_rate));

        Self {
            combs,
            allpass,
            sample_rate,
        }
    }

    /// Size the delay lines for `sample_rate` and clear them.
    ///
    /// Lines are only reallocated when the rate differs from the last one;
    /// otherwise this is a plain reset.
    pub fn prepare(&mut self, sample_rate: f64) {
        if sample_rate == self.sample_rate {
            self.reset();
            return;
        }

        for (comb, &sec) in self.combs.iter_mut().zip(COMB_DELAYS_SEC.iter()) {
            comb.set_delay(delay_samples(sec, sample_rate));
        }
        self.allpass
            .set_delay(delay_samples(ALLPASS_DELAY_SEC, sample_rate));
        self.sample_rate = sample_rate;
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Process a single sample, returning the wet signal only
    pub fn process(&mut self, input: f32) -> f32 {
        // Sum outputs of all comb filters (parallel)
        let mut output = 0.0;
        for comb in &mut self.combs {
            output += comb.process(input);
        }
        output *= 0.25;

        self.allpass.process(output)
    }

    /// Reset all filter states
    pub fn reset(&mut self) {
        for comb in &mut self.combs {
            comb.reset();
        }
        self.allpass.reset();
    }
}
