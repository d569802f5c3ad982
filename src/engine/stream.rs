//! Streaming adapter: host lifecycle around a Live engine.
//!
//! ```text
//!  control thread                     audio thread
//!  ──────────────                     ────────────
//!  SharedParams::set_*  ──atomics──→  snapshot() once per block
//!                                          │
//!                                     update_live (ramped)
//!                                          │
//!                                     render_block ──→ host buffer
//!                                          │
//!  meter consumer  ←──── rtrb ──────  BlockMeter
//! ```
//!
//! Nothing on the audio side allocates or locks once `prepare` returns.

use std::mem;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tracing::debug;

#[cfg(feature = "rtrb")]
use crate::engine::meter::{BlockMeter, MeterTap};
use crate::engine::config::RenderConfig;
use crate::engine::{EngineMode, EngineState, SynthesisEngine};
use crate::error::EngineResult;
use crate::params::LiveParams;
use crate::MAX_BLOCK_SIZE;

/// An `f32` shared between threads as its bit pattern.
#[derive(Debug)]
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Live parameters written by a control thread and read by the audio thread.
///
/// Setters clamp to the registered ranges, so the reader never sees an
/// out-of-range value.
#[derive(Debug)]
pub struct SharedParams {
    pulse_hz: AtomicF32,
    carrier_hz: AtomicF32,
    softness: AtomicF32,
    gain_db: AtomicF32,
}

impl SharedParams {
    pub fn new(initial: LiveParams) -> Self {
        let initial = initial.clamped();
        Self {
            pulse_hz: AtomicF32::new(initial.pulse_hz),
            carrier_hz: AtomicF32::new(initial.carrier_hz),
            softness: AtomicF32::new(initial.softness),
            gain_db: AtomicF32::new(initial.gain_db),
        }
    }

    pub fn set_pulse_hz(&self, hz: f32) {
        let (lo, hi) = LiveParams::PULSE_RANGE;
        self.pulse_hz.store(hz.clamp(lo, hi));
    }

    pub fn set_carrier_hz(&self, hz: f32) {
        let (lo, hi) = LiveParams::CARRIER_RANGE;
        self.carrier_hz.store(hz.clamp(lo, hi));
    }

    pub fn set_softness(&self, softness: f32) {
        let (lo, hi) = LiveParams::SOFTNESS_RANGE;
        self.softness.store(softness.clamp(lo, hi));
    }

    pub fn set_gain_db(&self, db: f32) {
        let (lo, hi) = LiveParams::GAIN_DB_RANGE;
        self.gain_db.store(db.clamp(lo, hi));
    }

    /// One relaxed load per parameter.
    #[inline]
    pub fn snapshot(&self) -> LiveParams {
        LiveParams {
            pulse_hz: self.pulse_hz.load(),
            carrier_hz: self.carrier_hz.load(),
            softness: self.softness.load(),
            gain_db: self.gain_db.load(),
        }
    }
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new(LiveParams::default())
    }
}

/// Host lifecycle for a realtime processor.
pub trait AudioProcessor {
    /// Allocate and reset for a stream. Not realtime-safe.
    fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> EngineResult<()>;

    /// Fill both channels. Realtime-safe.
    fn process_block(&mut self, left: &mut [f32], right: &mut [f32]);

    fn release(&mut self);
}

pub struct StreamProcessor {
    engine: SynthesisEngine,
    params: Arc<SharedParams>,
    smoothing: bool,
    scratch_left: Vec<f32>,
    scratch_right: Vec<f32>,
    #[cfg(feature = "rtrb")]
    meter: Option<MeterTap>,
}

impl StreamProcessor {
    pub fn new(params: Arc<SharedParams>) -> Self {
        Self {
            engine: SynthesisEngine::new(EngineMode::Live),
            params,
            smoothing: true,
            scratch_left: Vec::new(),
            scratch_right: Vec::new(),
            #[cfg(feature = "rtrb")]
            meter: None,
        }
    }

    /// Ramp parameter changes across each block (default) or apply them at
    /// the block boundary.
    pub fn with_smoothing(mut self, enabled: bool) -> Self {
        self.smoothing = enabled;
        self
    }

    #[cfg(feature = "rtrb")]
    pub fn with_meter(mut self, meter: MeterTap) -> Self {
        self.meter = Some(meter);
        self
    }

    pub fn engine(&self) -> &SynthesisEngine {
        &self.engine
    }

    pub fn params(&self) -> &Arc<SharedParams> {
        &self.params
    }

    /// Render into a host-interleaved buffer with `channels` channels.
    ///
    /// Work is split into chunks of at most the prepared block size. Even
    /// channels carry the left signal, odd channels the right.
    pub fn process_interleaved(&mut self, data: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }

        let mut left = mem::take(&mut self.scratch_left);
        let mut right = mem::take(&mut self.scratch_right);
        let chunk_frames = left.len().min(right.len());

        if chunk_frames == 0 {
            data.fill(0.0);
        } else {
            for chunk in data.chunks_mut(chunk_frames * channels) {
                let frames = chunk.len() / channels;
                let (l, r) = (&mut left[..frames], &mut right[..frames]);
                self.process_block(l, r);

                for (i, frame) in chunk.chunks_mut(channels).enumerate() {
                    for (ch, sample) in frame.iter_mut().enumerate() {
                        // A trailing partial frame has no source sample
                        *sample = match (i < frames, ch % 2) {
                            (false, _) => 0.0,
                            (true, 0) => l[i],
                            (true, _) => r[i],
                        };
                    }
                }
            }
        }

        self.scratch_left = left;
        self.scratch_right = right;
    }
}

impl AudioProcessor for StreamProcessor {
    fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> EngineResult<()> {
        let block = max_block_size.clamp(1, MAX_BLOCK_SIZE);
        self.scratch_left.resize(block, 0.0);
        self.scratch_right.resize(block, 0.0);

        let initial = self.params.snapshot();
        let config = RenderConfig::new(initial.to_parameters()).sample_rate(sample_rate);
        self.engine.prepare(&config)?;

        debug!(sample_rate, block, smoothing = self.smoothing, "stream prepared");
        Ok(())
    }

    fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        if self.engine.state() != EngineState::Rendering {
            left.fill(0.0);
            right.fill(0.0);
            return;
        }

        let frames = left.len().min(right.len());
        let ramp = if self.smoothing { frames as u32 } else { 0 };
        let live = self.params.snapshot();
        self.engine.update_live(&live, ramp);

        if self.engine.render_block(left, right).is_err() {
            left.fill(0.0);
            right.fill(0.0);
        }

        #[cfg(feature = "rtrb")]
        if let Some(meter) = self.meter.as_mut() {
            meter.push(BlockMeter::measure(&left[..frames], &right[..frames]));
        }
    }

    fn release(&mut self) {
        self.engine.release();
        debug!("stream released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepared(params: LiveParams) -> StreamProcessor {
        let mut processor = StreamProcessor::new(Arc::new(SharedParams::new(params)));
        processor.prepare(48_000.0, 512).unwrap();
        processor
    }

    #[test]
    fn test_setters_clamp() {
        let shared = SharedParams::default();
        shared.set_pulse_hz(0.0);
        shared.set_carrier_hz(5_000.0);
        shared.set_softness(-1.0);
        shared.set_gain_db(6.0);

        let snap = shared.snapshot();
        assert_eq!(snap.pulse_hz, 0.5);
        assert_eq!(snap.carrier_hz, 1000.0);
        assert_eq!(snap.softness, 0.0);
        assert_eq!(snap.gain_db, 0.0);
    }

    #[test]
    fn test_unprepared_outputs_silence() {
        let mut processor = StreamProcessor::new(Arc::new(SharedParams::default()));
        let mut left = [1.0; 64];
        let mut right = [1.0; 64];
        processor.process_block(&mut left, &mut right);
        assert!(left.iter().chain(&right).all(|&s| s == 0.0));
    }

    #[test]
    fn test_live_output_stays_below_knee_at_unity() {
        let mut processor = prepared(LiveParams {
            gain_db: 0.0,
            ..LiveParams::default()
        });
        let mut left = vec![0.0; 512];
        let mut right = vec![0.0; 512];
        for _ in 0..100 {
            processor.process_block(&mut left, &mut right);
            assert!(left.iter().all(|s| s.abs() <= 0.911));
            assert_eq!(left, right);
        }
    }

    #[test]
    fn test_parameter_change_is_picked_up_next_block() {
        let mut processor = prepared(LiveParams::default());
        let mut left = vec![0.0; 256];
        let mut right = vec![0.0; 256];
        processor.process_block(&mut left, &mut right);

        processor.params().set_carrier_hz(880.0);
        processor.process_block(&mut left, &mut right);
        assert_eq!(processor.engine().params().carrier_hz, 880.0);
        // Ramped over the block, lands on the target at its last frame
        assert_eq!(processor.engine().last_frequencies().carrier_hz, 880.0);
    }

    #[test]
    fn test_interleaved_stereo_matches_planar() {
        let mut planar = prepared(LiveParams::default());
        let mut interleaved = prepared(LiveParams::default());

        let mut left = vec![0.0; 1000];
        let mut right = vec![0.0; 1000];
        // Planar reference in the same chunking the interleaved path uses
        planar.process_block(&mut left[..512], &mut right[..512]);
        planar.process_block(&mut left[512..], &mut right[512..]);

        let mut data = vec![0.0; 2000];
        interleaved.process_interleaved(&mut data, 2);

        for i in 0..1000 {
            assert_eq!(data[2 * i], left[i]);
            assert_eq!(data[2 * i + 1], right[i]);
        }
    }

    #[test]
    fn test_interleaved_fills_every_channel() {
        let mut processor = prepared(LiveParams {
            gain_db: 0.0,
            ..LiveParams::default()
        });
        let mut data = vec![f32::NAN; 4 * 300];
        processor.process_interleaved(&mut data, 4);
        assert!(data.iter().all(|s| s.is_finite()));
        for frame in data.chunks(4) {
            assert_eq!(frame[0], frame[2]);
            assert_eq!(frame[1], frame[3]);
        }
    }

    #[test]
    fn test_release_returns_to_idle() {
        let mut processor = prepared(LiveParams::default());
        processor.release();
        assert_eq!(processor.engine().state(), EngineState::Idle);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn test_meter_receives_one_entry_per_block() {
        use crate::engine::meter::MeterReceiver;

        let (tap, mut rx) = MeterTap::new(8);
        let mut processor =
            StreamProcessor::new(Arc::new(SharedParams::default())).with_meter(tap);
        processor.prepare(44_100.0, 256).unwrap();

        let mut left = vec![0.0; 256];
        let mut right = vec![0.0; 256];
        for _ in 0..3 {
            processor.process_block(&mut left, &mut right);
        }

        let mut count = 0;
        while let Some(meter) = MeterReceiver::pop(&mut rx) {
            assert_eq!(meter.frames, 256);
            assert!(meter.peak < 1.0);
            count += 1;
        }
        assert_eq!(count, 3);
    }
}
