//! Batch rendering: drive an Offline engine to completion into a sink.

use tracing::{debug, info};

use crate::engine::config::RenderConfig;
use crate::engine::{EngineMode, SynthesisEngine};
use crate::error::{ConfigError, EngineError, EngineResult};
use crate::io::AudioSink;
use crate::BATCH_BLOCK_SIZE;

/// Seconds of audio between progress reports.
pub const PROGRESS_INTERVAL_SEC: f64 = 5.0;

/// `floor(duration × sample_rate)`.
pub fn total_frames(duration: f64, sample_rate: f64) -> u64 {
    (duration * sample_rate).floor() as u64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSummary {
    pub frames: u64,
    pub seconds: f64,
}

type ProgressFn = Box<dyn FnMut(f64)>;

pub struct Renderer {
    engine: SynthesisEngine,
    total: u64,
    progress: Option<ProgressFn>,
}

impl Renderer {
    /// Prepare an Offline engine for `config`.
    ///
    /// Configuration errors surface here, before any sink exists.
    pub fn new(config: &RenderConfig) -> EngineResult<Self> {
        Self::with_engine(SynthesisEngine::new(EngineMode::Offline), config)
    }

    /// Same as [`Renderer::new`] with a caller-built engine (e.g. custom
    /// capabilities).
    pub fn with_engine(mut engine: SynthesisEngine, config: &RenderConfig) -> EngineResult<Self> {
        engine.prepare(config)?;
        // Batch sessions need a length
        let total = engine.total_frames().ok_or(ConfigError::InvalidDuration {
            seconds: f64::INFINITY,
        })?;
        Ok(Self {
            engine,
            total,
            progress: None,
        })
    }

    /// Called with the completed fraction (0..=1) every five seconds of audio.
    pub fn on_progress(mut self, callback: impl FnMut(f64) + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn total_frames(&self) -> u64 {
        self.total
    }

    pub fn engine(&self) -> &SynthesisEngine {
        &self.engine
    }

    /// Render the whole session into `sink`, then finish it.
    pub fn render<S: AudioSink + ?Sized>(&mut self, sink: &mut S) -> EngineResult<RenderSummary> {
        let sample_rate = self.engine.sample_rate();
        let report_every = total_frames(PROGRESS_INTERVAL_SEC, sample_rate).max(1);
        let mut next_report = report_every;

        let mut left = vec![0.0f32; BATCH_BLOCK_SIZE];
        let mut right = vec![0.0f32; BATCH_BLOCK_SIZE];
        let mut written = 0u64;

        loop {
            let frames = self.engine.render_block(&mut left, &mut right)?;
            if frames == 0 {
                break;
            }

            if let Some(i) = left[..frames]
                .iter()
                .zip(&right[..frames])
                .position(|(l, r)| !l.is_finite() || !r.is_finite())
            {
                return Err(EngineError::NonFinite {
                    frame: written + i as u64,
                });
            }

            sink.write_block(&left[..frames], &right[..frames])?;
            written += frames as u64;

            if written >= next_report {
                let fraction = written as f64 / self.total as f64;
                debug!(frames = written, fraction, "render progress");
                if let Some(progress) = self.progress.as_mut() {
                    progress(fraction);
                }
                while next_report <= written {
                    next_report += report_every;
                }
            }
        }

        sink.finish()?;

        let summary = RenderSummary {
            frames: written,
            seconds: written as f64 / sample_rate,
        };
        info!(frames = summary.frames, seconds = summary.seconds, "render finished");
        Ok(summary)
    }
}
