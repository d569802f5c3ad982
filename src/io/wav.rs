//! Stereo 24-bit PCM WAV output.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::{EngineError, EngineResult};
use crate::io::AudioSink;

pub const BITS_PER_SAMPLE: u16 = 24;
/// Full-scale value for 24-bit signed samples (2^23 - 1).
pub const FULL_SCALE_24: f32 = 8_388_607.0;

/// Quantize one sample to 24-bit, clamping to [-1, 1] first.
#[inline]
pub fn to_pcm24(sample: f32) -> i32 {
    (sample.clamp(-1.0, 1.0) * FULL_SCALE_24) as i32
}

pub struct WavSink {
    path: PathBuf,
    writer: Option<WavWriter<BufWriter<File>>>,
}

impl WavSink {
    /// Create (or truncate) `path` as a stereo 24-bit integer WAV.
    pub fn create(path: impl AsRef<Path>, sample_rate: u32) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();
        let spec = WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: BITS_PER_SAMPLE,
            sample_format: SampleFormat::Int,
        };
        let writer = WavWriter::create(&path, spec).map_err(|source| EngineError::OpenOutput {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            writer: Some(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AudioSink for WavSink {
    fn write_block(&mut self, left: &[f32], right: &[f32]) -> EngineResult<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        for (&l, &r) in left.iter().zip(right) {
            writer.write_sample(to_pcm24(l)).map_err(EngineError::Write)?;
            writer.write_sample(to_pcm24(r)).map_err(EngineError::Write)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> EngineResult<()> {
        match self.writer.take() {
            Some(writer) => writer.finalize().map_err(EngineError::Write),
            None => Ok(()),
        }
    }
}
