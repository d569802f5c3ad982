// Purpose - where rendered audio goes: file writers and in-memory capture

pub mod wav;

use crate::error::EngineResult;

pub use self::wav::WavSink;

/// Destination for planar stereo blocks produced by the renderer.
pub trait AudioSink {
    /// Append one block. `left` and `right` always have the same length.
    fn write_block(&mut self, left: &[f32], right: &[f32]) -> EngineResult<()>;

    /// Flush and close. Called once after the last block.
    fn finish(&mut self) -> EngineResult<()> {
        Ok(())
    }
}

/// Collects everything in memory. Used by tests and for previews.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub buffers: [Vec<f32>; 2],
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn left(&self) -> &[f32] {
        &self.buffers[0]
    }

    pub fn right(&self) -> &[f32] {
        &self.buffers[1]
    }

    pub fn frames(&self) -> usize {
        self.buffers[0].len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// L/R interleaved copy, the layout WAV files and most hosts use.
    pub fn interleaved(&self) -> Vec<f32> {
        self.left()
            .iter()
            .zip(self.right())
            .flat_map(|(&l, &r)| [l, r])
            .collect()
    }
}

impl AudioSink for MemorySink {
    fn write_block(&mut self, left: &[f32], right: &[f32]) -> EngineResult<()> {
        self.buffers[0].extend_from_slice(left);
        self.buffers[1].extend_from_slice(right);
        Ok(())
    }

    fn finish(&mut self) -> EngineResult<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_interleaves() {
        let mut sink = MemorySink::new();
        sink.write_block(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        sink.write_block(&[3.0], &[-3.0]).unwrap();
        sink.finish().unwrap();

        assert_eq!(sink.frames(), 3);
        assert!(sink.is_finished());
        assert_eq!(sink.interleaved(), vec![1.0, -1.0, 2.0, -2.0, 3.0, -3.0]);
    }
}
