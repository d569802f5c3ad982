//! Level meter tap from the audio thread to a UI/logging thread.
//!
//! The audio side pushes one [`BlockMeter`] per processed block into a
//! wait-free SPSC ring; when the reader falls behind, entries are dropped
//! rather than blocking the audio callback.

use rtrb::{Consumer, Producer, RingBuffer};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BlockMeter {
    /// Largest absolute sample across both channels.
    pub peak: f32,
    pub frames: u32,
}

impl BlockMeter {
    pub fn measure(left: &[f32], right: &[f32]) -> Self {
        let peak = left
            .iter()
            .chain(right)
            .fold(0.0f32, |acc, &s| acc.max(s.abs()));
        Self {
            peak,
            frames: left.len().min(right.len()) as u32,
        }
    }
}

pub trait MeterReceiver {
    fn pop(&mut self) -> Option<BlockMeter>;
}

impl MeterReceiver for Consumer<BlockMeter> {
    fn pop(&mut self) -> Option<BlockMeter> {
        Consumer::pop(self).ok()
    }
}

pub struct MeterTap {
    producer: Producer<BlockMeter>,
    dropped: u64,
}

impl MeterTap {
    /// Create a tap and the consumer end of its ring.
    pub fn new(capacity: usize) -> (Self, Consumer<BlockMeter>) {
        let (producer, consumer) = RingBuffer::new(capacity);
        (
            Self {
                producer,
                dropped: 0,
            },
            consumer,
        )
    }

    /// Push without blocking. Returns false if the ring was full.
    pub fn push(&mut self, meter: BlockMeter) -> bool {
        match self.producer.push(meter) {
            Ok(()) => true,
            Err(_) => {
                self.dropped += 1;
                false
            }
        }
    }

    /// Entries discarded because the ring was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
