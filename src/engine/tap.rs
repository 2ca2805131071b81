//! Lock-free copy of the mixed output for meters and scopes.

use rtrb::{Consumer, Producer, RingBuffer};

/// Producer half living inside the mixer state.
///
/// The audio thread never waits on the reader: whatever does not fit into
/// the ring is dropped, a whole block at a time, and counted.
pub struct OutputTap {
    producer: Producer<f32>,
    dropped: u64,
}

impl OutputTap {
    /// Create a tap holding up to `capacity` interleaved samples.
    pub fn new(capacity: usize) -> (Self, Consumer<f32>) {
        let (producer, consumer) = RingBuffer::new(capacity.max(1));
        (
            Self {
                producer,
                dropped: 0,
            },
            consumer,
        )
    }

    /// Copy one interleaved block, or none of it if the ring lacks room.
    ///
    /// Blocks are never split, so the reader always sees whole frames.
    pub fn push_block(&mut self, block: &[f32]) {
        if self.producer.slots() < block.len() {
            self.dropped += block.len() as u64;
            return;
        }
        for &sample in block {
            if self.producer.push(sample).is_err() {
                break;
            }
        }
    }

    /// Samples discarded because the reader fell behind
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// True once the consumer half has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.producer.is_abandoned()
    }
}
