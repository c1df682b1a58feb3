//! Per-channel frame buffer.
//!
//! An append-only sequence of mono f32 sample blocks as delivered by the
//! capture callback. Each buffer is owned by exactly one capture worker
//! while recording and is moved out wholesale when the worker is joined,
//! so no locking is needed around the sample data itself.

use crate::audio::SAMPLE_RATE;

/// Accumulated audio for one channel: ordered blocks of mono f32 samples
/// in [-1.0, 1.0] at the fixed 16 kHz rate.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    blocks: Vec<Vec<f32>>,
    total_samples: usize,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one block of samples.
    pub fn push_block(&mut self, block: Vec<f32>) {
        self.total_samples += block.len();
        self.blocks.push(block);
    }

    /// Number of samples across all blocks.
    pub fn len(&self) -> usize {
        self.total_samples
    }

    pub fn is_empty(&self) -> bool {
        self.total_samples == 0
    }

    /// Recorded duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.total_samples as f64 / SAMPLE_RATE as f64
    }

    /// Iterates over all samples in capture order.
    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        self.blocks.iter().flatten().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_accumulates_in_order() {
        let mut buffer = FrameBuffer::new();
        assert!(buffer.is_empty());

        buffer.push_block(vec![0.1, 0.2]);
        buffer.push_block(vec![0.3]);

        assert_eq!(buffer.len(), 3);
        assert!(!buffer.is_empty());
        let collected: Vec<f32> = buffer.samples().collect();
        assert_eq!(collected, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn duration_follows_sample_count() {
        let mut buffer = FrameBuffer::new();
        buffer.push_block(vec![0.0; SAMPLE_RATE as usize]);
        assert!((buffer.duration_seconds() - 1.0).abs() < 1e-9);

        buffer.push_block(vec![0.0; SAMPLE_RATE as usize / 2]);
        assert!((buffer.duration_seconds() - 1.5).abs() < 1e-9);
    }
}
