use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::Sender;

/// Receives one tick per converted voxel.
pub trait ProgressSink {
    fn tick(&self);
}

/// Discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn tick(&self) {}
}

impl ProgressSink for AtomicU64 {
    fn tick(&self) {
        self.fetch_add(1, Ordering::Relaxed);
    }
}

impl ProgressSink for Sender<u64> {
    fn tick(&self) {
        // Err only when the receiver is gone.
        let _ = self.send(1);
    }
}

/// Consumer side of batch progress, e.g. a terminal progress bar.
pub trait ProgressDisplay {
    /// Called once, before any worker starts, with the pre-scanned total.
    fn set_total(&mut self, total: u64);
    fn advance(&mut self, delta: u64);
    /// Called once after every worker has terminated.
    fn finish(&mut self);
}

/// A display that shows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl ProgressDisplay for NullDisplay {
    fn set_total(&mut self, _total: u64) {}
    fn advance(&mut self, _delta: u64) {}
    fn finish(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_sink_counts() {
        let counter = AtomicU64::new(0);
        for _ in 0..5 {
            counter.tick();
        }
        assert_eq!(counter.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn test_channel_sink_sends_unit_ticks() {
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.tick();
        tx.tick();
        drop(tx);
        assert_eq!(rx.iter().collect::<Vec<u64>>(), vec![1, 1]);
    }

    #[test]
    fn test_channel_sink_ignores_closed_receiver() {
        let (tx, rx) = crossbeam_channel::unbounded::<u64>();
        drop(rx);
        tx.tick();
    }
}
