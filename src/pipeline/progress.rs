//! Cooperative cancellation and progress reporting.

use image::RgbImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation signal shared with in-flight label tasks.
///
/// Each task checks the token before starting work; a cancelled task exits
/// without producing an outcome and without raising an error. Results of
/// tasks that already completed are still honored.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Receiver for pipeline progress.
///
/// Implementations must be safe to call from concurrent label tasks. Frame
/// snapshots are best-effort: intermediate frames may be superseded by later
/// ones, but the final composite after all tasks reflects every label.
pub trait ProgressSink: Send + Sync {
    /// Called after each label task finishes, with completed and total
    /// label counts.
    fn on_progress(&self, completed: usize, total: usize) {
        let _ = (completed, total);
    }

    /// Called with a snapshot of the annotated image after each draw.
    fn on_frame(&self, frame: &RgbImage) {
        let _ = frame;
    }
}

/// A sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {}
