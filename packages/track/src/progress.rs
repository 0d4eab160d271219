//! Progress reporting for track building.
//!
//! [`ProgressCallback`] decouples per-group progress from any rendering
//! backend. The CLI supplies an `indicatif` bar; library callers and tests
//! use [`NullProgress`].

use std::sync::Arc;

/// Receives progress updates while storm-year groups are built.
///
/// Implementations must be `Send + Sync` so that the parallel builder can
/// report from worker threads.
pub trait ProgressCallback: Send + Sync {
    /// Set the total number of groups to build.
    fn set_total(&self, total: u64);

    /// Advance progress by `delta` groups.
    fn inc(&self, delta: u64);

    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// A [`ProgressCallback`] that ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance for convenient use.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
