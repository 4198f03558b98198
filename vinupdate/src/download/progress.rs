//! Progress reporting and cancellation for a download session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Progress callback.
///
/// # Arguments
///
/// * `session_bytes` - Bytes appended during this session
/// * `expected_bytes` - Bytes this session is expected to transfer, if known
pub type ProgressCallback = Box<dyn Fn(u64, Option<u64>) + Send + Sync>;

/// Shared flag that aborts a transfer between chunks.
///
/// Cancelling leaves the partial file in place so the next run resumes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
