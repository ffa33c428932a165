// Cooperative cancellation for the long-running O(n^2) phases.
//
// A `CancelToken` is a shared flag plus an optional deadline. The pipeline
// checks it at phase boundaries and periodically inside the table and
// completion loops; a cancelled check makes the current phase return
// `EngineError::Cancelled` and drop its local partial results. No state
// outlives a cancelled phase, so there is nothing to clean up.

use crate::error::EngineError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Shared cancellation flag with an optional deadline.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// A token that never fires unless `cancel` is called.
    pub fn new() -> Self {
        CancelToken::default()
    }

    /// A token that also fires once `timeout` has elapsed.
    pub fn with_deadline(timeout: Duration) -> Self {
        CancelToken {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Request cancellation. Safe to call from any thread; clones of this
    /// token observe it on their next check.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Checkpoint: `Err(Cancelled)` once the token has fired.
    pub fn check(&self) -> Result<(), EngineError> {
        if self.is_cancelled() {
            Err(EngineError::Cancelled)
        } else {
            Ok(())
        }
    }
}
