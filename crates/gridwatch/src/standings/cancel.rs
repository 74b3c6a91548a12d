//! Cancellation of in-flight standings runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

/// A cloneable flag used to stop an aggregation run between fetches.
///
/// Clones share the same flag, so the handle kept by a supervisor or signal
/// handler cancels the run that holds the other clone.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Hands out cancel tokens so that starting a run cancels the previous one.
///
/// When a user switches season while standings are still loading, the stale
/// run stops at its next fetch instead of racing the new one.
#[derive(Debug, Default)]
pub struct StandingsSupervisor {
    active: Option<CancelToken>,
    runs_started: u64,
}

impl StandingsSupervisor {
    /// Create a supervisor with no active run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the active run, if any, and return a token for a new one.
    pub fn begin_run(&mut self) -> CancelToken {
        if let Some(previous) = self.active.take() {
            debug!(run = self.runs_started, "cancelling superseded standings run");
            previous.cancel();
        }
        let token = CancelToken::new();
        self.active = Some(token.clone());
        self.runs_started += 1;
        token
    }

    /// Cancel the active run without starting another.
    pub fn cancel_active(&self) {
        if let Some(active) = &self.active {
            active.cancel();
        }
    }

    /// Token of the active run.
    #[must_use]
    pub fn active(&self) -> Option<&CancelToken> {
        self.active.as_ref()
    }

    /// Number of runs started so far.
    #[must_use]
    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }
}
