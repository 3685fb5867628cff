//! Background sweep of expired sessions.
//!
//! Expired rows are already invisible to lookups; the sweep only reclaims
//! their space. It is best-effort: a failed sweep is reported and the next
//! tick tries again.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::{JoinHandle, spawn_blocking};
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Receives the outcome of each cleanup sweep.
///
/// Inject a custom reporter to route sweep results somewhere other than
/// `tracing`, or to observe them in tests.
pub trait CleanupReporter: Send + Sync {
    /// A sweep completed and removed `removed` rows.
    fn swept(&self, _removed: usize) {}

    /// A sweep failed. The task keeps running.
    fn sweep_failed(&self, error: &Error);
}

/// Reports sweep results through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl CleanupReporter for TracingReporter {
    fn swept(&self, removed: usize) {
        if removed > 0 {
            info!(evicted = removed, "Session cleanup completed");
        } else {
            debug!("Session cleanup: no expired sessions");
        }
    }

    fn sweep_failed(&self, error: &Error) {
        warn!(error = %error, "Session cleanup failed");
    }
}

/// Handle to a running cleanup task.
///
/// Stopping is idempotent, and dropping the handle stops the task.
#[derive(Debug)]
pub struct CleanupTask {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl CleanupTask {
    /// Spawn a task on the current Tokio runtime that calls `sweep` every
    /// `period`. The first sweep happens one full period after spawning.
    ///
    /// `period` must be non-zero.
    pub(crate) fn spawn<F>(
        period: Duration,
        sweep: F,
        reporter: Arc<dyn CleanupReporter>,
    ) -> Result<Self>
    where
        F: Fn() -> Result<usize> + Send + Sync + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let cancel = CancellationToken::new();
        let stopped = cancel.clone();
        let sweep = Arc::new(sweep);

        let handle = runtime.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // Skip the first immediate tick
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = stopped.cancelled() => break,
                    _ = ticker.tick() => {
                        // The sweep locks the shared connection and runs SQL
                        let sweep = Arc::clone(&sweep);
                        match spawn_blocking(move || sweep()).await {
                            Ok(Ok(removed)) => reporter.swept(removed),
                            Ok(Err(e)) => reporter.sweep_failed(&e),
                            Err(e) => reporter.sweep_failed(&Error::Task(e)),
                        }
                    }
                }
            }

            debug!("Session cleanup task stopped");
        });

        debug!(interval = ?period, "Session cleanup task started");

        Ok(Self {
            cancel,
            handle: Some(handle),
        })
    }

    /// Signal the task to stop. Safe to call more than once.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Whether the task has neither been stopped nor exited.
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the task and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Session cleanup task ended abnormally");
            }
        }
    }
}

impl Drop for CleanupTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
