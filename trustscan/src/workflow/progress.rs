//! Progress label ticker
//!
//! Cosmetic only: while an oracle call is outstanding the UI cycles through
//! [`PROGRESS_LABELS`], one step per period, stopping on the last label.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Labels shown while a search or audit is in flight
pub const PROGRESS_LABELS: [&str; 4] = [
    "Scanning web feedback...",
    "Analyzing review metadata...",
    "Verifying profile patterns...",
    "Calculating confidence...",
];

pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(2);

/// Label for a step index, capped at the last label
pub fn progress_label(step: usize) -> &'static str {
    PROGRESS_LABELS[step.min(PROGRESS_LABELS.len() - 1)]
}

/// Owned handle to a running ticker task
///
/// The task is aborted when the handle is dropped, so whoever owns the
/// handle owns the timer's lifetime.
#[derive(Debug)]
pub struct ProgressTicker {
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    /// Spawn a ticker calling `on_tick` once per `period`
    ///
    /// Ticks stop after the last label has been reached or as soon as
    /// `on_tick` returns `false`.
    pub fn start<F, Fut>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            for _ in 1..PROGRESS_LABELS.len() {
                tokio::time::sleep(period).await;
                if !on_tick().await {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// True while the ticker task is still running
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
