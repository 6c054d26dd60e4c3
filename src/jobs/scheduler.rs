// src/jobs/scheduler.rs
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::JobBoard;

/// Spawn the periodic job-board refresh. The first tick fires after one
/// full interval; startup traffic is served through the cache-aware
/// `JobBoard::snapshot` path instead.
pub fn spawn_refresh_task(board: Arc<JobBoard>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            match board.refresh().await {
                Ok(snap) => {
                    tracing::info!(jobs = snap.jobs.len(), "scheduled job refresh done");
                }
                Err(e) => {
                    tracing::warn!(error = ?e, "scheduled job refresh failed");
                }
            }
        }
    })
}
