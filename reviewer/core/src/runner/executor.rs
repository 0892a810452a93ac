//! Task Executor
//!
//! Runs the caller's blocking operation on tokio's blocking pool so the
//! render loop never waits on it, then reports the result as exactly one
//! [`Event::TaskFinished`].

use anyhow::anyhow;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

use super::events::Event;

/// Spawns operations off the render path
pub struct TaskExecutor;

impl TaskExecutor {
    /// Start `operation` and forward its result to `events`.
    ///
    /// A panicking operation still produces one `TaskFinished`, carrying an
    /// error. If the receiver is gone by the time the operation returns, the
    /// result is dropped.
    pub fn spawn<F>(operation: F, events: mpsc::Sender<Event>) -> JoinHandle<()>
    where
        F: FnOnce() -> anyhow::Result<String> + Send + 'static,
    {
        tokio::spawn(async move {
            let result = match tokio::task::spawn_blocking(operation).await {
                Ok(result) => result,
                Err(join_err) => {
                    tracing::error!(error = %join_err, "operation did not complete");
                    Err(join_failure(&join_err))
                }
            };

            match &result {
                Ok(text) => tracing::debug!(chars = text.len(), "operation finished"),
                Err(err) => tracing::debug!(error = %err, "operation failed"),
            }

            if events.send(Event::TaskFinished(result)).await.is_err() {
                tracing::debug!("runner already exited, dropping operation result");
            }
        })
    }
}

/// Describe why the operation produced no result
fn join_failure(err: &JoinError) -> anyhow::Error {
    if err.is_panic() {
        anyhow!("operation panicked: {err}")
    } else {
        anyhow!("operation was cancelled before it finished")
    }
}
