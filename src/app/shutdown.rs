//! Graceful shutdown handling.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::location::NodeHandle;

/// Stops a spawned node and waits for its task to finish.
///
/// Pending requests are cancelled by the node itself. The join is bounded by
/// `grace`; a task that does not finish in time is left to the runtime.
pub async fn shutdown_gracefully(handle: &NodeHandle, task: JoinHandle<()>, grace: Duration) {
    handle.shutdown();
    match tokio::time::timeout(grace, task).await {
        Ok(Ok(())) => {}
        Ok(Err(join_error)) => log::warn!("Location node task failed: {:?}", join_error),
        Err(_) => log::warn!(
            "Location node did not stop within {:.1}s",
            grace.as_secs_f64()
        ),
    }
}
