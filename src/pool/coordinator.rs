// src/pool/coordinator.rs
// =============================================================================
// Closes the result sink once every worker has finished.
//
// Each worker owns a clone of the result sender; the coordinator owns the
// original. It waits on every worker handle and only then drops its sender,
// so the collector sees the channel close exactly once, after the last
// worker is done. It runs as its own task so the collector can keep
// draining while workers finish.
// =============================================================================

use futures::future::join_all;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::task::ResultRecord;

/// Spawns the coordinator. The handle resolves to the number of workers
/// that panicked (normally zero).
pub fn spawn_coordinator(
    workers: Vec<JoinHandle<usize>>,
    results: mpsc::Sender<ResultRecord>,
) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut panicked = 0;
        for (idx, joined) in join_all(workers).await.into_iter().enumerate() {
            if let Err(e) = joined {
                error!(worker = idx + 1, error = %e, "worker did not finish cleanly");
                panicked += 1;
            }
        }

        drop(results);
        debug!("all workers finished, result sink closed");
        panicked
    })
}
