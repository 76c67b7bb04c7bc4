// src/pool/producer.rs
// =============================================================================
// Turns a stream of URLs into Tasks on the bounded work queue.
//
// The queue holds at most `workers` tasks, so once every worker is busy and
// the queue is full, send() waits - that is the only backpressure in the
// pipeline. Dropping the sender at the end closes the queue, which is how
// workers learn there is nothing left.
// =============================================================================

use async_channel::Sender;
use futures::{Stream, StreamExt};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::task::Task;

/// Spawns the producer. The handle resolves to the number of tasks queued.
pub fn spawn_producer<S>(urls: S, timeout: Duration, queue: Sender<Task>) -> JoinHandle<usize>
where
    S: Stream<Item = String> + Send + 'static,
{
    tokio::spawn(async move {
        let mut urls = Box::pin(urls);
        let mut submitted = 0;

        while let Some(url) = urls.next().await {
            if let Err(e) = queue.send(Task::new(url, timeout)).await {
                // Only happens if every worker is gone
                let task = e.into_inner();
                warn!(url = %task.url, "work queue closed early, stopping producer");
                break;
            }
            submitted += 1;
        }

        queue.close();
        debug!(tasks = submitted, "work queue closed");
        submitted
    })
}
