// src/pool/worker.rs
// =============================================================================
// A worker pulls Tasks off the shared work queue one at a time, fetches the
// URL with a deadline, and sends exactly one ResultRecord per task to the
// collector (or none, when the task is dropped - see below).
//
// Per task:
// 1. Start the deadline clock (task.timeout)
// 2. Build and send a GET request, then read the whole body
// 3. Deadline hit at any point         -> TimeoutExceeded
// 4. Response received                 -> Success (< 400) / HttpError (>= 400)
// 5. Anything else (bad URL, refused,  -> logged and dropped, or reported as
//    DNS, broken body)                    TransportError with --report-failures
//
// Workers share nothing except the two channels and the HTTP client.
// =============================================================================

use async_channel::Receiver;
use reqwest::Client;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::task::{ResultRecord, Task};
use crate::error::FetchError;

/// What a fetch produced before classification.
struct Fetched {
    status: u16,
    body: String,
}

pub struct Worker {
    id: usize,
    client: Client,
    queue: Receiver<Task>,
    results: mpsc::Sender<ResultRecord>,
    report_failures: bool,
}

impl Worker {
    pub fn new(
        id: usize,
        client: Client,
        queue: Receiver<Task>,
        results: mpsc::Sender<ResultRecord>,
        report_failures: bool,
    ) -> Self {
        Worker {
            id,
            client,
            queue,
            results,
            report_failures,
        }
    }

    /// Processes tasks until the work queue is closed and empty.
    ///
    /// Returns how many tasks this worker took off the queue.
    pub async fn run(self) -> usize {
        debug!(worker = self.id, "worker started");
        let mut taken = 0;

        // recv() only fails once the producer is gone AND the queue is empty
        while let Ok(task) = self.queue.recv().await {
            taken += 1;
            let Some(record) = self.process(task).await else {
                continue;
            };

            // Blocks until the collector has room, so a slow collector
            // holds this worker back before it takes its next task.
            if self.results.send(record).await.is_err() {
                warn!(worker = self.id, "result sink closed, stopping worker");
                break;
            }
        }

        debug!(worker = self.id, tasks = taken, "worker finished");
        taken
    }

    /// Fetches one task and classifies the result.
    ///
    /// `None` means the task was dropped; the reason has been logged.
    pub async fn process(&self, task: Task) -> Option<ResultRecord> {
        let started = Instant::now();
        // The deadline covers the body read too: running out of time while
        // reading the body counts as TimeoutExceeded, not a dropped task.
        let result = tokio::time::timeout(task.timeout, fetch(&self.client, &task.url)).await;
        let elapsed = started.elapsed();

        match result {
            Err(_) => Some(ResultRecord::timed_out(task.url, self.id, elapsed)),
            Ok(Ok(Fetched { status, body })) => Some(ResultRecord::response(
                task.url, self.id, status, body, elapsed,
            )),
            Ok(Err(e)) if e.is_timeout() => Some(ResultRecord::timed_out(task.url, self.id, elapsed)),
            Ok(Err(e)) if self.report_failures => {
                debug!(worker = self.id, url = %task.url, error = %e, "reporting failed request");
                Some(ResultRecord::failed(task.url, self.id, e.to_string(), elapsed))
            }
            Ok(Err(e)) => {
                warn!(worker = self.id, url = %task.url, error = %e, "dropping task");
                None
            }
        }
    }
}

/// Sends one GET request and reads the full body.
async fn fetch(client: &Client, url: &str) -> Result<Fetched, FetchError> {
    let request = client.get(url).build().map_err(FetchError::Build)?;
    let response = client.execute(request).await.map_err(FetchError::Transport)?;
    let status = response.status().as_u16();
    let bytes = response.bytes().await.map_err(FetchError::Body)?;

    Ok(Fetched {
        status,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    })
}
