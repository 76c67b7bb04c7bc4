// src/pool/mod.rs
// =============================================================================
// The fetch pipeline:
//
//   URL stream -> producer -> [work queue] -> N workers -> [result sink] -> collector
//                                                 |
//                                            coordinator (closes the sink)
//
// - work queue: bounded (capacity = worker count), many receivers
// - result sink: capacity 1, so each send is close to a direct hand-off
// - shutdown: source ends -> producer closes queue -> workers exit ->
//   coordinator closes sink -> collector returns
//
// There is no global cancel. Each task only has its own deadline.
// =============================================================================

mod collector;
mod coordinator;
mod producer;
mod task;
mod worker;

pub use collector::{collect, Summary};
pub use coordinator::spawn_coordinator;
pub use producer::spawn_producer;
pub use task::{ResultRecord, Task};
pub use worker::Worker;

use futures::Stream;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// How the pool should behave for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Number of workers; also the work queue capacity (at least 1 slot).
    /// Zero workers fetch nothing: the producer stops at its first send.
    pub workers: usize,
    /// Deadline applied to every task
    pub timeout: Duration,
    /// Report non-timeout failures as TransportError instead of dropping them
    pub report_failures: bool,
}

/// Starts `settings.workers` workers with ids 1..=N on the shared queue.
pub fn spawn_workers(
    settings: &PoolSettings,
    client: &Client,
    queue: async_channel::Receiver<Task>,
    results: &mpsc::Sender<ResultRecord>,
) -> Vec<JoinHandle<usize>> {
    (1..=settings.workers)
        .map(|id| {
            let worker = Worker::new(
                id,
                client.clone(),
                queue.clone(),
                results.clone(),
                settings.report_failures,
            );
            tokio::spawn(worker.run())
        })
        .collect()
}

/// Fetches every URL from `urls` and calls `on_record` for each result.
///
/// Returns once the source is exhausted and every worker has finished.
pub async fn run<S, F>(urls: S, settings: &PoolSettings, client: Client, on_record: F) -> Summary
where
    S: Stream<Item = String> + Send + 'static,
    F: FnMut(&ResultRecord),
{
    let (queue_tx, queue_rx) = async_channel::bounded(settings.workers.max(1));
    let (results_tx, results_rx) = mpsc::channel(1);

    let workers = spawn_workers(settings, &client, queue_rx, &results_tx);
    info!(workers = workers.len(), timeout = ?settings.timeout, "pool started");

    let producer = spawn_producer(urls, settings.timeout, queue_tx);
    let coordinator = spawn_coordinator(workers, results_tx);

    let mut summary = collect(results_rx, on_record).await;

    match producer.await {
        Ok(submitted) => summary.submitted = submitted,
        Err(e) => error!(error = %e, "producer did not finish cleanly"),
    }
    if let Err(e) = coordinator.await {
        error!(error = %e, "coordinator did not finish cleanly");
    }

    summary
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why async-channel for the work queue?
//    - tokio::sync::mpsc has exactly one receiver
//    - Every worker needs to pull from the same queue
//    - async_channel::Receiver is Clone, and each message goes to one receiver
//
// 2. Why does the coordinator hold the "original" result sender?
//    - An mpsc channel closes when the last Sender is dropped
//    - Workers drop their clones as they exit
//    - The coordinator drops the last one after joining all workers, so the
//      close happens exactly once, after every worker is done
//
// 3. Why spawn the producer and coordinator instead of awaiting them here?
//    - The collector has to drain results while both are still running
//    - Awaiting the coordinator first would deadlock once the sink is full
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use super::task::OutcomeKind;
    use crate::fixture;
    use futures::stream;
    use std::collections::HashSet;
    use std::io::Write;
    use std::time::Instant;

    fn settings(workers: usize, timeout_secs: u64) -> PoolSettings {
        PoolSettings {
            workers,
            timeout: Duration::from_secs(timeout_secs),
            report_failures: false,
        }
    }

    async fn run_urls(urls: Vec<String>, settings: &PoolSettings) -> (Vec<ResultRecord>, Summary) {
        let mut records = Vec::new();
        let summary = run(stream::iter(urls), settings, Client::new(), |r| {
            records.push(r.clone())
        })
        .await;
        (records, summary)
    }

    #[tokio::test]
    async fn test_single_fast_url() {
        let server = fixture::spawn().await;
        let (records, summary) = run_urls(vec![server.url("/fast")], &settings(1, 2)).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].outcome, OutcomeKind::Success);
        assert_eq!(records[0].body.as_deref(), Some("fast response\n"));
        assert_eq!(records[0].worker_id, 1);
        assert_eq!(summary.submitted, 1);
        assert_eq!(summary.dropped(), 0);
    }

    #[tokio::test]
    async fn test_single_slow_url_times_out() {
        let server = fixture::spawn().await;
        let started = Instant::now();
        let (records, summary) = run_urls(vec![server.url("/slow")], &settings(1, 1)).await;
        let elapsed = started.elapsed();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].outcome, OutcomeKind::TimeoutExceeded);
        assert!(records[0].body.is_none());
        assert_eq!(summary.timeout, 1);
        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_single_error_url() {
        let server = fixture::spawn().await;
        let (records, _) = run_urls(vec![server.url("/error")], &settings(1, 2)).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].outcome, OutcomeKind::HttpError);
        assert!(records[0]
            .body
            .as_deref()
            .unwrap()
            .contains("something went wrong"));
    }

    #[tokio::test]
    async fn test_mixed_urls_slow_finishes_last() {
        let server = fixture::spawn().await;
        let urls = vec![server.url("/fast"), server.url("/slow"), server.url("/error")];
        let (records, summary) = run_urls(urls, &settings(3, 2)).await;

        assert_eq!(records.len(), 3);
        assert_eq!(summary.success, 1);
        assert_eq!(summary.http_error, 1);
        assert_eq!(summary.timeout, 1);

        let last = records.last().unwrap();
        assert!(last.url.ends_with("/slow"));
        assert_eq!(last.outcome, OutcomeKind::TimeoutExceeded);
    }

    #[tokio::test]
    async fn test_every_worker_gets_a_task() {
        // Each /slow task keeps its worker busy for the whole timeout, so
        // three of them have to land on three different workers.
        let server = fixture::spawn().await;
        let urls = vec![server.url("/slow"); 3];
        let (records, _) = run_urls(urls, &settings(3, 1)).await;

        let ids: HashSet<usize> = records.iter().map(|r| r.worker_id).collect();
        assert_eq!(ids, HashSet::from([1, 2, 3]));
    }

    #[tokio::test]
    async fn test_worker_ids_stay_in_range() {
        let server = fixture::spawn().await;
        let urls = vec![server.url("/fast"); 20];
        let (records, summary) = run_urls(urls, &settings(4, 2)).await;

        assert_eq!(records.len(), 20);
        assert_eq!(summary.submitted, 20);
        assert!(records.iter().all(|r| (1..=4).contains(&r.worker_id)));
    }

    #[tokio::test]
    async fn test_terminates_when_every_request_fails() {
        let refused = fixture::refused_url().await;
        let urls = vec![refused.clone(), "not a url".to_string(), String::new(), refused];
        let (records, summary) = run_urls(urls, &settings(2, 1)).await;

        assert!(records.is_empty());
        assert_eq!(summary.submitted, 4);
        assert_eq!(summary.dropped(), 4);
    }

    #[tokio::test]
    async fn test_report_failures_gives_one_record_per_url() {
        let server = fixture::spawn().await;
        let urls = vec![
            server.url("/fast"),
            fixture::refused_url().await,
            "not a url".to_string(),
        ];
        let settings = PoolSettings {
            report_failures: true,
            ..settings(2, 2)
        };
        let (records, summary) = run_urls(urls, &settings).await;

        assert_eq!(records.len(), 3);
        assert_eq!(summary.transport_error, 2);
        assert_eq!(summary.dropped(), 0);
    }

    #[tokio::test]
    async fn test_empty_input_terminates() {
        let (records, summary) = run_urls(Vec::new(), &settings(3, 1)).await;
        assert!(records.is_empty());
        assert_eq!(summary, Summary::default());
    }

    #[tokio::test]
    async fn test_zero_workers_terminates_without_results() {
        let urls = vec!["http://127.0.0.1:1/fast".to_string(); 3];
        let (records, summary) = run_urls(urls, &settings(0, 1)).await;

        assert!(records.is_empty());
        assert_eq!(summary, Summary::default());
    }

    #[tokio::test]
    async fn test_url_file_through_pipeline() {
        let server = fixture::spawn().await;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", server.url("/fast")).unwrap();
        writeln!(file, "{}", server.url("/slow")).unwrap();
        writeln!(file, "{}", server.url("/error")).unwrap();

        let urls = crate::source::open_url_file(file.path()).await.unwrap();
        let mut records = Vec::new();
        let summary = run(urls, &settings(3, 2), Client::new(), |r| records.push(r.clone())).await;

        assert_eq!(records.len(), 3);
        assert_eq!(summary.submitted, 3);
        let last = records.last().unwrap();
        assert!(last.url.ends_with("/slow"));
        assert_eq!(last.outcome, OutcomeKind::TimeoutExceeded);
    }

    #[tokio::test]
    async fn test_more_urls_than_workers_with_one_worker() {
        let server = fixture::spawn().await;
        let urls = vec![server.url("/fast"), server.url("/error"), server.url("/fast")];
        let (records, _) = run_urls(urls, &settings(1, 2)).await;

        // A single worker preserves submission order
        let paths: Vec<&str> = records
            .iter()
            .map(|r| r.url.rsplit('/').next().unwrap())
            .collect();
        assert_eq!(paths, vec!["fast", "error", "fast"]);
    }
}
