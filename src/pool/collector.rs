// src/pool/collector.rs
// =============================================================================
// Drains the result sink until the coordinator closes it.
//
// Records arrive in completion order, not submission order. Each one is
// handed to a callback (the reporter in main.rs) and tallied in a Summary.
// =============================================================================

use tokio::sync::mpsc;

use super::task::{OutcomeKind, ResultRecord};

/// Totals for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Tasks the producer put on the work queue
    pub submitted: usize,
    pub success: usize,
    pub http_error: usize,
    pub timeout: usize,
    pub transport_error: usize,
}

impl Summary {
    pub fn record(&mut self, outcome: OutcomeKind) {
        match outcome {
            OutcomeKind::Success => self.success += 1,
            OutcomeKind::HttpError => self.http_error += 1,
            OutcomeKind::TimeoutExceeded => self.timeout += 1,
            OutcomeKind::TransportError => self.transport_error += 1,
        }
    }

    /// Number of records the collector received.
    pub fn reported(&self) -> usize {
        self.success + self.http_error + self.timeout + self.transport_error
    }

    /// Tasks that were submitted but never produced a record.
    pub fn dropped(&self) -> usize {
        self.submitted.saturating_sub(self.reported())
    }
}

/// Receives every record until the channel is closed.
pub async fn collect<F>(mut results: mpsc::Receiver<ResultRecord>, mut on_record: F) -> Summary
where
    F: FnMut(&ResultRecord),
{
    let mut summary = Summary::default();
    while let Some(record) = results.recv().await {
        summary.record(record.outcome);
        on_record(&record);
    }
    summary
}
