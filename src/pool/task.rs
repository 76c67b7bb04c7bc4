// src/pool/task.rs
// =============================================================================
// The data that flows through the pool:
// - Task: one URL plus its timeout, sent from the producer to a worker
// - ResultRecord: what a worker learned about one Task, sent to the collector
// - OutcomeKind: the tag on every ResultRecord
//
// Both structs are created once and never mutated afterwards; they are
// moved through the channels, so each one has exactly one owner at a time.
// =============================================================================

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// One unit of work for the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub url: String,
    pub timeout: Duration,
}

impl Task {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Task {
            url: url.into(),
            timeout,
        }
    }
}

/// How a fetch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Status below 400, body captured
    Success,
    /// Status 400 or above, body captured
    HttpError,
    /// No complete response before the task's deadline
    TimeoutExceeded,
    /// Request could not be built or sent (only with --report-failures)
    TransportError,
}

impl OutcomeKind {
    /// Classifies a received HTTP status code.
    pub fn from_status(status: u16) -> Self {
        if status < 400 {
            OutcomeKind::Success
        } else {
            OutcomeKind::HttpError
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::HttpError => "http_error",
            OutcomeKind::TimeoutExceeded => "timeout_exceeded",
            OutcomeKind::TransportError => "transport_error",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of attempting one Task.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRecord {
    pub url: String,
    pub worker_id: usize,
    pub outcome: OutcomeKind,
    /// Response body; only present when a response was received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Failure description for TransportError records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

impl ResultRecord {
    pub fn response(
        url: String,
        worker_id: usize,
        status: u16,
        body: String,
        elapsed: Duration,
    ) -> Self {
        ResultRecord {
            url,
            worker_id,
            outcome: OutcomeKind::from_status(status),
            body: Some(body),
            status: Some(status),
            error: None,
            elapsed,
        }
    }

    pub fn timed_out(url: String, worker_id: usize, elapsed: Duration) -> Self {
        ResultRecord {
            url,
            worker_id,
            outcome: OutcomeKind::TimeoutExceeded,
            body: None,
            status: None,
            error: None,
            elapsed,
        }
    }

    pub fn failed(url: String, worker_id: usize, error: String, elapsed: Duration) -> Self {
        ResultRecord {
            url,
            worker_id,
            outcome: OutcomeKind::TransportError,
            body: None,
            status: None,
            error: Some(error),
            elapsed,
        }
    }
}

fn as_millis<S: serde::Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}
