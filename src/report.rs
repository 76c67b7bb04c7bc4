// src/report.rs
// =============================================================================
// Prints results as they arrive.
//
// Two formats:
// - Log (default): one info line per result on stderr, mixed in with the
//   rest of the log output
// - Json: one JSON object per line on stdout, easy to pipe into jq
//
// The end-of-run summary always goes to the log.
// =============================================================================

use anyhow::Result;
use std::io::{self, Write};
use tracing::{info, warn};

use crate::pool::{ResultRecord, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Log,
    Json,
}

pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    pub fn new(format: ReportFormat) -> Self {
        Reporter { format }
    }

    pub fn emit(&mut self, record: &ResultRecord) -> Result<()> {
        match self.format {
            ReportFormat::Log => {
                info!("{}", format_line(record));
            }
            ReportFormat::Json => {
                let line = serde_json::to_string(record)?;
                writeln!(io::stdout().lock(), "{}", line)?;
            }
        }
        Ok(())
    }

    pub fn finish(&mut self, summary: &Summary) -> Result<()> {
        if self.format == ReportFormat::Json {
            io::stdout().lock().flush()?;
        }

        info!(
            submitted = summary.submitted,
            success = summary.success,
            http_error = summary.http_error,
            timeout = summary.timeout,
            transport_error = summary.transport_error,
            "all urls processed"
        );
        if summary.dropped() > 0 {
            warn!(
                dropped = summary.dropped(),
                "some urls produced no result (see warnings above)"
            );
        }
        Ok(())
    }
}

/// The human-readable report line for one record.
pub fn format_line(record: &ResultRecord) -> String {
    let mut line = format!(
        "URL: {} run on worker {} with result type of {} and result: {}",
        record.url,
        record.worker_id,
        record.outcome,
        record.body.as_deref().unwrap_or("")
    );
    if let Some(error) = &record.error {
        line.push_str(&format!(" ({})", error));
    }
    line
}
