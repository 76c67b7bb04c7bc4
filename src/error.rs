// src/error.rs
// =============================================================================
// Errors that can happen while fetching a single URL.
//
// None of these ever stop the program. A worker either turns them into a
// reported outcome (timeouts, or everything with --report-failures) or
// logs them and moves on to its next task.
//
// Startup errors (bad file, client setup) use anyhow in main.rs instead.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be turned into a request (malformed, empty line...)
    #[error("build request: {0}")]
    Build(#[source] reqwest::Error),

    /// Connection refused, DNS failure, reset, ...
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Headers arrived but the body could not be read
    #[error("reading response body failed: {0}")]
    Body(#[source] reqwest::Error),
}

impl FetchError {
    /// True when the HTTP client itself gave up because a deadline passed.
    pub fn is_timeout(&self) -> bool {
        match self {
            FetchError::Build(_) => false,
            FetchError::Transport(e) | FetchError::Body(e) => e.is_timeout(),
        }
    }
}
