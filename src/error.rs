//! Error types for Stagehand
//!
//! Library errors use `thiserror`; the binary wraps them with `anyhow` at the
//! dispatch boundary. The three operation-level variants carry the exact
//! messages surfaced to users, so their `Display` output is load-bearing.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Stagehand operations
pub type StagehandResult<T> = Result<T, StagehandError>;

/// Main error type for Stagehand operations
#[derive(Error, Debug)]
pub enum StagehandError {
    /// An external command exited non-zero, was killed, or failed to launch
    #[error("command '{program}' failed ({}): {detail}", describe_exit(*exit_code, *signal))]
    CommandFailed {
        program: String,
        exit_code: Option<i32>,
        signal: Option<i32>,
        detail: String,
    },

    /// The described stack has no usable output under the requested key
    #[error("stack '{stack}' has no output named '{key}'")]
    OutputNotFound { stack: String, key: String },

    /// No distribution in the listing serves the resolved domain
    #[error("Could not find distribution with domain {domain}")]
    DistributionNotFound { domain: String },

    /// More than one distribution serves the resolved domain
    #[error("domain {domain} is served by {count} distributions, refusing to pick one")]
    AmbiguousDistribution { domain: String, count: usize },

    /// Terminal error for the sync operation
    #[error("Failed syncing to the S3 bucket")]
    SyncFailed,

    /// Terminal error for the domain-info operation
    #[error("Could not extract Web App Domain")]
    DomainNotFound,

    /// Terminal error for the invalidate-cache operation
    #[error("Failed invalidating CloudFront cache")]
    InvalidationFailed,

    /// The poll budget ran out before the invalidation reached Completed
    #[error("invalidation {id} did not complete within the poll budget")]
    InvalidationTimeout { id: String },

    /// A query succeeded but its JSON output was not the expected shape
    #[error("unexpected response from {context}: {message}")]
    MalformedResponse { context: String, message: String },

    /// Invalid configuration file
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_exit(exit_code: Option<i32>, signal: Option<i32>) -> String {
    match (exit_code, signal) {
        (Some(code), _) => format!("exit code {}", code),
        (None, Some(sig)) => format!("killed by signal {}", sig),
        (None, None) => "did not launch".to_string(),
    }
}
