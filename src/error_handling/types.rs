//! Error type definitions.
//!
//! This module defines the error types used throughout the application.
//! Per-page and per-record problems are not errors at the run level; they are
//! turned into [`crate::scrape::SkipReason`]s by the orchestrator.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Configuration problems, surfaced only by the operation that needs the setting.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No directory host was given and none could be inferred from the inputs.
    #[error("cannot determine the directory host from {0:?}")]
    DirectoryHost(String),

    /// The domain-alias table maps a domain back onto itself through a chain.
    #[error("domain alias cycle involving {0}")]
    AliasCycle(String),

    /// A slug override points at something that can never be an output domain.
    #[error("slug override {slug:?} targets {target}, which is not an accepted registrable domain")]
    InvalidSlugOverride { slug: String, target: String },

    /// The tables file could not be read.
    #[error("cannot read tables file {path}: {source}")]
    TablesIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tables file is not valid JSON for the expected shape.
    #[error("invalid tables file {path}: {source}")]
    TablesFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No sink directory was configured.
    #[error("no sink directory configured (set --sink-dir or PARTNER_SINK_DIR)")]
    MissingSink,
}

/// Failures of the HTTP fetch capability.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network-level failure (connect, timeout, body read).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: ReqwestError,
    },

    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body was expected to be JSON and was not.
    #[error("invalid JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Whether a retry at the connection level may succeed.
    ///
    /// Only connect failures and timeouts qualify; HTTP status errors and
    /// decode failures are permanent for the purposes of a scrape run.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport { source, .. } => source.is_connect() || source.is_timeout(),
            FetchError::Status { .. } | FetchError::Json { .. } => false,
        }
    }
}

/// Failures of the render capability.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The browser could not be started.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// Navigation failed or exceeded the navigation timeout.
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// A script evaluation in the page failed.
    #[error("page evaluation failed: {0}")]
    Evaluation(String),

    /// A secondary browsing context could not be read (usually cross-origin).
    #[error("frame {0} is not accessible")]
    FrameInaccessible(usize),

    /// The blocking render task panicked or was cancelled.
    #[error("render task failed: {0}")]
    Task(String),
}

/// Failures writing result rows.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Filesystem failure.
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Row serialization failure.
    #[error("sink CSV error: {0}")]
    Csv(#[from] csv::Error),
}
