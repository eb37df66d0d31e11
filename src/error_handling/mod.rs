//! Error handling.
//!
//! Library errors are typed with `thiserror`:
//! - **Initialization**: logger and HTTP client setup
//! - **Configuration**: tables, directory host, sink location
//! - **Fetch / Render**: per-page acquisition failures (recovered by the orchestrator)
//! - **Sink**: result-row persistence failures (always non-fatal)

mod types;

// Re-export public API
pub use types::{ConfigError, FetchError, InitializationError, RenderError, SinkError};
