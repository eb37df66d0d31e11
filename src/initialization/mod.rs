//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources of a run:
//! - Logger
//! - HTTP client and fetcher
//! - Denylist / canonicalization tables
//! - Render capability (with the `browser` feature)
//! - Result sink
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

use std::path::PathBuf;
use std::sync::Arc;

use log::info;

use crate::config::{Config, SINK_DIR_ENV};
use crate::error_handling::{ConfigError, InitializationError, SinkError};
use crate::fetch::HttpFetcher;
use crate::filter::DomainTables;
use crate::render::Renderer;
use crate::scrape::{DirectoryScraper, ScrapeSettings};
use crate::sink::CsvSink;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Loads the domain tables: the `--tables` file when given, else the built-ins.
///
/// # Errors
///
/// Returns a `ConfigError` if the file is unreadable, malformed, or contains
/// an alias cycle.
pub fn init_tables(config: &Config) -> Result<Arc<DomainTables>, ConfigError> {
    let tables = match &config.tables {
        Some(path) => {
            let tables = DomainTables::from_file(path)?;
            info!(
                "Loaded domain tables from {} ({} denied domains)",
                path.display(),
                tables.denylist_len()
            );
            tables
        }
        None => DomainTables::builtin()?,
    };
    Ok(Arc::new(tables))
}

/// Initializes the HTTP fetcher from the config.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if the client cannot be built.
pub fn init_fetcher(config: &Config) -> Result<HttpFetcher, InitializationError> {
    Ok(HttpFetcher::new(init_client(config)?))
}

/// Builds the scraper with tables and (when available) a renderer.
///
/// # Errors
///
/// Fails if the HTTP client or the domain tables cannot be initialized.
pub fn init_scraper(config: &Config) -> anyhow::Result<DirectoryScraper> {
    let fetcher = init_fetcher(config)?;
    let tables = init_tables(config)?;
    let mut scraper = DirectoryScraper::new(fetcher, tables)
        .with_site(config.site.clone())
        .with_settings(ScrapeSettings::from_config(config));
    if let Some(renderer) = init_renderer() {
        scraper = scraper.with_renderer(renderer);
    }
    Ok(scraper)
}

/// The headless Chromium renderer, when compiled with the `browser` feature.
#[cfg(feature = "browser")]
pub fn init_renderer() -> Option<Arc<dyn Renderer>> {
    Some(Arc::new(crate::render::ChromeRenderer::new()))
}

/// The headless Chromium renderer, when compiled with the `browser` feature.
#[cfg(not(feature = "browser"))]
pub fn init_renderer() -> Option<Arc<dyn Renderer>> {
    None
}

/// Resolves the sink directory from the CLI flag or `PARTNER_SINK_DIR`.
///
/// # Errors
///
/// Returns `ConfigError::MissingSink` when neither is set.
pub fn sink_dir(flag: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    flag.or_else(|| {
        std::env::var_os(SINK_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
    .ok_or(ConfigError::MissingSink)
}

/// Opens the CSV sink and creates its tier tabs.
///
/// # Errors
///
/// Returns a `SinkError` if the directory or tab files cannot be created.
pub fn init_sink(dir: PathBuf) -> Result<CsvSink, SinkError> {
    let sink = CsvSink::new(dir)?;
    sink.ensure_tabs()?;
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_tables_builtin() {
        let tables = init_tables(&Config::default()).unwrap();
        assert!(tables.is_denied("github.com"));
    }

    #[test]
    fn test_init_tables_missing_file() {
        let config = Config {
            tables: Some(PathBuf::from("/nonexistent/tables.json")),
            ..Default::default()
        };
        assert!(matches!(
            init_tables(&config),
            Err(ConfigError::TablesIo { .. })
        ));
    }

    #[test]
    fn test_sink_dir_prefers_flag() {
        let dir = sink_dir(Some(PathBuf::from("/tmp/rows"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/rows"));
    }

    #[test]
    fn test_init_sink_creates_tabs() {
        let dir = TempDir::new().unwrap();
        let sink = init_sink(dir.path().join("out")).unwrap();
        assert!(sink.tab_path("Enterprise").exists());
        assert!(sink.tab_path("MidMarket").exists());
        assert!(sink.tab_path("SMB").exists());
    }
}
