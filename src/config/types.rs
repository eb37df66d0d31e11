//! Configuration types.
//!
//! This module defines the library configuration, the logging enums shared
//! with the CLI, and the description of the directory being scraped.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::config::constants::{
    DEFAULT_DIRECTORY_UUID, DEFAULT_FEED_BASE, DEFAULT_FEED_SEARCH_PATH, DEFAULT_SITE_BASE,
    DEFAULT_USER_AGENT, POLITENESS_DELAY_MS, RENDER_WAIT_MS, REQUEST_TIMEOUT_SECS,
};
use crate::domain::host_of;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// Everything needed to build the shared resources of a run: the HTTP client,
/// the domain tables, the optional renderer, and the politeness settings.
///
/// # Examples
///
/// ```no_run
/// use partner_scout::Config;
///
/// let config = Config {
///     delay_ms: 0,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Fixed delay between requests to the target site, in milliseconds
    pub delay_ms: u64,

    /// Settle time for rendered pages, in milliseconds
    pub render_wait_ms: u64,

    /// JSON file with denylist / alias / slug-override tables
    pub tables: Option<PathBuf>,

    /// Directory being scraped
    pub site: DirectorySite,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            timeout_seconds: REQUEST_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            delay_ms: POLITENESS_DELAY_MS,
            render_wait_ms: RENDER_WAIT_MS,
            tables: None,
            site: DirectorySite::default(),
        }
    }
}

/// Where the partner directory lives: its public site and its JSON feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySite {
    /// Public site base, e.g. `https://experts.n8n.io`; profiles live at `{site_base}/{slug}`
    pub site_base: String,
    /// Feed host base, e.g. `https://admin.partnerpage.io`
    pub feed_base: String,
    /// Feed search path template containing `{uuid}`
    pub feed_search_path: String,
    /// Directory identifier substituted into the search path
    pub directory_uuid: String,
}

impl Default for DirectorySite {
    fn default() -> Self {
        Self {
            site_base: DEFAULT_SITE_BASE.to_string(),
            feed_base: DEFAULT_FEED_BASE.to_string(),
            feed_search_path: DEFAULT_FEED_SEARCH_PATH.to_string(),
            directory_uuid: DEFAULT_DIRECTORY_UUID.to_string(),
        }
    }
}

impl DirectorySite {
    /// Host of the public site, used to tell internal links from outbound ones.
    pub fn site_host(&self) -> Option<String> {
        host_of(&self.site_base)
    }

    /// Profile page for a directory entry.
    pub fn profile_url(&self, slug: &str) -> String {
        format!("{}/{}", self.site_base.trim_end_matches('/'), slug)
    }

    /// Feed search endpoint without query parameters.
    pub fn feed_endpoint(&self) -> String {
        format!(
            "{}{}",
            self.feed_base.trim_end_matches('/'),
            self.feed_search_path.replace("{uuid}", &self.directory_uuid)
        )
    }

    pub fn is_feed_url(&self, url: &str) -> bool {
        url.starts_with(&self.feed_base)
    }

    pub fn is_site_url(&self, url: &str) -> bool {
        url.starts_with(&self.site_base)
    }
}
