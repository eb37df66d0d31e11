//! partner_scout library: partner directory scraping and qualification
//!
//! This library turns the noisy links of a partner directory into a clean,
//! deduplicated, canonical set of registrable company domains, and scores
//! each partner from the text of a few of its public pages.
//!
//! Three ways of reading a directory are supported:
//! - **Directory pages**: anchors from static HTML, or from a headless-browser
//!   render pooled across frames (`browser` feature)
//! - **Feed**: the directory's paginated JSON feed, with per-profile
//!   resolution for entries that lack a website
//! - **Crawl**: profile slugs discovered from listing pages
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use partner_scout::{DirectoryScraper, DomainTables, HttpFetcher};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tables = Arc::new(DomainTables::builtin()?);
//! let fetcher = HttpFetcher::new(reqwest::Client::new());
//! let scraper = DirectoryScraper::new(fetcher, tables);
//!
//! let result = scraper
//!     .scrape_directory(&["https://experts.n8n.io/".to_string()], false, None)
//!     .await?;
//! println!("{} partner domains", result.domains.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

pub mod cli;
pub mod collect;
pub mod config;
pub mod domain;
mod error_handling;
pub mod feed;
pub mod fetch;
pub mod filter;
pub mod initialization;
pub mod partner;
pub mod process;
pub mod render;
pub mod score;
pub mod scrape;
pub mod sink;
mod utils;

// Re-export public API
pub use collect::{Collection, HostCount, LinkCollector, LinkSource};
pub use config::{Config, DirectorySite, LogFormat, LogLevel};
pub use domain::{host_of, registrable_domain_of};
pub use error_handling::{ConfigError, FetchError, InitializationError, RenderError, SinkError};
pub use feed::{DirectoryRecord, FeedResolver};
pub use fetch::HttpFetcher;
pub use filter::DomainTables;
pub use partner::{PartnerReport, PartnerScorer};
pub use process::{process_all, ProcessSummary};
pub use render::Renderer;
pub use score::{score_signals, Score, Tier};
pub use scrape::{
    DirectoryScraper, PageOutcome, RecordOutcome, ScrapeMode, ScrapeResult, ScrapeSettings,
    SkipReason,
};
pub use sink::{CsvSink, PartnerRow, RowSink};
