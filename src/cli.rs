//! Command-line interface.
//!
//! Argument definitions and command dispatch. The binary parses a [`Cli`],
//! initializes logging, and prints whatever [`run`] returns as pretty JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::warn;
use serde_json::Value;

use crate::config::{
    Config, LogFormat, LogLevel, CRAWL_MAX_PAGES, CRAWL_PROFILE_LIMIT, DEFAULT_FEED_PAGES,
    DEFAULT_USER_AGENT, PARTNER_PAGE_LIMIT, POLITENESS_DELAY_MS, RENDER_WAIT_MS,
    REQUEST_TIMEOUT_SECS,
};
use crate::initialization::{init_fetcher, init_scraper, init_sink, sink_dir};
use crate::partner::PartnerScorer;
use crate::process::process_all;
use crate::sink::RowSink;

/// Partner directory scraper and scorer.
#[derive(Debug, Parser)]
#[command(name = "partner_scout", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value = "info", global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value = "plain", global = true)]
    pub log_format: LogFormat,

    /// JSON file with denylist, domain aliases, and slug overrides
    #[arg(long, global = true)]
    pub tables: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS, global = true)]
    pub timeout_seconds: u64,

    /// Delay between requests to the target site, in milliseconds
    #[arg(long, default_value_t = POLITENESS_DELAY_MS, global = true)]
    pub delay_ms: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT, global = true)]
    pub user_agent: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Collect partner domains from the links on directory pages
    Directory {
        /// Directory page URLs, scraped in order
        #[arg(required = true)]
        urls: Vec<String>,

        /// Render pages in a headless browser and pool links across frames
        #[arg(long)]
        js: bool,

        /// Settle time after rendering, in milliseconds
        #[arg(long, default_value_t = RENDER_WAIT_MS)]
        wait_ms: u64,

        /// Host to exclude (defaults to the host of the first URL)
        #[arg(long)]
        directory_host: Option<String>,
    },

    /// Resolve partner domains from the paginated directory feed
    Feed {
        /// Feed URL, directory site URL, or JSON endpoint (defaults to the built-in feed)
        url: Option<String>,

        /// Feed pages to request
        #[arg(long, default_value_t = DEFAULT_FEED_PAGES)]
        pages: u32,
    },

    /// Discover profile pages from a directory listing and resolve each one
    Crawl {
        /// Directory listing URL
        url: String,

        /// Listing pages to visit
        #[arg(long, default_value_t = CRAWL_MAX_PAGES)]
        max_pages: u32,

        /// Maximum number of profiles to resolve
        #[arg(long, default_value_t = CRAWL_PROFILE_LIMIT)]
        limit_profiles: usize,
    },

    /// Score one partner domain from its public pages
    Partner {
        domain: String,

        /// Maximum pages to scan
        #[arg(long, default_value_t = PARTNER_PAGE_LIMIT)]
        limit_pages: usize,
    },

    /// Scrape the feed, score every partner, and append rows to the sink
    Process {
        /// Feed URL (defaults to the built-in feed)
        #[arg(long)]
        feed_url: Option<String>,

        /// Sink directory (falls back to PARTNER_SINK_DIR)
        #[arg(long)]
        sink_dir: Option<PathBuf>,

        /// Maximum pages to scan per partner
        #[arg(long, default_value_t = PARTNER_PAGE_LIMIT)]
        limit_pages: usize,
    },
}

impl Cli {
    /// Library configuration for this invocation.
    pub fn config(&self) -> Config {
        let render_wait_ms = match &self.command {
            Command::Directory { wait_ms, .. } => *wait_ms,
            _ => RENDER_WAIT_MS,
        };
        Config {
            log_level: self.global.log_level.clone(),
            log_format: self.global.log_format.clone(),
            timeout_seconds: self.global.timeout_seconds,
            user_agent: self.global.user_agent.clone(),
            delay_ms: self.global.delay_ms,
            render_wait_ms,
            tables: self.global.tables.clone(),
            ..Default::default()
        }
    }
}

/// Runs the selected command and returns its JSON report.
///
/// # Errors
///
/// Returns an error for run-level failures only: bad configuration, an
/// unusable directory URL, or a client that cannot be built. Individual page
/// failures are part of the report.
pub async fn run(cli: Cli) -> anyhow::Result<Value> {
    let config = cli.config();

    let report = match cli.command {
        Command::Directory {
            urls,
            js,
            directory_host,
            ..
        } => {
            let scraper = init_scraper(&config)?;
            let result = scraper
                .scrape_directory(&urls, js, directory_host.as_deref())
                .await?;
            serde_json::to_value(result)?
        }
        Command::Feed { url, pages } => {
            let scraper = init_scraper(&config)?;
            serde_json::to_value(scraper.scrape_feed(url.as_deref(), pages).await)?
        }
        Command::Crawl {
            url,
            max_pages,
            limit_profiles,
        } => {
            let scraper = init_scraper(&config)?;
            serde_json::to_value(scraper.crawl(&url, max_pages, limit_profiles).await?)?
        }
        Command::Partner {
            domain,
            limit_pages,
        } => {
            let scorer = PartnerScorer::new(init_fetcher(&config)?);
            serde_json::to_value(scorer.scrape_partner(&domain, limit_pages).await)?
        }
        Command::Process {
            feed_url,
            sink_dir: dir,
            limit_pages,
        } => {
            let scraper = init_scraper(&config)?;
            let scorer = PartnerScorer::new(scraper.fetcher().clone());
            let sink = match sink_dir(dir) {
                Ok(dir) => Some(
                    init_sink(dir.clone())
                        .with_context(|| format!("Failed to open sink at {}", dir.display()))?,
                ),
                Err(e) => {
                    warn!("{e}");
                    None
                }
            };
            let summary = process_all(
                &scraper,
                &scorer,
                sink.as_ref().map(|s| s as &dyn RowSink),
                feed_url.as_deref(),
                limit_pages,
            )
            .await;
            serde_json::to_value(summary)?
        }
    };
    Ok(report)
}
