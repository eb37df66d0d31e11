//! Scrape orchestration.
//!
//! A [`DirectoryScraper`] drives one run at a time over directory pages, feed
//! pages, or profile pages. Pages are processed sequentially with a fixed
//! politeness delay between requests. A failing page is logged, recorded as
//! skipped, and never aborts the run.

mod crawl;
mod outcome;
mod pacing;

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use url::Url;

use crate::collect::{LinkCollector, LinkSource};
use crate::config::{Config, DirectorySite, POLITENESS_DELAY_MS, RENDER_WAIT_MS, TOP_HOSTS};
use crate::domain::host_of;
use crate::error_handling::{ConfigError, RenderError};
use crate::feed::{parse_records, plan_feed_urls, FeedResolver};
use crate::fetch::HttpFetcher;
use crate::filter::DomainTables;
use crate::render::Renderer;

pub use crawl::discover_slugs;
pub use outcome::{
    PageOutcome, RecordOutcome, ScrapeMode, ScrapeResult, SkipReason, SkippedPage,
};
pub use pacing::Pacer;

use outcome::RunAccumulator;

/// Timing and reporting knobs for a scrape run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeSettings {
    /// Minimum spacing between requests to the target site
    pub delay: Duration,
    /// Settle time handed to the renderer
    pub render_wait: Duration,
    /// Number of raw hosts reported in `top_hosts`
    pub top_hosts: usize,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(POLITENESS_DELAY_MS),
            render_wait: Duration::from_millis(RENDER_WAIT_MS),
            top_hosts: TOP_HOSTS,
        }
    }
}

impl ScrapeSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            delay: Duration::from_millis(config.delay_ms),
            render_wait: Duration::from_millis(config.render_wait_ms),
            ..Self::default()
        }
    }
}

/// Runs directory, feed, and crawl scrapes with injected tables and capabilities.
pub struct DirectoryScraper {
    fetcher: HttpFetcher,
    tables: Arc<DomainTables>,
    site: DirectorySite,
    renderer: Option<Arc<dyn Renderer>>,
    settings: ScrapeSettings,
}

impl DirectoryScraper {
    pub fn new(fetcher: HttpFetcher, tables: Arc<DomainTables>) -> Self {
        Self {
            fetcher,
            tables,
            site: DirectorySite::default(),
            renderer: None,
            settings: ScrapeSettings::default(),
        }
    }

    pub fn with_site(mut self, site: DirectorySite) -> Self {
        self.site = site;
        self
    }

    /// Supplies the render capability used when a run asks for JavaScript rendering.
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_settings(mut self, settings: ScrapeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn tables(&self) -> &DomainTables {
        &self.tables
    }

    pub fn site(&self) -> &DirectorySite {
        &self.site
    }

    pub fn fetcher(&self) -> &HttpFetcher {
        &self.fetcher
    }

    /// Collects partner domains from the anchors of directory pages.
    ///
    /// # Arguments
    ///
    /// * `urls` - Directory pages, processed in order
    /// * `use_js` - Render pages and pool hrefs across frames (needs a renderer)
    /// * `directory_host` - Host excluded from results; inferred from the first URL when `None`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DirectoryHost` when no directory host is given and
    /// none can be inferred. Page failures are reported in the result instead.
    pub async fn scrape_directory(
        &self,
        urls: &[String],
        use_js: bool,
        directory_host: Option<&str>,
    ) -> Result<ScrapeResult, ConfigError> {
        let host_source = directory_host
            .or(urls.first().map(String::as_str))
            .unwrap_or_default();
        let directory_host =
            host_of(host_source).ok_or_else(|| ConfigError::DirectoryHost(host_source.to_string()))?;

        let renderer = match (&self.renderer, use_js) {
            (Some(renderer), true) => Some(renderer),
            (None, true) => {
                warn!("JavaScript rendering requested but no renderer is available; using static HTML");
                None
            }
            (_, false) => None,
        };
        let mode = if renderer.is_some() {
            ScrapeMode::RenderedHrefs
        } else {
            ScrapeMode::Html
        };
        info!(
            "Scraping {} directory page(s) in {mode:?} mode, excluding {directory_host}",
            urls.len()
        );

        let pacer = Pacer::new(self.settings.delay);
        let mut acc = RunAccumulator::default();
        for url in urls {
            pacer.pace().await;
            let outcome = self.scrape_page(url, renderer, &directory_host).await;
            match &outcome {
                PageOutcome::Collected(c) => {
                    debug!("{url}: {} domain(s) from {} href(s)", c.domains.len(), c.hosts.len())
                }
                PageOutcome::Skipped { reason, .. } => {
                    warn!("Skipping page {url} ({}): {reason}", reason.kind())
                }
            }
            acc.page(outcome);
        }

        let result = acc.finish(mode, self.settings.top_hosts);
        info!(
            "Directory scrape done: {} domain(s), {} page(s) ok, {} failed",
            result.domains.len(),
            result.pages_ok,
            result.pages_failed
        );
        Ok(result)
    }

    async fn scrape_page(
        &self,
        url: &str,
        renderer: Option<&Arc<dyn Renderer>>,
        directory_host: &str,
    ) -> PageOutcome {
        let collector = LinkCollector::new(&self.tables, directory_host);
        match renderer {
            Some(renderer) => {
                let base = Url::parse(url).ok();
                match self.run_renderer(renderer, url, |r, u, w| r.render_hrefs(u, w)).await {
                    Ok(hrefs) => PageOutcome::Collected(
                        collector.with_base(base).collect(LinkSource::Hrefs(&hrefs)),
                    ),
                    // Extraction script failed; the rendered document may still be readable
                    Err(RenderError::Evaluation(reason)) => {
                        debug!("Href extraction failed on {url} ({reason}); reading rendered HTML");
                        match self.run_renderer(renderer, url, |r, u, w| r.render_html(u, w)).await {
                            Ok(html) => PageOutcome::Collected(
                                collector.with_base(base).collect(LinkSource::Html(&html)),
                            ),
                            Err(e) => PageOutcome::Skipped {
                                url: url.to_string(),
                                reason: SkipReason::Render(e.to_string()),
                            },
                        }
                    }
                    Err(e) => PageOutcome::Skipped {
                        url: url.to_string(),
                        reason: SkipReason::Render(e.to_string()),
                    },
                }
            }
            None => match self.fetcher.get(url).await {
                Ok(page) => PageOutcome::Collected(
                    collector
                        .with_base(Url::parse(&page.url).ok())
                        .collect(LinkSource::Html(&page.body)),
                ),
                Err(e) => PageOutcome::Skipped {
                    url: url.to_string(),
                    reason: SkipReason::Fetch(e.to_string()),
                },
            },
        }
    }

    /// Runs one blocking renderer call off the async workers.
    async fn run_renderer<T, F>(
        &self,
        renderer: &Arc<dyn Renderer>,
        url: &str,
        call: F,
    ) -> Result<T, RenderError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn Renderer, &str, Duration) -> Result<T, RenderError> + Send + 'static,
    {
        let renderer = Arc::clone(renderer);
        let url = url.to_string();
        let wait = self.settings.render_wait;
        tokio::task::spawn_blocking(move || call(renderer.as_ref(), &url, wait))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))?
    }

    /// Resolves partner domains from the paginated directory feed.
    ///
    /// # Arguments
    ///
    /// * `url` - Feed URL, directory site URL, or JSON endpoint; `None` for the default feed
    /// * `pages` - Feed pages to request when the URL does not pin one
    pub async fn scrape_feed(&self, url: Option<&str>, pages: u32) -> ScrapeResult {
        let feed_urls = plan_feed_urls(url, &self.site, pages);
        info!("Reading {} feed page(s)", feed_urls.len());

        let pacer = Pacer::new(self.settings.delay);
        let resolver = FeedResolver::new(&self.fetcher, &self.tables, &self.site).with_pacer(&pacer);
        let mut acc = RunAccumulator::default();

        for feed_url in &feed_urls {
            pacer.pace().await;
            let document = match self.fetcher.get_json(feed_url).await {
                Ok(document) => document,
                Err(e) => {
                    warn!("Skipping feed page {feed_url}: {e}");
                    acc.page(PageOutcome::Skipped {
                        url: feed_url.clone(),
                        reason: SkipReason::Fetch(e.to_string()),
                    });
                    continue;
                }
            };
            let Some(records) = parse_records(document) else {
                warn!("Skipping feed page {feed_url}: unrecognized document shape");
                acc.page(PageOutcome::Skipped {
                    url: feed_url.clone(),
                    reason: SkipReason::UnrecognizedFeed,
                });
                continue;
            };

            acc.page_ok();
            debug!("{feed_url}: {} record(s)", records.len());
            for record in &records {
                let outcome = resolver.resolve(record).await;
                if let RecordOutcome::Skipped(reason) = &outcome {
                    debug!("Skipping record {:?} ({}): {reason}", record.slug(), reason.kind());
                }
                acc.record(outcome);
            }
        }

        let result = acc.finish(ScrapeMode::Feed, self.settings.top_hosts);
        info!(
            "Feed scrape done: {} domain(s), {} record(s) skipped",
            result.domains.len(),
            result.records_skipped
        );
        result
    }
}
