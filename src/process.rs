//! End-to-end pipeline: feed scrape, partner scoring, sink.

use log::{info, warn};
use serde::Serialize;

use crate::partner::PartnerScorer;
use crate::scrape::DirectoryScraper;
use crate::score::Tier;
use crate::sink::{PartnerRow, RowSink};

/// Partner counts per tier for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessSummary {
    pub total: usize,
    pub enterprise: usize,
    pub midmarket: usize,
    pub smb: usize,
}

impl ProcessSummary {
    fn count(&mut self, tier: Tier) {
        self.total += 1;
        match tier {
            Tier::Enterprise => self.enterprise += 1,
            Tier::MidMarket => self.midmarket += 1,
            Tier::Smb => self.smb += 1,
        }
    }
}

/// Scrapes the feed, scores every partner, and appends one row per partner.
///
/// With no sink, partners are still scored and counted but nothing is
/// persisted. Sink failures are logged and skipped.
///
/// # Arguments
///
/// * `scraper` - Orchestrator used for the feed scrape
/// * `scorer` - Partner scorer
/// * `sink` - Row store; `None` when no sink is configured
/// * `feed_url` - Feed to read; `None` for the default feed
/// * `limit_pages` - Partner pages scanned per domain
pub async fn process_all(
    scraper: &DirectoryScraper,
    scorer: &PartnerScorer,
    sink: Option<&dyn RowSink>,
    feed_url: Option<&str>,
    limit_pages: usize,
) -> ProcessSummary {
    let scraped = scraper
        .scrape_feed(feed_url, crate::config::DEFAULT_FEED_PAGES)
        .await;
    if sink.is_none() {
        warn!("No sink configured; {} partner row(s) will not be persisted", scraped.domains.len());
    }

    let mut summary = ProcessSummary::default();
    for domain in &scraped.domains {
        let report = scorer.scrape_partner(domain, limit_pages).await;
        summary.count(report.tier);

        if let Some(sink) = sink {
            let name = scraped.names.get(domain).map(String::as_str);
            let row = PartnerRow::from_report(&report, name);
            if let Err(e) = sink.append(report.tier.tab_name(), &row) {
                warn!("Failed to append {domain} to {}: {e}", report.tier.tab_name());
            }
        }
    }

    info!(
        "Processed {} partner(s): {} enterprise, {} mid-market, {} SMB",
        summary.total, summary.enterprise, summary.midmarket, summary.smb
    );
    summary
}
