//! Partner website scoring.
//!
//! Fetches a handful of well-known pages of a partner's site, keeps a short
//! blob of visible text from each, and scores the combined text.

use std::collections::HashMap;

use log::{debug, info};
use scraper::Html;
use serde::Serialize;

use crate::config::{MAX_TEXT_BLOB_CHARS, PARTNER_PAGE_LIMIT};
use crate::fetch::HttpFetcher;
use crate::score::{score_signals, ScoreComponents, Tier};
use crate::utils::{collapse_whitespace, prefix_chars};

/// Candidate paths, grouped by topic. Groups are visited in order.
pub const CANDIDATE_PATH_GROUPS: &[&[&str]] = &[
    &["/"],
    &["/about"],
    &["/services", "/solutions"],
    &["/case-studies", "/customers", "/clients"],
    &["/industries", "/verticals"],
    &["/security", "/compliance"],
];

/// Elements whose text is never visible.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "svg"];

/// Scoring report for one partner domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartnerReport {
    pub domain: String,
    pub pages_scanned: usize,
    pub tier: Tier,
    pub score_total: u32,
    pub score_components: ScoreComponents,
    /// URLs that contributed text
    pub sources: Vec<String>,
}

/// Fetches and scores partner sites.
#[derive(Debug, Clone)]
pub struct PartnerScorer {
    fetcher: HttpFetcher,
    origins: HashMap<String, String>,
}

impl PartnerScorer {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self {
            fetcher,
            origins: HashMap::new(),
        }
    }

    /// Serves `domain`'s pages from `origin` (e.g. `http://127.0.0.1:8080`)
    /// instead of `https://{domain}`. Reports still name `domain`.
    pub fn with_origin(mut self, domain: &str, origin: &str) -> Self {
        self.origins.insert(
            domain.trim().to_lowercase(),
            origin.trim_end_matches('/').to_string(),
        );
        self
    }

    fn origin_for(&self, domain: &str) -> String {
        self.origins
            .get(domain)
            .cloned()
            .unwrap_or_else(|| format!("https://{domain}"))
    }

    /// Scores `domain` from at most `limit_pages` of its pages.
    ///
    /// Pages that fail to load or have no visible text are skipped. A domain
    /// with no readable pages scores zero.
    pub async fn scrape_partner(&self, domain: &str, limit_pages: usize) -> PartnerReport {
        let limit_pages = if limit_pages == 0 {
            PARTNER_PAGE_LIMIT
        } else {
            limit_pages
        };
        let origin = self.origin_for(domain);
        let mut sources = Vec::new();
        let mut blobs = Vec::new();

        'groups: for group in CANDIDATE_PATH_GROUPS {
            for path in *group {
                if sources.len() >= limit_pages {
                    break 'groups;
                }
                let url = format!("{origin}{path}");
                let page = match self.fetcher.get(&url).await {
                    Ok(page) => page,
                    Err(e) => {
                        debug!("Partner page unavailable: {e}");
                        continue;
                    }
                };
                let text = visible_text(&page.body);
                if text.is_empty() {
                    debug!("No visible text at {url}");
                    continue;
                }
                blobs.push(prefix_chars(&text, MAX_TEXT_BLOB_CHARS).to_string());
                sources.push(url);
            }
        }

        let score = score_signals(&blobs.join("\n\n"));
        info!(
            "Scored {domain}: {} ({}) from {} page(s)",
            score.tier,
            score.total,
            sources.len()
        );
        PartnerReport {
            domain: domain.to_string(),
            pages_scanned: sources.len(),
            tier: score.tier,
            score_total: score.total,
            score_components: score.components,
            sources,
        }
    }
}

/// Visible text of an HTML document, whitespace-collapsed.
///
/// Text inside `script`, `style`, `noscript`, and `svg` elements is dropped.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<&str> = Vec::new();
    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            parts.push(text);
        }
    }
    collapse_whitespace(&parts.join(" "))
}
