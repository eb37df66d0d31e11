//! Crawl mode: discover profile slugs from listing pages, then resolve each profile.

use std::collections::BTreeSet;

use log::{debug, info, warn};
use url::Url;

use super::outcome::RunAccumulator;
use super::{DirectoryScraper, Pacer, PageOutcome, RecordOutcome, ScrapeMode, ScrapeResult, SkipReason};
use crate::collect::extract_hrefs;
use crate::config::{DirectorySite, RESERVED_SLUGS};
use crate::error_handling::ConfigError;
use crate::feed::{DirectoryRecord, FeedResolver};

impl DirectoryScraper {
    /// Crawls a paginated directory listing and resolves every profile it links to.
    ///
    /// Listing pages are `directory_url` followed by the same URL with
    /// `page=2..=max_pages` set in its query. Profiles are resolved under the
    /// listing's path (query and fragment dropped). Discovered slugs are
    /// sorted and capped at `limit_profiles` (at least one).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DirectoryHost` if `directory_url` is not an
    /// absolute URL with a host.
    pub async fn crawl(
        &self,
        directory_url: &str,
        max_pages: u32,
        limit_profiles: usize,
    ) -> Result<ScrapeResult, ConfigError> {
        let listing = listing_base(directory_url)
            .ok_or_else(|| ConfigError::DirectoryHost(directory_url.to_string()))?;
        let listing_pages = (1..=max_pages.max(1)).map(|page| listing_page_url(&listing, page));

        let pacer = Pacer::new(self.settings.delay);
        let mut acc = RunAccumulator::default();
        let mut slugs = BTreeSet::new();
        for page_url in listing_pages {
            pacer.pace().await;
            match self.fetcher.get(&page_url).await {
                Ok(page) => {
                    let found = discover_slugs(&page.body);
                    debug!("{page_url}: {} profile slug(s)", found.len());
                    slugs.extend(found);
                    acc.page_ok();
                }
                Err(e) => {
                    warn!("Skipping listing page {page_url}: {e}");
                    acc.page(PageOutcome::Skipped {
                        url: page_url,
                        reason: SkipReason::Fetch(e.to_string()),
                    });
                }
            }
        }

        let limit = limit_profiles.max(1);
        info!(
            "Resolving {} of {} discovered profile(s)",
            slugs.len().min(limit),
            slugs.len()
        );

        // Profiles live under the crawled listing, not necessarily the configured site
        let site = DirectorySite {
            site_base: profile_base(&listing),
            ..self.site.clone()
        };
        let resolver = FeedResolver::new(&self.fetcher, &self.tables, &site).with_pacer(&pacer);
        for slug in slugs.into_iter().take(limit) {
            let record = DirectoryRecord {
                slug: Some(slug),
                ..Default::default()
            };
            let outcome = resolver.resolve(&record).await;
            if let RecordOutcome::Skipped(reason) = &outcome {
                debug!("Profile {:?} skipped: {reason}", record.slug());
            }
            acc.record(outcome);
        }

        Ok(acc.finish(ScrapeMode::Crawl, self.settings.top_hosts))
    }
}

/// Parses the listing URL and trims a trailing `/` from its path.
fn listing_base(directory_url: &str) -> Option<Url> {
    let mut url = Url::parse(directory_url.trim()).ok()?;
    url.host_str()?;
    let path = url.path().trim_end_matches('/').to_string();
    url.set_path(&path);
    Some(url)
}

/// Page 1 is the listing itself; later pages replace any `page` parameter.
fn listing_page_url(listing: &Url, page: u32) -> String {
    if page <= 1 {
        return listing.to_string();
    }
    let kept: Vec<(String, String)> = listing
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    let mut url = listing.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("page", &page.to_string());
    url.to_string()
}

fn profile_base(listing: &Url) -> String {
    let mut url = listing.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.to_string().trim_end_matches('/').to_string()
}

/// Profile slugs linked from a listing page.
///
/// Only hrefs of the form `/<slug>` count; query strings and fragments are
/// dropped and reserved paths (`contact`, `review`) are ignored.
pub fn discover_slugs(html: &str) -> BTreeSet<String> {
    extract_hrefs(html)
        .into_iter()
        .filter_map(|href| {
            let path = href.trim().strip_prefix('/')?;
            let slug = path.split(&['?', '#'][..]).next().unwrap_or_default();
            if slug.is_empty() || slug.contains('/') || RESERVED_SLUGS.contains(&slug) {
                return None;
            }
            Some(slug.to_string())
        })
        .collect()
}
