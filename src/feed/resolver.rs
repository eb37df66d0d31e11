//! Record-to-domain resolution.

use std::sync::LazyLock;

use log::debug;
use scraper::{Html, Selector};

use super::DirectoryRecord;
use crate::config::DirectorySite;
use crate::domain::{host_of, registrable_domain_of};
use crate::error_handling::FetchError;
use crate::fetch::HttpFetcher;
use crate::filter::DomainTables;
use crate::scrape::{Pacer, RecordOutcome, SkipReason};

/// Anchor text (lower-cased) that marks a profile's outbound website link.
pub const PROFILE_LINK_MARKERS: &[&str] = &["view website", "visit website"];

static PROFILE_ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| crate::utils::parse_selector_unsafe("a[href]", "PROFILE_ANCHOR_SELECTOR"));

/// Resolves feed records to partner domains.
///
/// Order of precedence for one record:
/// 1. a slug-override entry (no network access)
/// 2. the record's own `website` / `url` field
/// 3. the outbound website link on the record's profile page
pub struct FeedResolver<'a> {
    fetcher: &'a HttpFetcher,
    tables: &'a DomainTables,
    site: &'a DirectorySite,
    site_host: Option<String>,
    pacer: Option<&'a Pacer>,
}

impl<'a> FeedResolver<'a> {
    pub fn new(fetcher: &'a HttpFetcher, tables: &'a DomainTables, site: &'a DirectorySite) -> Self {
        Self {
            fetcher,
            tables,
            site,
            site_host: site.site_host(),
            pacer: None,
        }
    }

    /// Spaces profile fetches with the run's politeness delay.
    pub fn with_pacer(mut self, pacer: &'a Pacer) -> Self {
        self.pacer = Some(pacer);
        self
    }

    /// Resolves one record. Never fails; unresolvable records are skipped with a reason.
    pub async fn resolve(&self, record: &DirectoryRecord) -> RecordOutcome {
        let slug = record.slug();
        let name = record.name().map(str::to_string);

        if let Some(domain) = slug.and_then(|s| self.tables.slug_override(s)) {
            debug!("Slug override for {slug:?}: {domain}");
            return RecordOutcome::Resolved {
                domain: domain.to_string(),
                name,
            };
        }

        if let Some(site) = record.direct_site() {
            return match registrable_domain_of(site).and_then(|d| self.tables.accept(&d, slug)) {
                Some(domain) => RecordOutcome::Resolved { domain, name },
                None => RecordOutcome::Skipped(SkipReason::NoDomain),
            };
        }

        let Some(slug) = slug else {
            return RecordOutcome::Skipped(SkipReason::NoIdentifier);
        };
        match self.resolve_profile(slug).await {
            Ok(Some(domain)) => RecordOutcome::Resolved { domain, name },
            Ok(None) => RecordOutcome::Skipped(SkipReason::NoDomain),
            Err(e) => RecordOutcome::Skipped(SkipReason::Fetch(e.to_string())),
        }
    }

    /// Fetches `{site_base}/{slug}` and looks for the partner's website link.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when the profile page cannot be retrieved.
    pub async fn resolve_profile(&self, slug: &str) -> Result<Option<String>, FetchError> {
        let url = self.site.profile_url(slug);
        if let Some(pacer) = self.pacer {
            pacer.pace().await;
        }
        let page = self.fetcher.get(&url).await?;
        Ok(find_profile_site(
            &page.body,
            self.site_host.as_deref(),
            self.tables,
        ))
    }
}

/// Finds the partner website on a profile page.
///
/// Anchors whose text contains a marker phrase are tried first, in document
/// order. If none yields a domain, the first absolute `http(s)` anchor
/// pointing off `site_host` is used. Only accepted (non-denied, canonical)
/// domains count.
pub fn find_profile_site(html: &str, site_host: Option<&str>, tables: &DomainTables) -> Option<String> {
    let document = Html::parse_document(html);
    let anchors: Vec<(String, &str)> = document
        .select(&PROFILE_ANCHOR_SELECTOR)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let text = a.text().collect::<String>().trim().to_lowercase();
            Some((text, href.trim()))
        })
        .collect();

    let off_site = |href: &str| match (host_of(href), site_host) {
        (Some(host), Some(site)) => host != site,
        (Some(_), None) => true,
        (None, _) => false,
    };
    let accepted = |href: &str| registrable_domain_of(href).and_then(|d| tables.accept(&d, None));

    let marked = anchors
        .iter()
        .filter(|(text, _)| PROFILE_LINK_MARKERS.iter().any(|m| text.contains(m)))
        .filter(|(_, href)| off_site(href))
        .find_map(|(_, href)| accepted(href));
    if marked.is_some() {
        return marked;
    }

    anchors
        .iter()
        .map(|(_, href)| *href)
        .filter(|href| is_absolute_http(href) && off_site(href))
        .find_map(accepted)
}

fn is_absolute_http(href: &str) -> bool {
    let lower = href.get(..8).unwrap_or(href).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
