//! Outbound link collection.
//!
//! Turns the anchors of one page into a set of partner domains. The input is
//! either static HTML or a flat list of hrefs already pooled from every
//! browsing context of a rendered page.
//!
//! For each href: resolve it against the page URL when relative, extract the
//! host, drop links back to the directory itself, extract the registrable
//! domain, then canonicalize and apply the denylist.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde::Serialize;
use url::Url;

use crate::domain::{domain_of_host, host_of};
use crate::filter::DomainTables;

const ANCHOR_SELECTOR_STR: &str = "a[href]";

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| crate::utils::parse_selector_unsafe(ANCHOR_SELECTOR_STR, "ANCHOR_SELECTOR"));

/// Where the hrefs of a page come from.
#[derive(Debug, Clone, Copy)]
pub enum LinkSource<'a> {
    /// Static HTML; anchors are parsed out of it
    Html(&'a str),
    /// Hrefs already extracted by a renderer (all frames pooled)
    Hrefs(&'a [String]),
}

/// Domains found on one page, plus the raw hosts seen for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    pub domains: BTreeSet<String>,
    /// Every host observed before any filtering, one entry per href
    pub hosts: Vec<String>,
}

/// Extracts partner domains from a page's links.
pub struct LinkCollector<'a> {
    tables: &'a DomainTables,
    directory_host: String,
    base: Option<Url>,
}

impl<'a> LinkCollector<'a> {
    /// Creates a collector that excludes links to `directory_host`.
    pub fn new(tables: &'a DomainTables, directory_host: &str) -> Self {
        Self {
            tables,
            directory_host: host_of(directory_host).unwrap_or_default(),
            base: None,
        }
    }

    /// Page URL used to resolve relative hrefs.
    pub fn with_base(mut self, base: Option<Url>) -> Self {
        self.base = base;
        self
    }

    /// Collects the deduplicated, sorted partner domains of a page.
    pub fn collect(&self, source: LinkSource<'_>) -> Collection {
        let mut collection = Collection::default();
        match source {
            LinkSource::Html(html) => {
                for href in extract_hrefs(html) {
                    self.visit(&href, &mut collection);
                }
            }
            LinkSource::Hrefs(hrefs) => {
                for href in hrefs {
                    self.visit(href, &mut collection);
                }
            }
        }
        collection
    }

    fn visit(&self, href: &str, collection: &mut Collection) {
        let resolved = self.resolve(href);
        let Some(host) = host_of(&resolved) else {
            return;
        };
        collection.hosts.push(host.clone());

        if host == self.directory_host {
            return;
        }
        if let Some(domain) = domain_of_host(&host).and_then(|d| self.tables.accept(&d, None)) {
            collection.domains.insert(domain);
        }
    }

    fn resolve(&self, href: &str) -> String {
        let href = href.trim();
        match &self.base {
            Some(base) if is_relative_reference(href) => base
                .join(href)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| href.to_string()),
            _ => href.to_string(),
        }
    }
}

/// All `href` values of `<a href>` elements, in document order.
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Path-, query- or fragment-relative references. Bare `acme.com` hrefs are
/// deliberately not treated as relative: directories often omit the scheme.
fn is_relative_reference(href: &str) -> bool {
    (href.starts_with('/') && !href.starts_with("//"))
        || href.starts_with('?')
        || href.starts_with('#')
        || href.starts_with("./")
        || href.starts_with("../")
}

/// Counts raw hosts across a run for the top-host diagnostic.
#[derive(Debug, Clone, Default)]
pub struct HostTally {
    counts: HashMap<String, usize>,
}

/// One row of the top-host diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostCount {
    pub host: String,
    pub count: usize,
}

impl HostTally {
    pub fn record<I: IntoIterator<Item = String>>(&mut self, hosts: I) {
        for host in hosts {
            *self.counts.entry(host).or_insert(0) += 1;
        }
    }

    /// The `n` most frequent hosts, ties broken alphabetically.
    pub fn top(&self, n: usize) -> Vec<HostCount> {
        let mut rows: Vec<HostCount> = self
            .counts
            .iter()
            .map(|(host, count)| HostCount {
                host: host.clone(),
                count: *count,
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.host.cmp(&b.host)));
        rows.truncate(n);
        rows
    }
}
