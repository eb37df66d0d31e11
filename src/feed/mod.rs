//! Paginated directory feed.
//!
//! The directory publishes its entries through a JSON search endpoint that
//! caps the page size. A run requests a fixed number of pages instead of
//! following next-page links, so the request count is known up front.

mod resolver;

use log::debug;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::config::{DirectorySite, FEED_PAGE_SIZE};

pub use resolver::{find_profile_site, FeedResolver, PROFILE_LINK_MARKERS};

/// One entry of the directory feed. Every field is optional; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DirectoryRecord {
    pub slug: Option<String>,
    pub website: Option<String>,
    pub url: Option<String>,
    pub name: Option<String>,
}

impl DirectoryRecord {
    /// The record's own website, preferring `website` over `url`.
    pub fn direct_site(&self) -> Option<&str> {
        [&self.website, &self.url]
            .into_iter()
            .filter_map(|field| non_empty(field.as_deref()))
            .next()
    }

    pub fn slug(&self) -> Option<&str> {
        non_empty(self.slug.as_deref())
    }

    pub fn name(&self) -> Option<&str> {
        non_empty(self.name.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Extracts records from a feed document.
///
/// Accepts `{"results": [...]}` (a null `results` counts as empty) or a bare
/// array. Returns `None` for any other shape. Entries that are not objects, or
/// that do not deserialize, are dropped.
pub fn parse_records(document: Value) -> Option<Vec<DirectoryRecord>> {
    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("results")? {
            Value::Array(entries) => entries,
            Value::Null => Vec::new(),
            _ => return None,
        },
        _ => return None,
    };

    let records = entries
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("Dropping malformed feed entry: {e}");
                None
            }
        })
        .collect();
    Some(records)
}

/// Plans the feed requests for a run.
///
/// # Arguments
///
/// * `url` - Feed URL, directory site URL, or any JSON endpoint; `None` uses the default feed
/// * `site` - Directory description used to recognize feed and site URLs
/// * `pages` - Number of feed pages to request when the URL does not pin one
///
/// # Returns
///
/// The URLs to fetch, in order.
pub fn plan_feed_urls(url: Option<&str>, site: &DirectorySite, pages: u32) -> Vec<String> {
    let pages = pages.max(1);
    let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return default_feed_urls(site, pages);
    };

    if site.is_feed_url(url) {
        let Ok(parsed) = Url::parse(url) else {
            return vec![url.to_string()];
        };
        if parsed.query_pairs().any(|(k, _)| k == "page") {
            return vec![url.to_string()];
        }

        let mut params: Vec<(String, String)> = Vec::new();
        for (key, value) in parsed.query_pairs() {
            if !params.iter().any(|(k, _)| *k == key) {
                params.push((key.into_owned(), value.into_owned()));
            }
        }
        if !params.iter().any(|(k, _)| k == "page_size") {
            params.push(("page_size".to_string(), FEED_PAGE_SIZE.to_string()));
        }
        return (1..=pages)
            .map(|page| with_query(&parsed, &params, page))
            .collect();
    }

    if site.is_site_url(url) {
        return default_feed_urls(site, pages);
    }

    vec![url.to_string()]
}

fn default_feed_urls(site: &DirectorySite, pages: u32) -> Vec<String> {
    let params = [
        ("availability", "true".to_string()),
        ("ordering", "tier".to_string()),
        ("page_size", FEED_PAGE_SIZE.to_string()),
    ];
    let endpoint = site.feed_endpoint();
    (1..=pages)
        .map(|page| {
            let query = params
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .chain(std::iter::once(format!("page={page}")))
                .collect::<Vec<_>>()
                .join("&");
            format!("{endpoint}?{query}")
        })
        .collect()
}

fn with_query(base: &Url, params: &[(String, String)], page: u32) -> String {
    let mut url = base.clone();
    url.set_fragment(None);
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
        pairs.append_pair("page", &page.to_string());
    }
    url.to_string()
}
