// Shared test helpers for mock-server scrapes.
//
// This module provides fixture tables and scrapers wired to an `httptest` server.

use std::sync::Arc;
use std::time::Duration;

use httptest::Server;
use partner_scout::scrape::ScrapeSettings;
use partner_scout::{DirectoryScraper, DirectorySite, DomainTables, HttpFetcher};

/// Small fixture tables: a few denied platforms, one alias, one slug override.
#[allow(dead_code)] // Used by other test files
pub fn fixture_tables() -> Arc<DomainTables> {
    let tables = DomainTables::new(
        ["github.com", "twitter.com", "linkedin.com"],
        vec![("acme.io".to_string(), "acme.com".to_string())],
        vec![("bitovi".to_string(), "bitovi.com".to_string())],
    )
    .expect("fixture tables are valid");
    Arc::new(tables)
}

/// Single-attempt fetcher so failing pages fail fast.
#[allow(dead_code)]
pub fn fetcher() -> HttpFetcher {
    HttpFetcher::new(reqwest::Client::new()).with_retry_policy(1, Duration::ZERO)
}

/// Directory site served by the mock server: profiles under `/experts`, feed under `/admin`.
#[allow(dead_code)]
pub fn local_site(server: &Server) -> DirectorySite {
    DirectorySite {
        site_base: format!("http://{}/experts", server.addr()),
        feed_base: format!("http://{}/admin", server.addr()),
        feed_search_path: "/search/{uuid}/".to_string(),
        directory_uuid: "test-uuid".to_string(),
    }
}

/// Scraper with no politeness delay.
#[allow(dead_code)]
pub fn scraper(site: DirectorySite, tables: Arc<DomainTables>) -> DirectoryScraper {
    DirectoryScraper::new(fetcher(), tables)
        .with_site(site)
        .with_settings(ScrapeSettings {
            delay: Duration::ZERO,
            render_wait: Duration::ZERO,
            ..ScrapeSettings::default()
        })
}
