//! Feed mode against a mock server: pagination, slug overrides, direct
//! websites, and profile-page fallback.

mod helpers;

use httptest::{matchers::*, responders::*, Expectation, Server};
use partner_scout::feed::DirectoryRecord;
use partner_scout::{FeedResolver, RecordOutcome, ScrapeMode, SkipReason};

#[tokio::test]
async fn test_slug_override_resolves_without_fetch() {
    // No expectations: any request to the server fails the test
    let server = Server::run();
    let site = helpers::local_site(&server);
    let tables = helpers::fixture_tables();
    let fetcher = helpers::fetcher();
    let resolver = FeedResolver::new(&fetcher, &tables, &site);

    let record = DirectoryRecord {
        slug: Some("bitovi".to_string()),
        website: None,
        ..Default::default()
    };
    assert_eq!(
        resolver.resolve(&record).await,
        RecordOutcome::Resolved {
            domain: "bitovi.com".to_string(),
            name: None,
        }
    );

    // The override also wins over a direct website
    let record = DirectoryRecord {
        slug: Some("Bitovi".to_string()),
        website: Some("https://bitovi.io".to_string()),
        name: Some("Bitovi".to_string()),
        ..Default::default()
    };
    assert_eq!(
        resolver.resolve(&record).await,
        RecordOutcome::Resolved {
            domain: "bitovi.com".to_string(),
            name: Some("Bitovi".to_string()),
        }
    );
}

#[tokio::test]
async fn test_record_without_identifier_is_skipped() {
    let server = Server::run();
    let site = helpers::local_site(&server);
    let tables = helpers::fixture_tables();
    let fetcher = helpers::fetcher();
    let resolver = FeedResolver::new(&fetcher, &tables, &site);

    let record = DirectoryRecord {
        name: Some("Anonymous".to_string()),
        ..Default::default()
    };
    assert_eq!(
        resolver.resolve(&record).await,
        RecordOutcome::Skipped(SkipReason::NoIdentifier)
    );
}

#[tokio::test]
async fn test_profile_fallback_uses_first_external_link() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/experts/globex")).respond_with(
            status_code(200).body(format!(
                r#"<a href="http://{}/experts/other">Other</a>
                   <a href="https://twitter.com/globex">Twitter</a>
                   <a href="https://www.globex.io/home">Home</a>"#,
                server.addr()
            )),
        ),
    );

    let site = helpers::local_site(&server);
    let tables = helpers::fixture_tables();
    let fetcher = helpers::fetcher();
    let resolver = FeedResolver::new(&fetcher, &tables, &site);

    assert_eq!(
        resolver.resolve_profile("globex").await.unwrap(),
        Some("globex.io".to_string())
    );
}

#[tokio::test]
async fn test_feed_scrape_paginates_and_resolves() {
    let server = Server::run();
    let feed_path = "/admin/search/test-uuid/";
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", feed_path),
            request::query(url_decoded(contains(("page", "1")))),
            request::query(url_decoded(contains(("page_size", "21")))),
        ])
        .respond_with(json_encoded(serde_json::json!({
            "count": 5,
            "results": [
                {"slug": "bitovi", "website": null, "name": "Bitovi"},
                {"slug": "acme", "website": "https://www.acme.io/", "name": "Acme"},
                {"slug": "globex"}
            ]
        }))),
    );
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", feed_path),
            request::query(url_decoded(contains(("page", "2")))),
        ])
        .respond_with(json_encoded(serde_json::json!({
            "results": [
                {"slug": "initech"},
                {"slug": "hooli", "website": "https://github.com/hooli"}
            ]
        }))),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/experts/globex")).respond_with(
            status_code(200).body(r#"<a href="https://globex.io/?utm=dir">View website</a>"#),
        ),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/experts/initech"))
            .respond_with(status_code(404)),
    );

    let scraper = helpers::scraper(helpers::local_site(&server), helpers::fixture_tables());
    let result = scraper.scrape_feed(None, 2).await;

    assert_eq!(result.mode, ScrapeMode::Feed);
    assert_eq!(result.domains, vec!["acme.com", "bitovi.com", "globex.io"]);
    assert_eq!(result.pages_ok, 2);
    assert_eq!(result.records_skipped, 2);
    assert_eq!(result.names.get("acme.com").map(String::as_str), Some("Acme"));
    assert_eq!(result.names.get("bitovi.com").map(String::as_str), Some("Bitovi"));
    assert!(!result.names.contains_key("globex.io"));
}

#[tokio::test]
async fn test_feed_custom_endpoint_bare_array() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/partners.json")).respond_with(
            json_encoded(serde_json::json!([
                {"url": "https://beta.dev"},
                "garbage",
                {"website": "https://linkedin.com/company/x"}
            ])),
        ),
    );

    let scraper = helpers::scraper(helpers::local_site(&server), helpers::fixture_tables());
    let url = format!("http://{}/partners.json", server.addr());
    let result = scraper.scrape_feed(Some(&url), 2).await;

    assert_eq!(result.domains, vec!["beta.dev"]);
    assert_eq!(result.records_skipped, 1);
}

#[tokio::test]
async fn test_feed_unrecognized_or_failing_pages_are_skipped() {
    let server = Server::run();
    let feed_path = "/admin/search/test-uuid/";
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", feed_path),
            request::query(url_decoded(contains(("page", "1")))),
        ])
        .respond_with(json_encoded(serde_json::json!({"items": []}))),
    );
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", feed_path),
            request::query(url_decoded(contains(("page", "2")))),
        ])
        .respond_with(status_code(500)),
    );

    let scraper = helpers::scraper(helpers::local_site(&server), helpers::fixture_tables());
    let result = scraper.scrape_feed(None, 2).await;

    assert!(result.domains.is_empty());
    assert_eq!(result.pages_ok, 0);
    assert_eq!(result.pages_failed, 2);
    assert_eq!(result.skipped[0].reason, SkipReason::UnrecognizedFeed);
    assert!(matches!(result.skipped[1].reason, SkipReason::Fetch(_)));
}
