//! Directory-page scrapes against a mock server: static HTML, failing pages,
//! and rendered pages pooled across frames.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use httptest::{matchers::*, responders::*, Expectation, Server};
use partner_scout::render::{pool_context_hrefs, BrowsingContext};
use partner_scout::{ConfigError, RenderError, Renderer, ScrapeMode, SkipReason};

const DIRECTORY_PAGE: &str = r#"
    <html><body>
      <nav><a href="/">Home</a><a href="/contact">Contact</a></nav>
      <a href="https://acme.com/pricing">Acme</a>
      <a href="https://www.acme.io/">Acme (old domain)</a>
      <a href="https://twitter.com/acme">Twitter</a>
      <a href="mailto:hi@acme.com">Mail</a>
      <a href="https://shop.globex.co.uk/">Globex</a>
      <a href="http://10.0.0.1/admin">Internal IP</a>
    </body></html>
"#;

#[tokio::test]
async fn test_directory_scrape_static_html() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/partners"))
            .respond_with(status_code(200).body(DIRECTORY_PAGE)),
    );

    let scraper = helpers::scraper(helpers::local_site(&server), helpers::fixture_tables());
    let url = format!("http://{}/partners", server.addr());
    let result = scraper.scrape_directory(&[url], false, None).await.unwrap();

    assert_eq!(result.domains, vec!["acme.com", "globex.co.uk"]);
    assert_eq!(result.mode, ScrapeMode::Html);
    assert_eq!(result.pages_ok, 1);
    assert_eq!(result.pages_failed, 0);
    // Relative links resolved to the directory itself and were counted as raw hosts
    let top = &result.top_hosts[0];
    assert_eq!(top.host, "127.0.0.1");
    assert_eq!(top.count, 2);
}

#[tokio::test]
async fn test_failing_page_does_not_abort_run() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/broken"))
            .respond_with(status_code(503)),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/partners"))
            .respond_with(status_code(200).body(
                r#"<a href="https://zeta.dev">Z</a><a href="https://beta.com">B</a>"#,
            )),
    );

    let scraper = helpers::scraper(helpers::local_site(&server), helpers::fixture_tables());
    let urls = vec![
        // Nothing listens on the discard port
        "http://127.0.0.1:9/unreachable".to_string(),
        format!("http://{}/broken", server.addr()),
        format!("http://{}/partners", server.addr()),
    ];
    let result = scraper.scrape_directory(&urls, false, None).await.unwrap();

    assert_eq!(result.domains, vec!["beta.com", "zeta.dev"]);
    assert_eq!(result.pages_ok, 1);
    assert_eq!(result.pages_failed, 2);
    assert!(result
        .skipped
        .iter()
        .all(|s| matches!(s.reason, SkipReason::Fetch(_))));
}

#[tokio::test]
async fn test_explicit_directory_host_is_excluded() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/list")).respond_with(
            status_code(200).body(
                r#"<a href="https://experts.n8n.io/acme">Profile</a>
                   <a href="https://blog.n8n.io/post">Blog</a>
                   <a href="https://acme.com">Acme</a>"#,
            ),
        ),
    );

    let scraper = helpers::scraper(helpers::local_site(&server), helpers::fixture_tables());
    let url = format!("http://{}/list", server.addr());
    let result = scraper
        .scrape_directory(&[url], false, Some("https://experts.n8n.io"))
        .await
        .unwrap();

    // Only the exact directory host is dropped; n8n.io is not in the fixture denylist
    assert_eq!(result.domains, vec!["acme.com", "n8n.io"]);
}

#[tokio::test]
async fn test_directory_host_must_be_determinable() {
    let server = Server::run();
    let scraper = helpers::scraper(helpers::local_site(&server), helpers::fixture_tables());
    let result = scraper.scrape_directory(&[], false, None).await;
    assert!(matches!(result, Err(ConfigError::DirectoryHost(_))));
}

/// Renderer stub: a top document plus frames, some of them cross-origin.
struct StubRenderer {
    top: Vec<String>,
    frames: Vec<Option<Vec<String>>>,
}

impl Renderer for StubRenderer {
    fn render_html(&self, url: &str, _wait: Duration) -> Result<String, RenderError> {
        if url.contains("csp") {
            return Ok(r#"<a href="/team">Team</a><a href="https://delta.dev/">Delta</a>"#.to_string());
        }
        Err(RenderError::Evaluation("not supported by stub".to_string()))
    }

    fn render_hrefs(&self, url: &str, _wait: Duration) -> Result<Vec<String>, RenderError> {
        if url.contains("csp") {
            return Err(RenderError::Evaluation("script blocked".to_string()));
        }
        if url.contains("timeout") {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                reason: "navigation timed out".to_string(),
            });
        }
        pool_context_hrefs(self.frames.len(), |context| match context {
            BrowsingContext::Top => Ok(self.top.clone()),
            BrowsingContext::Frame(i) => self.frames[i]
                .clone()
                .ok_or(RenderError::FrameInaccessible(i)),
        })
    }
}

#[tokio::test]
async fn test_rendered_scrape_pools_frames() {
    let server = Server::run();
    let renderer = StubRenderer {
        top: vec![
            "https://experts.n8n.io/acme".to_string(),
            "https://acme.com/".to_string(),
        ],
        frames: vec![
            Some(vec!["https://globex.com/about".to_string()]),
            None,
            Some(vec![
                "https://github.com/initech".to_string(),
                "https://initech.io".to_string(),
            ]),
        ],
    };
    let scraper = helpers::scraper(helpers::local_site(&server), helpers::fixture_tables())
        .with_renderer(Arc::new(renderer));

    let urls = vec![
        "https://experts.n8n.io/".to_string(),
        "https://experts.n8n.io/timeout".to_string(),
    ];
    let result = scraper.scrape_directory(&urls, true, None).await.unwrap();

    assert_eq!(result.mode, ScrapeMode::RenderedHrefs);
    assert_eq!(result.domains, vec!["acme.com", "globex.com", "initech.io"]);
    assert_eq!(result.pages_ok, 1);
    assert_eq!(result.pages_failed, 1);
    assert!(matches!(result.skipped[0].reason, SkipReason::Render(_)));
}

#[tokio::test]
async fn test_rendered_scrape_reads_html_when_extraction_fails() {
    let server = Server::run();
    let renderer = StubRenderer {
        top: Vec::new(),
        frames: Vec::new(),
    };
    let scraper = helpers::scraper(helpers::local_site(&server), helpers::fixture_tables())
        .with_renderer(Arc::new(renderer));

    let urls = vec![
        "https://experts.n8n.io/csp".to_string(),
        "https://experts.n8n.io/timeout".to_string(),
    ];
    let result = scraper.scrape_directory(&urls, true, None).await.unwrap();

    assert_eq!(result.mode, ScrapeMode::RenderedHrefs);
    assert_eq!(result.domains, vec!["delta.dev"]);
    assert_eq!(result.pages_ok, 1);
    assert_eq!(result.pages_failed, 1);
}

#[tokio::test]
async fn test_js_without_renderer_falls_back_to_html() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/partners"))
            .respond_with(status_code(200).body(r#"<a href="https://acme.com">A</a>"#)),
    );

    let scraper = helpers::scraper(helpers::local_site(&server), helpers::fixture_tables());
    let url = format!("http://{}/partners", server.addr());
    let result = scraper.scrape_directory(&[url], true, None).await.unwrap();

    assert_eq!(result.mode, ScrapeMode::Html);
    assert_eq!(result.domains, vec!["acme.com"]);
}
