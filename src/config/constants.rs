//! Configuration constants.
//!
//! Timeouts, politeness intervals, size caps, and the defaults for the partner
//! directory this tool was built against.

use std::time::Duration;

// Network operation timeouts
/// Per-request HTTP timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Per-navigation timeout for headless rendering
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent string for HTTP requests.
///
/// Identifies the scraper honestly; directory operators can reach out via the URL.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; MotivoScraper/1.0; +https://getmotivo.ai)";

// Politeness
/// Fixed delay between consecutive requests to the target site, in milliseconds
pub const POLITENESS_DELAY_MS: u64 = 800;

// Rendering
/// Post-load settle time before extracting links from a rendered page
pub const RENDER_WAIT_MS: u64 = 1500;
/// Upper bound on auto-scroll steps while waiting for lazy content
pub const MAX_SCROLL_STEPS: usize = 12;
/// Pause between auto-scroll steps
pub const SCROLL_PAUSE: Duration = Duration::from_millis(400);
/// Maximum number of secondary browsing contexts (iframes) inspected per page
pub const MAX_FRAMES: usize = 32;

// Feed pagination
/// Maximum page size accepted by the directory feed provider
pub const FEED_PAGE_SIZE: u32 = 21;
/// Number of feed pages requested when the caller does not say otherwise
pub const DEFAULT_FEED_PAGES: u32 = 2;

// Crawl mode
/// Directory listing pages visited when discovering profile slugs
pub const CRAWL_MAX_PAGES: u32 = 5;
/// Maximum profiles resolved per crawl
pub const CRAWL_PROFILE_LIMIT: usize = 100;
/// Single-segment links on listing pages that are not partner profiles
pub const RESERVED_SLUGS: &[&str] = &["contact", "review"];

// Partner scoring
/// Maximum number of partner pages scanned per domain
pub const PARTNER_PAGE_LIMIT: usize = 6;
/// Response bodies longer than this many characters are truncated
pub const MAX_BODY_CHARS: usize = 500_000;
/// Visible text kept per scanned partner page
pub const MAX_TEXT_BLOB_CHARS: usize = 800;

// Diagnostics
/// Number of raw hosts reported in the top-host diagnostic
pub const TOP_HOSTS: usize = 15;

// Redirect handling
/// Maximum number of redirect hops to follow
pub const MAX_REDIRECT_HOPS: usize = 10;

// Retry strategy
/// Total attempts for a request that fails at the connection level (initial + retries)
pub const RETRY_MAX_ATTEMPTS: usize = 3;
/// Fixed pause between connection-level retries, in milliseconds
pub const RETRY_INTERVAL_MS: u64 = 250;

// Directory defaults
/// Public site of the partner directory
pub const DEFAULT_SITE_BASE: &str = "https://experts.n8n.io";
/// Host serving the directory's JSON feed
pub const DEFAULT_FEED_BASE: &str = "https://admin.partnerpage.io";
/// Feed search path; `{uuid}` is replaced with the directory identifier
pub const DEFAULT_FEED_SEARCH_PATH: &str = "/search/directory_vendor/service_partners/{uuid}/";
/// Identifier of the directory inside the feed provider
pub const DEFAULT_DIRECTORY_UUID: &str = "3cc2eccc-f4f5-40b5-aa94-310ebb352941";

// Sink
/// Environment variable naming the directory that receives CSV rows
pub const SINK_DIR_ENV: &str = "PARTNER_SINK_DIR";
