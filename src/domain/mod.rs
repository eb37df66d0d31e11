//! Host and registrable-domain extraction.
//!
//! This module turns arbitrary hrefs and bare host strings into canonical
//! hosts and registrable domains using the Public Suffix List (PSL).
//!
//! Key functions:
//! - `host_of()` - Extracts a lower-cased, port-less host from an href or bare host
//! - `registrable_domain_of()` - Extracts the registrable domain (e.g. `example.co.uk`)
//! - `domain_of_host()` - Same, starting from an already-extracted host
//!
//! Nothing here consults the denylist or canonicalization tables; that is
//! [`crate::filter`]'s job, so each stage can be tested and composed on its own.

use std::net::IpAddr;

use psl::Psl;

/// Schemes that never point at a website.
const NON_WEB_SCHEMES: &[&str] = &["mailto:", "tel:"];

/// Extracts the host from an href or bare host string.
///
/// Inputs without a leading `<scheme>://` are treated as bare hosts (as if
/// `http://` were prefixed); a `://` later in the input does not count. The network-location component is used; when it
/// is empty, the path component stands in for it. User-info, any port suffix,
/// and a trailing dot are removed, and the result is lower-cased.
///
/// # Returns
///
/// `None` for empty input, `mailto:`/`tel:` links, or when nothing is left
/// after stripping.
///
/// # Examples
///
/// ```
/// use partner_scout::domain::host_of;
///
/// assert_eq!(host_of("http://Foo.com:8080/x").as_deref(), Some("foo.com"));
/// assert_eq!(host_of("acme.com/pricing").as_deref(), Some("acme.com"));
/// assert_eq!(host_of("mailto:hi@acme.com"), None);
/// ```
pub fn host_of(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || NON_WEB_SCHEMES.iter().any(|s| starts_with_ignore_case(raw, s)) {
        return None;
    }

    let rest = match raw.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        // Scheme-relative (`//cdn.example.com/x`) or a bare host, possibly
        // with a URL inside its query string
        _ => raw.strip_prefix("//").unwrap_or(raw),
    };

    let path_end = rest.find(&['?', '#'][..]).unwrap_or(rest.len());
    let without_query = &rest[..path_end];
    let netloc_end = without_query.find('/').unwrap_or(without_query.len());
    let netloc = &without_query[..netloc_end];

    let location = if netloc.is_empty() {
        without_query
    } else {
        netloc
    };

    // user:pass@host
    let location = location.rsplit('@').next().unwrap_or(location);
    let host = strip_port(location).trim_end_matches('.').to_lowercase();

    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Extracts the registrable domain from an href or bare host string.
///
/// # Returns
///
/// The registrable domain (e.g. `example.co.uk` from
/// `https://sub.example.co.uk/path`), or `None` when no host can be found or
/// the host has no registrable part under a known public suffix (IP
/// addresses, single-label hosts, unknown TLDs).
pub fn registrable_domain_of(raw: &str) -> Option<String> {
    let host = host_of(raw)?;
    domain_of_host(&host)
}

/// Extracts the registrable domain from a host produced by [`host_of`].
///
/// The result always has the form `<label>.<suffix>` with both parts non-empty.
pub fn domain_of_host(host: &str) -> Option<String> {
    if host.is_empty() || !host.chars().all(is_host_char) {
        return None;
    }
    if host.split('.').any(str::is_empty) {
        return None;
    }

    // IP addresses don't have registrable domains
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    if bare.parse::<IpAddr>().is_ok() {
        return None;
    }

    let domain = psl::List.domain(host.as_bytes())?;
    if !domain.suffix().is_known() {
        return None;
    }

    let domain = std::str::from_utf8(domain.as_bytes()).ok()?;
    let (label, suffix) = domain.split_once('.')?;
    if label.is_empty() || suffix.is_empty() {
        return None;
    }
    Some(domain.to_string())
}

fn strip_port(location: &str) -> &str {
    if location.starts_with('[') {
        // [v6]:port keeps the brackets, drops the port
        return match location.find(']') {
            Some(end) => &location[..=end],
            None => location,
        };
    }
    location.split(':').next().unwrap_or(location)
}

/// `[A-Za-z][A-Za-z0-9+.-]*`
fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn is_host_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_') || !c.is_ascii()
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
