// Filter module tests.

use super::*;
use proptest::prelude::*;

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    owned_pairs(items)
}

fn fixture_tables() -> DomainTables {
    DomainTables::new(
        ["github.com", "twitter.com"],
        pairs(&[("acme.io", "acme.com"), ("acme.net", "acme.io")]),
        pairs(&[("bitovi", "bitovi.com"), ("acme-consulting", "acme.net")]),
    )
    .unwrap()
}

#[test]
fn test_denylist_is_exact_match() {
    let tables = fixture_tables();
    assert!(tables.is_denied("github.com"));
    assert!(!tables.is_denied("example.github.com"));
    assert!(!tables.is_denied("github.co"));
    assert!(!tables.is_denied("notgithub.com"));
}

#[test]
fn test_builtin_tables_are_valid() {
    let tables = DomainTables::builtin().unwrap();
    assert!(tables.is_denied("github.com"));
    assert!(tables.is_denied("n8n.io"));
    assert!(!tables.is_denied("example.github.com"));
    assert_eq!(tables.slug_override("bitovi"), Some("bitovi.com"));
    assert_eq!(tables.denylist_len(), DENYLIST.len());
}

#[test]
fn test_canonicalize_follows_alias_chain() {
    let tables = fixture_tables();
    assert_eq!(tables.canonicalize("acme.net", None), "acme.com");
    assert_eq!(tables.canonicalize("acme.io", None), "acme.com");
    assert_eq!(tables.canonicalize("acme.com", None), "acme.com");
    assert_eq!(tables.canonicalize("other.com", None), "other.com");
}

#[test]
fn test_slug_override_replaces_result() {
    let tables = fixture_tables();
    assert_eq!(tables.canonicalize("wrong.com", Some("bitovi")), "bitovi.com");
    // Override targets go through the aliases too
    assert_eq!(tables.slug_override("acme-consulting"), Some("acme.com"));
    assert_eq!(tables.slug_override("  Bitovi "), Some("bitovi.com"));
    assert_eq!(tables.canonicalize("wrong.com", Some("unknown")), "wrong.com");
}

#[test]
fn test_canonicalize_is_idempotent_for_known_domains() {
    let tables = fixture_tables();
    for domain in ["acme.io", "acme.net", "acme.com", "bitovi.com", "other.com"] {
        let once = tables.canonicalize(domain, None);
        assert_eq!(tables.canonicalize(&once, None), once, "domain {domain}");
    }
}

#[test]
fn test_alias_cycle_is_rejected() {
    let result = DomainTables::new(
        Vec::<String>::new(),
        pairs(&[("a.com", "b.com"), ("b.com", "c.com"), ("c.com", "a.com")]),
        Vec::new(),
    );
    assert!(matches!(result, Err(ConfigError::AliasCycle(_))));
}

#[test]
fn test_denied_slug_override_is_rejected() {
    let result = DomainTables::new(
        ["github.com"],
        Vec::new(),
        pairs(&[("oops", "github.com")]),
    );
    assert!(matches!(
        result,
        Err(ConfigError::InvalidSlugOverride { ref slug, ref target })
            if slug == "oops" && target == "github.com"
    ));

    // Denied only after aliasing
    let result = DomainTables::new(
        ["twitter.com"],
        pairs(&[("twtr.com", "twitter.com")]),
        pairs(&[("social", "twtr.com")]),
    );
    assert!(matches!(result, Err(ConfigError::InvalidSlugOverride { .. })));
}

#[test]
fn test_unregistrable_slug_override_is_rejected() {
    for target in ["127.0.0.1:8080", "localhost", "www.acme.com", "acme.invalidtld"] {
        let result = DomainTables::new(
            Vec::<String>::new(),
            Vec::new(),
            pairs(&[("partner", target)]),
        );
        assert!(
            matches!(result, Err(ConfigError::InvalidSlugOverride { .. })),
            "target {target}"
        );
    }
}

#[test]
fn test_self_alias_is_dropped() {
    let tables = DomainTables::new(
        Vec::<String>::new(),
        pairs(&[("a.com", "A.com ")]),
        Vec::new(),
    )
    .unwrap();
    assert_eq!(tables.canonicalize("a.com", None), "a.com");
}

#[test]
fn test_accept_rejects_denied_observed_or_canonical() {
    let tables = DomainTables::new(
        ["twitter.com"],
        pairs(&[("twtr.com", "twitter.com")]),
        Vec::new(),
    )
    .unwrap();
    assert_eq!(tables.accept("twitter.com", None), None);
    assert_eq!(tables.accept("twtr.com", None), None);
    assert_eq!(tables.accept("acme.com", None).as_deref(), Some("acme.com"));
}

#[test]
fn test_from_file_extends_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tables.json");
    std::fs::write(
        &path,
        r#"{"denylist": ["platform.dev"], "domain_aliases": {"acme.io": "acme.com"}}"#,
    )
    .unwrap();

    let tables = DomainTables::from_file(&path).unwrap();
    assert!(tables.is_denied("platform.dev"));
    assert!(tables.is_denied("github.com"));
    assert_eq!(tables.canonicalize("acme.io", None), "acme.com");
    assert_eq!(tables.slug_override("bitovi"), Some("bitovi.com"));
}

#[test]
fn test_from_file_replaces_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tables.json");
    std::fs::write(
        &path,
        r#"{"extend_defaults": false, "denylist": ["platform.dev"]}"#,
    )
    .unwrap();

    let tables = DomainTables::from_file(&path).unwrap();
    assert!(tables.is_denied("platform.dev"));
    assert!(!tables.is_denied("github.com"));
    assert_eq!(tables.slug_override("bitovi"), None);
}

#[test]
fn test_from_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(matches!(
        DomainTables::from_file(&missing),
        Err(ConfigError::TablesIo { .. })
    ));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(
        DomainTables::from_file(&broken),
        Err(ConfigError::TablesFormat { .. })
    ));
}

proptest! {
    #[test]
    fn prop_canonicalize_idempotent(
        aliases in proptest::collection::btree_map("[a-e]\\.com", "[a-e]\\.com", 0..5),
        probe in "[a-f]\\.com",
    ) {
        // Random alias graphs either build (and are then idempotent) or contain a cycle
        if let Ok(tables) = DomainTables::new(Vec::<String>::new(), aliases, Vec::new()) {
            let once = tables.canonicalize(&probe, None);
            prop_assert_eq!(tables.canonicalize(&once, None), once);
        }
    }
}
