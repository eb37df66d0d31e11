//! Denylist and canonicalization tables.
//!
//! [`DomainTables`] is immutable configuration injected into the scraper at
//! construction time. It answers two questions about a registrable domain:
//! is it a known non-partner (`is_denied`), and what is its authoritative
//! spelling (`canonicalize`).

mod defaults;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::domain::domain_of_host;
use crate::error_handling::ConfigError;

pub use defaults::{DENYLIST, DOMAIN_ALIASES, SLUG_OVERRIDES};

/// On-disk shape of a tables file.
///
/// ```json
/// {
///   "extend_defaults": true,
///   "denylist": ["example-platform.com"],
///   "domain_aliases": {"acme.io": "acme.com"},
///   "slug_overrides": {"acme-consulting": "acme.com"}
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TablesFile {
    /// Merge with the built-in tables instead of replacing them
    pub extend_defaults: bool,
    pub denylist: Vec<String>,
    pub domain_aliases: BTreeMap<String, String>,
    pub slug_overrides: BTreeMap<String, String>,
}

impl Default for TablesFile {
    fn default() -> Self {
        Self {
            extend_defaults: true,
            denylist: Vec::new(),
            domain_aliases: BTreeMap::new(),
            slug_overrides: BTreeMap::new(),
        }
    }
}

/// Denylist, domain aliases, and slug overrides.
///
/// Alias chains are collapsed at construction so `canonicalize` is idempotent.
#[derive(Debug, Clone, Default)]
pub struct DomainTables {
    denylist: HashSet<String>,
    aliases: HashMap<String, String>,
    slug_overrides: HashMap<String, String>,
}

impl DomainTables {
    /// Builds tables from raw entries.
    ///
    /// Keys and values are trimmed and lower-cased. Alias chains
    /// (`a -> b`, `b -> c`) are collapsed to their final target, and
    /// slug-override targets are passed through the aliases.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AliasCycle` if following aliases ever returns to
    /// a domain already visited, and `ConfigError::InvalidSlugOverride` if an
    /// override target (after aliasing) is not a registrable domain or is
    /// denylisted.
    pub fn new<D, A, S>(denylist: D, aliases: A, slug_overrides: S) -> Result<Self, ConfigError>
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        A: IntoIterator<Item = (String, String)>,
        S: IntoIterator<Item = (String, String)>,
    {
        let denylist: HashSet<String> = denylist
            .into_iter()
            .map(|d| clean(d.as_ref()))
            .filter(|d| !d.is_empty())
            .collect();

        let raw_aliases: HashMap<String, String> = aliases
            .into_iter()
            .map(|(from, to)| (clean(&from), clean(&to)))
            .filter(|(from, to)| !from.is_empty() && !to.is_empty() && from != to)
            .collect();
        let aliases = collapse_aliases(&raw_aliases)?;

        let mut overrides = HashMap::new();
        for (slug, domain) in slug_overrides {
            let (slug, domain) = (clean(&slug), clean(&domain));
            if slug.is_empty() || domain.is_empty() {
                continue;
            }
            let target = aliases.get(&domain).cloned().unwrap_or(domain);
            let registrable = domain_of_host(&target).is_some_and(|d| d == target);
            if !registrable || denylist.contains(&target) {
                return Err(ConfigError::InvalidSlugOverride { slug, target });
            }
            overrides.insert(slug, target);
        }

        Ok(Self {
            denylist,
            aliases,
            slug_overrides: overrides,
        })
    }

    /// The built-in tables.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::new(DENYLIST.iter(), owned_pairs(DOMAIN_ALIASES), owned_pairs(SLUG_OVERRIDES))
    }

    /// Loads tables from a JSON file, merging with the built-ins unless the
    /// file sets `"extend_defaults": false`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::TablesIo {
            path: path.to_path_buf(),
            source,
        })?;
        let file: TablesFile =
            serde_json::from_str(&raw).map_err(|source| ConfigError::TablesFormat {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_tables_file(file)
    }

    pub fn from_tables_file(file: TablesFile) -> Result<Self, ConfigError> {
        let mut denylist = file.denylist;
        let mut aliases: Vec<(String, String)> = Vec::new();
        let mut slug_overrides: Vec<(String, String)> = Vec::new();

        if file.extend_defaults {
            denylist.extend(DENYLIST.iter().map(|d| d.to_string()));
            aliases.extend(owned_pairs(DOMAIN_ALIASES));
            slug_overrides.extend(owned_pairs(SLUG_OVERRIDES));
        }
        // File entries come last so they win over built-ins
        aliases.extend(file.domain_aliases);
        slug_overrides.extend(file.slug_overrides);

        Self::new(denylist, aliases, slug_overrides)
    }

    /// Exact-match denylist membership. `example.github.com` is not denied
    /// just because `github.com` is.
    pub fn is_denied(&self, domain: &str) -> bool {
        self.denylist.contains(domain)
    }

    /// Rewrites a domain to its canonical form.
    ///
    /// The alias table is consulted first; a `slug` present in the override
    /// table then replaces the result unconditionally.
    pub fn canonicalize(&self, domain: &str, slug: Option<&str>) -> String {
        if let Some(target) = slug.and_then(|s| self.slug_override(s)) {
            return target.to_string();
        }
        self.aliases
            .get(domain)
            .cloned()
            .unwrap_or_else(|| domain.to_string())
    }

    /// Domain forced for a directory slug, if any.
    pub fn slug_override(&self, slug: &str) -> Option<&str> {
        self.slug_overrides
            .get(&clean(slug))
            .map(String::as_str)
    }

    /// Canonicalizes a freshly extracted domain and applies the denylist.
    ///
    /// Returns `None` when either the observed or the canonical form is denied.
    pub fn accept(&self, domain: &str, slug: Option<&str>) -> Option<String> {
        if self.is_denied(domain) {
            return None;
        }
        let canonical = self.canonicalize(domain, slug);
        if self.is_denied(&canonical) {
            return None;
        }
        Some(canonical)
    }

    pub fn denylist_len(&self) -> usize {
        self.denylist.len()
    }
}

fn clean(value: &str) -> String {
    value.trim().to_lowercase()
}

fn owned_pairs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

fn collapse_aliases(raw: &HashMap<String, String>) -> Result<HashMap<String, String>, ConfigError> {
    let mut collapsed = HashMap::with_capacity(raw.len());
    for start in raw.keys() {
        let mut seen = HashSet::from([start.as_str()]);
        let mut current = start.as_str();
        while let Some(next) = raw.get(current) {
            if !seen.insert(next.as_str()) {
                return Err(ConfigError::AliasCycle(start.clone()));
            }
            current = next;
        }
        collapsed.insert(start.clone(), current.to_string());
    }
    Ok(collapsed)
}
