//! Per-page and per-record outcomes, and the run accumulator.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;

use crate::collect::{Collection, HostCount, HostTally};

/// Why a page or record contributed nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("render failed: {0}")]
    Render(String),

    /// The feed document was neither `{results: [...]}` nor an array.
    #[error("unrecognized feed document")]
    UnrecognizedFeed,

    /// The record carried neither a website nor a slug.
    #[error("record has no website or slug")]
    NoIdentifier,

    #[error("no partner domain found")]
    NoDomain,
}

impl SkipReason {
    /// Short machine-friendly label, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            SkipReason::Fetch(_) => "fetch",
            SkipReason::Render(_) => "render",
            SkipReason::UnrecognizedFeed => "unrecognized_feed",
            SkipReason::NoIdentifier => "no_identifier",
            SkipReason::NoDomain => "no_domain",
        }
    }
}

/// Result of processing one directory or feed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Collected(Collection),
    Skipped { url: String, reason: SkipReason },
}

/// Result of resolving one feed record or profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Resolved {
        domain: String,
        name: Option<String>,
    },
    Skipped(SkipReason),
}

/// How the domains of a run were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrapeMode {
    Html,
    RenderedHrefs,
    Feed,
    Crawl,
}

/// A page that was skipped, kept for the run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPage {
    pub url: String,
    pub reason: SkipReason,
}

/// Output of one scrape run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeResult {
    /// Sorted, deduplicated, canonical partner domains
    pub domains: Vec<String>,
    pub mode: ScrapeMode,
    /// Most frequent raw hosts seen before filtering
    pub top_hosts: Vec<HostCount>,
    pub pages_ok: usize,
    pub pages_failed: usize,
    /// Records or profiles that resolved to nothing
    #[serde(skip_serializing_if = "is_zero")]
    pub records_skipped: usize,
    /// Directory display name per domain, when known
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub names: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedPage>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Running state of one scrape. Owned by a single run, never shared.
#[derive(Debug, Default)]
pub(crate) struct RunAccumulator {
    domains: BTreeSet<String>,
    tally: HostTally,
    names: BTreeMap<String, String>,
    pages_ok: usize,
    pages_failed: usize,
    records_skipped: usize,
    skipped: Vec<SkippedPage>,
}

impl RunAccumulator {
    pub(crate) fn page(&mut self, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Collected(collection) => {
                self.pages_ok += 1;
                self.tally.record(collection.hosts);
                self.domains.extend(collection.domains);
            }
            PageOutcome::Skipped { url, reason } => {
                self.pages_failed += 1;
                self.skipped.push(SkippedPage { url, reason });
            }
        }
    }

    /// Counts a page whose records are reported separately via [`Self::record`].
    pub(crate) fn page_ok(&mut self) {
        self.pages_ok += 1;
    }

    pub(crate) fn record(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Resolved { domain, name } => {
                if let Some(name) = name {
                    self.names.entry(domain.clone()).or_insert(name);
                }
                self.domains.insert(domain);
            }
            RecordOutcome::Skipped(_) => self.records_skipped += 1,
        }
    }

    pub(crate) fn finish(self, mode: ScrapeMode, top_n: usize) -> ScrapeResult {
        ScrapeResult {
            domains: self.domains.into_iter().collect(),
            mode,
            top_hosts: self.tally.top(top_n),
            pages_ok: self.pages_ok,
            pages_failed: self.pages_failed,
            records_skipped: self.records_skipped,
            names: self.names,
            skipped: self.skipped,
        }
    }
}
