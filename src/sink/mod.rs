//! Result sink.
//!
//! Scored partners are appended as rows to one tab per tier. Appends are a
//! best-effort side effect: callers log failures and carry on.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use log::debug;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::error_handling::SinkError;
use crate::partner::PartnerReport;
use crate::score::Tier;

/// Column names, in row order.
pub const PARTNER_ROW_HEADERS: &[&str] = &[
    "timestamp",
    "name",
    "domain",
    "size_signals",
    "enterprise_security",
    "tech_stack",
    "regulated_verticals",
    "delivery_maturity",
    "marketing_assets",
    "score_total",
    "tier",
    "sources",
];

/// One scored partner, flattened for a tabular store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartnerRow {
    /// UTC, RFC 3339
    pub timestamp: String,
    pub name: String,
    pub domain: String,
    pub size_signals: u32,
    pub enterprise_security: u32,
    pub tech_stack: u32,
    pub regulated_verticals: u32,
    pub delivery_maturity: u32,
    pub marketing_assets: u32,
    pub score_total: u32,
    pub tier: String,
    /// Space-separated source URLs
    pub sources: String,
}

impl PartnerRow {
    /// Builds a row stamped with the current time. A missing `name` is written empty.
    pub fn from_report(report: &PartnerReport, name: Option<&str>) -> Self {
        let components = &report.score_components;
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            name: name.unwrap_or_default().to_string(),
            domain: report.domain.clone(),
            size_signals: components.size_signals,
            enterprise_security: components.enterprise_security,
            tech_stack: components.tech_stack,
            regulated_verticals: components.regulated_verticals,
            delivery_maturity: components.delivery_maturity,
            marketing_assets: components.marketing_assets,
            score_total: report.score_total,
            tier: report.tier.to_string(),
            sources: report.sources.join(" "),
        }
    }
}

/// A tabular store with named tabs.
pub trait RowSink: Send + Sync {
    fn append(&self, tab: &str, row: &PartnerRow) -> Result<(), SinkError>;
}

/// Writes each tab to `<dir>/<tab>.csv`.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    /// Creates the sink directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn tab_path(&self, tab: &str) -> PathBuf {
        self.dir.join(format!("{tab}.csv"))
    }

    /// Creates every tier tab with a header row. Existing tabs are left alone.
    pub fn ensure_tabs(&self) -> Result<(), SinkError> {
        for tier in Tier::iter() {
            let path = self.tab_path(tier.tab_name());
            if is_empty_file(&path) {
                let mut writer = csv::Writer::from_path(&path)?;
                writer.write_record(PARTNER_ROW_HEADERS)?;
                writer.flush()?;
                debug!("Created tab {}", path.display());
            }
        }
        Ok(())
    }
}

impl RowSink for CsvSink {
    fn append(&self, tab: &str, row: &PartnerRow) -> Result<(), SinkError> {
        let path = self.tab_path(tab);
        let needs_header = is_empty_file(&path);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(row)?;
        writer.flush()?;
        Ok(())
    }
}

fn is_empty_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true)
}
