//! Keyword-based partner qualification.
//!
//! Six fixed keyword tables, each summed by substring match on lower-cased
//! text and capped. The capped components add up to the total, which maps
//! to a tier.

use serde::Serialize;
use strum_macros::EnumIter;

/// `(keyword, points)` pairs. A keyword counts once no matter how often it occurs.
type KeywordTable = &'static [(&'static str, u32)];

const SIZE_SIGNALS: KeywordTable = &[
    ("careers", 6),
    ("hiring", 5),
    ("global", 4),
    ("offices", 4),
    ("100+", 3),
    ("200+", 3),
    ("employees", 2),
];

const ENTERPRISE_SECURITY: KeywordTable = &[
    ("soc2", 6),
    ("iso27001", 6),
    ("sso", 3),
    ("saml", 3),
    ("okta", 2),
    ("azure ad", 2),
    ("sla", 2),
    ("slas", 2),
    ("siem", 2),
    ("kubernetes", 2),
    ("k8s", 2),
    ("snowflake", 2),
    ("databricks", 2),
    ("terraform", 2),
];

const TECH_STACK: KeywordTable = &[
    ("kafka", 4),
    ("dbt", 3),
    ("airflow", 3),
    ("snowflake", 3),
    ("llm", 3),
    ("rag", 2),
    ("agent", 2),
    ("orchestration", 2),
    ("aws", 2),
    ("gcp", 2),
    ("azure", 2),
];

const REGULATED_VERTICALS: KeywordTable = &[
    ("healthcare", 3),
    ("hipaa", 3),
    ("fintech", 3),
    ("banking", 3),
    ("insurance", 3),
    ("pharma", 3),
    ("government", 3),
    ("industrial", 2),
    ("manufacturing", 2),
];

const DELIVERY_MATURITY: KeywordTable = &[
    ("statement of work", 3),
    ("sow", 3),
    ("managed services", 4),
    ("24/7", 3),
    ("24x7", 3),
    ("support", 2),
    ("sla", 2),
    ("msp", 2),
];

const MARKETING_ASSETS: KeywordTable = &[
    ("case studies", 4),
    ("whitepaper", 3),
    ("whitepapers", 3),
    ("ebook", 2),
    ("webinar", 2),
    ("roi", 1),
];

const SIZE_CAP: u32 = 25;
const ENTERPRISE_CAP: u32 = 25;
const TECH_CAP: u32 = 15;
const REGULATED_CAP: u32 = 15;
const DELIVERY_CAP: u32 = 15;
const MARKETING_CAP: u32 = 10;

const ENTERPRISE_THRESHOLD: u32 = 70;
const MID_MARKET_THRESHOLD: u32 = 50;

/// Qualification tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize)]
pub enum Tier {
    #[serde(rename = "Enterprise")]
    Enterprise,
    #[serde(rename = "Mid-market")]
    MidMarket,
    #[serde(rename = "SMB")]
    Smb,
}

impl Tier {
    /// Maps a total score to its tier.
    pub fn from_total(total: u32) -> Self {
        if total >= ENTERPRISE_THRESHOLD {
            Tier::Enterprise
        } else if total >= MID_MARKET_THRESHOLD {
            Tier::MidMarket
        } else {
            Tier::Smb
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Enterprise => "Enterprise",
            Tier::MidMarket => "Mid-market",
            Tier::Smb => "SMB",
        }
    }

    /// Name of the sink tab that collects partners of this tier.
    pub fn tab_name(&self) -> &'static str {
        match self {
            Tier::Enterprise => "Enterprise",
            Tier::MidMarket => "MidMarket",
            Tier::Smb => "SMB",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capped per-category points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreComponents {
    pub size_signals: u32,
    pub enterprise_security: u32,
    pub tech_stack: u32,
    pub regulated_verticals: u32,
    pub delivery_maturity: u32,
    pub marketing_assets: u32,
}

impl ScoreComponents {
    pub fn total(&self) -> u32 {
        self.size_signals
            + self.enterprise_security
            + self.tech_stack
            + self.regulated_verticals
            + self.delivery_maturity
            + self.marketing_assets
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub tier: Tier,
    pub total: u32,
    pub components: ScoreComponents,
}

/// Scores free text against the keyword tables.
pub fn score_signals(text: &str) -> Score {
    let text = text.to_lowercase();
    let components = ScoreComponents {
        size_signals: table_points(&text, SIZE_SIGNALS).min(SIZE_CAP),
        enterprise_security: table_points(&text, ENTERPRISE_SECURITY).min(ENTERPRISE_CAP),
        tech_stack: table_points(&text, TECH_STACK).min(TECH_CAP),
        regulated_verticals: table_points(&text, REGULATED_VERTICALS).min(REGULATED_CAP),
        delivery_maturity: table_points(&text, DELIVERY_MATURITY).min(DELIVERY_CAP),
        marketing_assets: table_points(&text, MARKETING_ASSETS).min(MARKETING_CAP),
    };
    let total = components.total();
    Score {
        tier: Tier::from_total(total),
        total,
        components,
    }
}

fn table_points(text: &str, table: KeywordTable) -> u32 {
    table
        .iter()
        .filter(|(keyword, _)| text.contains(keyword))
        .map(|(_, points)| points)
        .sum()
}
