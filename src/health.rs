//! Campaign health classification.
//!
//! Pure threshold classifier: a campaign objective picks the metric family
//! (clicks, conversions, reach) and the family's cut-offs map the metric to
//! a label. Thresholds are data, not control flow: the dashboard variants
//! this replaces never agreed on exact numbers.

use serde::Serialize;

/// Campaign goal category as reported upstream. `Other` keeps the raw
/// string for display; it never matches a classification family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Objective {
    Traffic,
    Engagement,
    LinkClicks,
    PostEngagement,
    VideoViews,
    Sales,
    Leads,
    Conversions,
    CatalogSales,
    Awareness,
    BrandAwareness,
    Reach,
    Unknown,
    Other(String),
}

impl Objective {
    /// Total mapping from the upstream wire strings.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") | Some("UNKNOWN") => Objective::Unknown,
            Some("OUTCOME_TRAFFIC") => Objective::Traffic,
            Some("OUTCOME_ENGAGEMENT") => Objective::Engagement,
            Some("LINK_CLICKS") => Objective::LinkClicks,
            Some("POST_ENGAGEMENT") => Objective::PostEngagement,
            Some("VIDEO_VIEWS") => Objective::VideoViews,
            Some("OUTCOME_SALES") => Objective::Sales,
            Some("OUTCOME_LEADS") => Objective::Leads,
            Some("CONVERSIONS") => Objective::Conversions,
            Some("PRODUCT_CATALOG_SALES") => Objective::CatalogSales,
            Some("OUTCOME_AWARENESS") => Objective::Awareness,
            Some("BRAND_AWARENESS") => Objective::BrandAwareness,
            Some("REACH") => Objective::Reach,
            Some(other) => Objective::Other(other.to_string()),
        }
    }

    pub fn family(&self) -> ObjectiveFamily {
        match self {
            Objective::Traffic
            | Objective::Engagement
            | Objective::LinkClicks
            | Objective::PostEngagement
            | Objective::VideoViews => ObjectiveFamily::Clicks,
            Objective::Sales
            | Objective::Leads
            | Objective::Conversions
            | Objective::CatalogSales => ObjectiveFamily::Conversions,
            Objective::Awareness | Objective::BrandAwareness | Objective::Reach => {
                ObjectiveFamily::Reach
            }
            Objective::Unknown | Objective::Other(_) => ObjectiveFamily::Other,
        }
    }

    /// Human label for tables; unrecognized objectives display their raw
    /// upstream string.
    pub fn label(&self) -> &str {
        match self {
            Objective::Traffic => "Traffic",
            Objective::Engagement => "Engagement",
            Objective::LinkClicks => "Link Clicks",
            Objective::PostEngagement => "Post Engagement",
            Objective::VideoViews => "Video Views",
            Objective::Sales => "Sales",
            Objective::Leads => "Leads",
            Objective::Conversions => "Conversions",
            Objective::CatalogSales => "Catalog Sales",
            Objective::Awareness => "Awareness",
            Objective::BrandAwareness => "Brand Awareness",
            Objective::Reach => "Reach",
            Objective::Unknown => "Unknown",
            Objective::Other(raw) => raw,
        }
    }
}

/// Which metric drives classification for an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveFamily {
    Clicks,
    Conversions,
    Reach,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Health {
    Excellent,
    Good,
    Average,
    Poor,
    Expensive,
    Critical,
    NoConversions,
    Neutral,
}

impl Health {
    pub fn label(&self) -> &'static str {
        match self {
            Health::Excellent => "Excellent",
            Health::Good => "Good",
            Health::Average => "Average",
            Health::Poor => "Poor",
            Health::Expensive => "Expensive",
            Health::Critical => "Critical",
            Health::NoConversions => "No Conversions",
            Health::Neutral => "Normal",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Health::Excellent => "🔵",
            Health::Good => "🟢",
            Health::Average => "🟡",
            Health::Poor => "🟠",
            Health::Expensive => "🟠",
            Health::Critical => "🔴",
            Health::NoConversions | Health::Neutral => "⚪",
        }
    }
}

/// Classification cut-offs. CTR bounds are inclusive lower bounds
/// (percentage), CPA/CPM bounds are inclusive upper bounds (currency).
#[derive(Debug, Clone)]
pub struct Thresholds {
    pub ctr_excellent: f64,
    pub ctr_good: f64,
    pub ctr_average: f64,
    pub ctr_poor: f64,
    pub cpa_excellent: f64,
    pub cpa_good: f64,
    pub cpa_average: f64,
    pub cpa_expensive: f64,
    pub cpm_excellent: f64,
    pub cpm_good: f64,
    pub cpm_average: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ctr_excellent: 1.5,
            ctr_good: 1.0,
            ctr_average: 0.6,
            ctr_poor: 0.3,
            cpa_excellent: 10.0,
            cpa_good: 30.0,
            cpa_average: 60.0,
            cpa_expensive: 100.0,
            cpm_excellent: 5.0,
            cpm_good: 10.0,
            cpm_average: 20.0,
        }
    }
}

/// Map one campaign's objective and rates to a health label. Total over
/// all inputs; cpa == 0 for a conversion objective means "no conversions
/// yet", never an error.
pub fn classify(objective: &Objective, ctr: f64, cpm: f64, cpa: f64, th: &Thresholds) -> Health {
    match objective.family() {
        ObjectiveFamily::Clicks => {
            if ctr >= th.ctr_excellent {
                Health::Excellent
            } else if ctr >= th.ctr_good {
                Health::Good
            } else if ctr >= th.ctr_average {
                Health::Average
            } else if ctr >= th.ctr_poor {
                Health::Poor
            } else {
                Health::Critical
            }
        }
        ObjectiveFamily::Conversions => {
            if cpa == 0.0 {
                Health::NoConversions
            } else if cpa <= th.cpa_excellent {
                Health::Excellent
            } else if cpa <= th.cpa_good {
                Health::Good
            } else if cpa <= th.cpa_average {
                Health::Average
            } else if cpa <= th.cpa_expensive {
                Health::Expensive
            } else {
                Health::Critical
            }
        }
        ObjectiveFamily::Reach => {
            if cpm <= th.cpm_excellent {
                Health::Excellent
            } else if cpm <= th.cpm_good {
                Health::Good
            } else if cpm <= th.cpm_average {
                Health::Average
            } else {
                Health::Expensive
            }
        }
        ObjectiveFamily::Other => Health::Neutral,
    }
}
