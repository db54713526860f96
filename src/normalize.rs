//! Metrics normalization: one raw insight row into one typed campaign
//! record.
//!
//! The upstream omits zero-valued fields entirely, so absence is never an
//! error. A field that is present but unparseable is logged and
//! zero-filled; normalization is total and idempotent.

use crate::health::{classify, Health, Objective, Thresholds};
use crate::insights::InsightRow;
use crate::logging::{obj, v_str, warn_log};

/// Action types that count as a qualifying result.
pub const RESULT_ACTION_TYPES: &[&str] = &["lead", "purchase", "onsite_conversion.lead"];

/// One campaign's metrics for a reporting window, classified.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignMetric {
    pub name: String,
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub cpc: f64,
    /// Click-through rate as a percentage.
    pub ctr: f64,
    pub cpm: f64,
    pub reach: u64,
    pub frequency: f64,
    /// Qualifying conversion count.
    pub results: u64,
    /// Spend per result; 0.0 is the "no conversions" sentinel.
    pub cpa: f64,
    pub objective: Objective,
    pub health: Health,
}

fn parse_f64(field: &str, raw: Option<&str>) -> f64 {
    match raw {
        None => 0.0,
        Some(s) => s.parse().unwrap_or_else(|_| {
            warn_log(
                "normalize",
                "malformed_numeric",
                obj(&[("field", v_str(field)), ("value", v_str(s))]),
            );
            0.0
        }),
    }
}

fn parse_u64(field: &str, raw: Option<&str>) -> u64 {
    match raw {
        None => 0,
        Some(s) => s.parse().unwrap_or_else(|_| {
            warn_log(
                "normalize",
                "malformed_numeric",
                obj(&[("field", v_str(field)), ("value", v_str(s))]),
            );
            0
        }),
    }
}

/// Sum the counts of qualifying action types. Unrecognized types are
/// ignored; a missing action list means zero results.
fn sum_results(row: &InsightRow) -> u64 {
    let Some(actions) = &row.actions else {
        return 0;
    };
    actions
        .iter()
        .filter(|a| RESULT_ACTION_TYPES.contains(&a.action_type.as_str()))
        .map(|a| parse_u64("actions.value", Some(&a.value)))
        .sum()
}

/// Normalize and classify one raw row. Pure apart from warn logging.
pub fn normalize_row(row: &InsightRow, thresholds: &Thresholds) -> CampaignMetric {
    let spend = parse_f64("spend", row.spend.as_deref());
    let ctr = parse_f64("ctr", row.ctr.as_deref());
    let cpm = parse_f64("cpm", row.cpm.as_deref());
    let results = sum_results(row);
    let cpa = if results > 0 { spend / results as f64 } else { 0.0 };
    let objective = Objective::from_raw(row.objective.as_deref());
    let health = classify(&objective, ctr, cpm, cpa, thresholds);

    CampaignMetric {
        name: row.campaign_name.clone().unwrap_or_default(),
        spend,
        impressions: parse_u64("impressions", row.impressions.as_deref()),
        clicks: parse_u64("clicks", row.clicks.as_deref()),
        cpc: parse_f64("cpc", row.cpc.as_deref()),
        ctr,
        cpm,
        reach: parse_u64("reach", row.reach.as_deref()),
        frequency: parse_f64("frequency", row.frequency.as_deref()),
        results,
        cpa,
        objective,
        health,
    }
}
