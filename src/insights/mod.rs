//! Upstream reporting client seam.
//!
//! The rest of the pipeline only sees the `InsightsClient` trait; the real
//! Graph API implementation lives in `graph.rs`, tests plug in mocks.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

pub mod graph;
pub mod retry;

/// Named relative reporting presets understood by the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    Today,
    Yesterday,
    Last7Days,
    ThisMonth,
}

impl DatePreset {
    pub fn as_token(&self) -> &'static str {
        match self {
            DatePreset::Today => "today",
            DatePreset::Yesterday => "yesterday",
            DatePreset::Last7Days => "last_7d",
            DatePreset::ThisMonth => "this_month",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "today" => Some(DatePreset::Today),
            "yesterday" => Some(DatePreset::Yesterday),
            "last_7d" => Some(DatePreset::Last7Days),
            "this_month" => Some(DatePreset::ThisMonth),
            _ => None,
        }
    }
}

/// Reporting window: a named preset or an explicit date pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeWindow {
    Preset(DatePreset),
    Range { since: NaiveDate, until: NaiveDate },
}

impl TimeWindow {
    /// Deterministic string used in cache keys.
    pub fn cache_token(&self) -> String {
        match self {
            TimeWindow::Preset(p) => p.as_token().to_string(),
            TimeWindow::Range { since, until } => format!("{}..{}", since, until),
        }
    }

    /// Parse a window token: a preset name or "YYYY-MM-DD..YYYY-MM-DD".
    pub fn parse(token: &str) -> Option<Self> {
        if let Some(preset) = DatePreset::from_token(token) {
            return Some(TimeWindow::Preset(preset));
        }
        let (since, until) = token.split_once("..")?;
        Some(TimeWindow::Range {
            since: since.parse().ok()?,
            until: until.parse().ok()?,
        })
    }
}

/// One qualifying-action entry on a raw insight row. Counts arrive as
/// strings, matching the rest of the wire format.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionCount {
    pub action_type: String,
    pub value: String,
}

/// One campaign-level insight row as the upstream reports it. Numeric
/// fields are strings and are omitted entirely when zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsightRow {
    pub campaign_name: Option<String>,
    pub spend: Option<String>,
    pub impressions: Option<String>,
    pub clicks: Option<String>,
    pub cpc: Option<String>,
    pub ctr: Option<String>,
    pub cpm: Option<String>,
    pub reach: Option<String>,
    pub frequency: Option<String>,
    pub objective: Option<String>,
    pub actions: Option<Vec<ActionCount>>,
}

/// One account-level day of spend for the trend series.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySpend {
    pub date: String,
    pub spend: f64,
}

/// The upstream reporting API, reduced to the three calls the dashboard
/// makes per account.
#[async_trait]
pub trait InsightsClient: Send + Sync {
    /// Display name of an ad account. Callers treat failure as non-fatal.
    async fn account_name(&self, account_id: &str) -> Result<String>;

    /// Campaign-level rows for active campaigns within the window.
    async fn campaign_insights(
        &self,
        account_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<InsightRow>>;

    /// Account-level spend broken down per day over the same window.
    async fn daily_spend(&self, account_id: &str, window: &TimeWindow) -> Result<Vec<DailySpend>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_tokens_round_trip() {
        for p in [
            DatePreset::Today,
            DatePreset::Yesterday,
            DatePreset::Last7Days,
            DatePreset::ThisMonth,
        ] {
            assert_eq!(DatePreset::from_token(p.as_token()), Some(p));
        }
        assert_eq!(DatePreset::from_token("last_90d"), None);
    }

    #[test]
    fn test_parse_window_token() {
        assert_eq!(
            TimeWindow::parse("today"),
            Some(TimeWindow::Preset(DatePreset::Today))
        );
        assert_eq!(
            TimeWindow::parse("2024-01-01..2024-01-31"),
            Some(TimeWindow::Range {
                since: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                until: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            })
        );
        assert_eq!(TimeWindow::parse("fortnight"), None);
        assert_eq!(TimeWindow::parse("2024-01-01"), None);
    }

    #[test]
    fn test_cache_token_distinguishes_windows() {
        let preset = TimeWindow::Preset(DatePreset::Today);
        let range = TimeWindow::Range {
            since: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            until: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        };
        assert_eq!(preset.cache_token(), "today");
        assert_eq!(range.cache_token(), "2024-01-01..2024-01-31");
        assert_ne!(preset.cache_token(), range.cache_token());
    }
}
