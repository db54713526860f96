//! Per-account aggregation with fault containment.
//!
//! One bad account must never blank the whole report: every failure while
//! fetching an account's data is contained here and surfaced as a tagged
//! `AccountResult::Failed`, which still renders as a degraded row.

use crate::health::Thresholds;
use crate::insights::{DailySpend, InsightsClient, TimeWindow};
use crate::logging::{json_log, obj, v_num, v_str, warn_log};
use crate::normalize::{normalize_row, CampaignMetric};

/// One configured account's report for a fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSummary {
    pub account_id: String,
    pub name: String,
    pub campaigns: Vec<CampaignMetric>,
    pub total_spend: f64,
    pub daily_trend: Vec<DailySpend>,
}

impl AccountSummary {
    pub fn active_campaigns(&self) -> usize {
        self.campaigns.len()
    }

    pub fn total_results(&self) -> u64 {
        self.campaigns.iter().map(|c| c.results).sum()
    }
}

/// Tagged per-account outcome. The failure variant keeps the reason
/// inspectable instead of swallowing it.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountResult {
    Ok(AccountSummary),
    Failed { account_id: String, reason: String },
}

impl AccountResult {
    pub fn account_id(&self) -> &str {
        match self {
            AccountResult::Ok(s) => &s.account_id,
            AccountResult::Failed { account_id, .. } => account_id,
        }
    }

    /// Render-ready summary: failures become an error-marked, empty
    /// account so the report always lists every configured account.
    pub fn into_summary(self) -> AccountSummary {
        match self {
            AccountResult::Ok(summary) => summary,
            AccountResult::Failed { account_id, .. } => AccountSummary {
                name: format!("Error: {}", account_id),
                account_id,
                campaigns: Vec::new(),
                total_spend: 0.0,
                daily_trend: Vec::new(),
            },
        }
    }
}

/// Fetch, normalize and classify one account's campaigns for the window.
///
/// The display-name lookup and the trend fetch are best-effort; only a
/// campaign-insights failure fails the account, and even that is returned
/// as a value, never propagated.
pub async fn fetch_account(
    client: &dyn InsightsClient,
    account_id: &str,
    window: &TimeWindow,
    thresholds: &Thresholds,
    include_trend: bool,
) -> AccountResult {
    let account_id = account_id.trim();

    let name = match client.account_name(account_id).await {
        Ok(name) => name,
        Err(e) => {
            warn_log(
                "account",
                "name_lookup_failed",
                obj(&[("account_id", v_str(account_id)), ("error", v_str(&e.to_string()))]),
            );
            format!("Account {}", account_id)
        }
    };

    let rows = match client.campaign_insights(account_id, window).await {
        Ok(rows) => rows,
        Err(e) => {
            warn_log(
                "account",
                "insights_failed",
                obj(&[("account_id", v_str(account_id)), ("error", v_str(&e.to_string()))]),
            );
            return AccountResult::Failed {
                account_id: account_id.to_string(),
                reason: e.to_string(),
            };
        }
    };

    let campaigns: Vec<CampaignMetric> =
        rows.iter().map(|row| normalize_row(row, thresholds)).collect();
    let total_spend: f64 = campaigns.iter().map(|c| c.spend).sum();

    // Second, account-level call broken down per day. Cosmetic relative to
    // the campaign table, so its failure only costs the chart.
    let daily_trend = if include_trend {
        match client.daily_spend(account_id, window).await {
            Ok(trend) => trend,
            Err(e) => {
                warn_log(
                    "account",
                    "trend_failed",
                    obj(&[("account_id", v_str(account_id)), ("error", v_str(&e.to_string()))]),
                );
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    json_log(
        "account",
        "fetched",
        obj(&[
            ("account_id", v_str(account_id)),
            ("campaigns", v_num(campaigns.len() as f64)),
            ("total_spend", v_num(total_spend)),
        ]),
    );

    AccountResult::Ok(AccountSummary {
        account_id: account_id.to_string(),
        name,
        campaigns,
        total_spend,
        daily_trend,
    })
}
