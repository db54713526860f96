//! Presentation boundary: sorting and visibility filtering over computed
//! summaries. Pure post-processing, no re-fetch.

use crate::account::AccountSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Case-insensitive A-Z by display name.
    NameAsc,
    SpendDesc,
    SpendAsc,
    CampaignCountDesc,
    ResultsDesc,
}

impl SortOrder {
    pub fn from_env() -> Self {
        match std::env::var("SORT_ORDER").as_deref() {
            Ok("spend_desc") => SortOrder::SpendDesc,
            Ok("spend_asc") => SortOrder::SpendAsc,
            Ok("campaigns") => SortOrder::CampaignCountDesc,
            Ok("results") => SortOrder::ResultsDesc,
            _ => SortOrder::NameAsc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Drop accounts with no campaigns and zero spend.
    HideZeroSpend,
    ShowAll,
}

impl Visibility {
    pub fn from_env() -> Self {
        match std::env::var("SHOW_ALL_ACCOUNTS").as_deref() {
            Ok("1") | Ok("true") | Ok("yes") => Visibility::ShowAll,
            _ => Visibility::HideZeroSpend,
        }
    }
}

pub fn sort_summaries(summaries: &mut [AccountSummary], order: SortOrder) {
    match order {
        SortOrder::NameAsc => {
            summaries.sort_by_key(|s| s.name.to_lowercase());
        }
        SortOrder::SpendDesc => {
            summaries.sort_by(|a, b| {
                b.total_spend
                    .partial_cmp(&a.total_spend)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        SortOrder::SpendAsc => {
            summaries.sort_by(|a, b| {
                a.total_spend
                    .partial_cmp(&b.total_spend)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        SortOrder::CampaignCountDesc => {
            summaries.sort_by(|a, b| b.active_campaigns().cmp(&a.active_campaigns()));
        }
        SortOrder::ResultsDesc => {
            summaries.sort_by(|a, b| b.total_results().cmp(&a.total_results()));
        }
    }
}

pub fn filter_summaries(summaries: Vec<AccountSummary>, visibility: Visibility) -> Vec<AccountSummary> {
    match visibility {
        Visibility::ShowAll => summaries,
        Visibility::HideZeroSpend => summaries
            .into_iter()
            .filter(|s| !s.campaigns.is_empty() || s.total_spend > 0.0)
            .collect(),
    }
}

/// Footer numbers: how many accounts are displayed and their combined spend.
pub fn screen_totals(summaries: &[AccountSummary]) -> (usize, f64) {
    (
        summaries.len(),
        summaries.iter().map(|s| s.total_spend).sum(),
    )
}
