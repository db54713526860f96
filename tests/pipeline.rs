//! End-to-end pipeline tests against a programmable mock insights client.
//!
//! These cover the contract the dashboard depends on: per-account fault
//! containment, deterministic aggregation, and the cache short-circuit.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use adsmon::account::{fetch_account, AccountResult};
use adsmon::health::{Health, Thresholds};
use adsmon::insights::{ActionCount, DailySpend, DatePreset, InsightRow, InsightsClient, TimeWindow};
use adsmon::orchestrator::FetchOrchestrator;

#[derive(Default)]
struct MockClient {
    names: HashMap<String, String>,
    rows: HashMap<String, Vec<InsightRow>>,
    trend: HashMap<String, Vec<DailySpend>>,
    fail_names: HashSet<String>,
    fail_insights: HashSet<String>,
    fail_trend: HashSet<String>,
    upstream_calls: AtomicU32,
}

impl MockClient {
    fn calls(&self) -> u32 {
        self.upstream_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InsightsClient for MockClient {
    async fn account_name(&self, account_id: &str) -> Result<String> {
        self.upstream_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_names.contains(account_id) {
            return Err(anyhow!("name lookup denied for {}", account_id));
        }
        Ok(self
            .names
            .get(account_id)
            .cloned()
            .unwrap_or_else(|| format!("Named {}", account_id)))
    }

    async fn campaign_insights(
        &self,
        account_id: &str,
        _window: &TimeWindow,
    ) -> Result<Vec<InsightRow>> {
        self.upstream_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_insights.contains(account_id) {
            return Err(anyhow!("rate limited: {}", account_id));
        }
        Ok(self.rows.get(account_id).cloned().unwrap_or_default())
    }

    async fn daily_spend(&self, account_id: &str, _window: &TimeWindow) -> Result<Vec<DailySpend>> {
        self.upstream_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_trend.contains(account_id) {
            return Err(anyhow!("trend unavailable for {}", account_id));
        }
        Ok(self.trend.get(account_id).cloned().unwrap_or_default())
    }
}

fn row(name: &str, spend: &str, objective: &str, leads: Option<&str>) -> InsightRow {
    InsightRow {
        campaign_name: Some(name.into()),
        spend: Some(spend.into()),
        objective: Some(objective.into()),
        actions: leads.map(|v| {
            vec![ActionCount {
                action_type: "lead".into(),
                value: v.into(),
            }]
        }),
        ..Default::default()
    }
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn window() -> TimeWindow {
    TimeWindow::Preset(DatePreset::Today)
}

fn three_account_client() -> MockClient {
    let mut client = MockClient::default();
    client.rows.insert(
        "act_a".into(),
        vec![
            row("A1", "10.00", "OUTCOME_SALES", Some("2")),
            row("A2", "0.00", "OUTCOME_TRAFFIC", None),
            row("A3", "25.50", "OUTCOME_SALES", Some("1")),
        ],
    );
    client.fail_insights.insert("act_b".into());
    client
        .rows
        .insert("act_c".into(), vec![row("C1", "7.25", "OUTCOME_LEADS", Some("5"))]);
    client
}

#[tokio::test]
async fn containment_one_failing_account_leaves_siblings_intact() {
    let client = Arc::new(three_account_client());
    let orch = FetchOrchestrator::new(client.clone(), Duration::from_secs(300), 5, false);

    let results = orch.fetch_all(&ids(&["act_a", "act_b", "act_c"]), &window()).await;
    assert_eq!(results.len(), 3);

    let AccountResult::Ok(a) = &results[0] else {
        panic!("act_a should succeed");
    };
    assert_eq!(a.account_id, "act_a");
    assert_eq!(a.campaigns.len(), 3);

    match &results[1] {
        AccountResult::Failed { account_id, reason } => {
            assert_eq!(account_id, "act_b");
            assert!(reason.contains("rate limited"));
        }
        other => panic!("act_b should fail, got {:?}", other),
    }

    let AccountResult::Ok(c) = &results[2] else {
        panic!("act_c should succeed");
    };
    assert_eq!(c.total_spend, 7.25);

    // The same accounts fetched without the bad sibling produce identical
    // numbers.
    let solo_client = Arc::new(three_account_client());
    let solo = FetchOrchestrator::new(solo_client, Duration::from_secs(300), 5, false);
    let solo_results = solo.fetch_all(&ids(&["act_a", "act_c"]), &window()).await;
    assert_eq!(&solo_results[0], &results[0]);
    assert_eq!(&solo_results[1], &results[2]);
}

#[tokio::test]
async fn total_spend_is_sum_of_campaign_spends() {
    let client = Arc::new(three_account_client());
    let orch = FetchOrchestrator::new(client, Duration::from_secs(300), 5, false);

    let results = orch.fetch_all(&ids(&["act_a"]), &window()).await;
    let AccountResult::Ok(summary) = &results[0] else {
        panic!("expected success");
    };
    assert!((summary.total_spend - 35.50).abs() < 1e-9);
    let campaign_sum: f64 = summary.campaigns.iter().map(|c| c.spend).sum();
    assert!((summary.total_spend - campaign_sum).abs() < 1e-9);
}

#[tokio::test]
async fn cache_hit_issues_zero_upstream_calls() {
    let client = Arc::new(three_account_client());
    let orch = FetchOrchestrator::new(client.clone(), Duration::from_secs(300), 5, false);
    let accounts = ids(&["act_a", "act_c"]);

    let first = orch.fetch_all(&accounts, &window()).await;
    let after_first = client.calls();
    assert!(after_first > 0);

    let second = orch.fetch_all(&accounts, &window()).await;
    assert_eq!(client.calls(), after_first, "cache hit must not touch upstream");
    assert_eq!(first, second);
}

#[tokio::test]
async fn invalidation_forces_refetch() {
    let client = Arc::new(three_account_client());
    let orch = FetchOrchestrator::new(client.clone(), Duration::from_secs(300), 5, false);
    let accounts = ids(&["act_a"]);

    orch.fetch_all(&accounts, &window()).await;
    let after_first = client.calls();

    orch.invalidate();
    orch.fetch_all(&accounts, &window()).await;
    assert!(client.calls() > after_first, "invalidation must force upstream calls");
}

#[tokio::test]
async fn different_window_is_a_cache_miss() {
    let client = Arc::new(three_account_client());
    let orch = FetchOrchestrator::new(client.clone(), Duration::from_secs(300), 5, false);
    let accounts = ids(&["act_a"]);

    orch.fetch_all(&accounts, &TimeWindow::Preset(DatePreset::Today)).await;
    let after_first = client.calls();
    orch.fetch_all(&accounts, &TimeWindow::Preset(DatePreset::Yesterday)).await;
    assert!(client.calls() > after_first);
}

#[tokio::test]
async fn results_follow_input_order() {
    let mut client = MockClient::default();
    for id in ["act_3", "act_1", "act_2"] {
        client.rows.insert(id.into(), vec![row("x", "1.00", "OUTCOME_TRAFFIC", None)]);
    }
    let orch = FetchOrchestrator::new(Arc::new(client), Duration::from_secs(300), 2, false);

    let results = orch.fetch_all(&ids(&["act_3", "act_1", "act_2"]), &window()).await;
    let order: Vec<&str> = results.iter().map(|r| r.account_id()).collect();
    assert_eq!(order, vec!["act_3", "act_1", "act_2"]);
}

#[tokio::test]
async fn name_lookup_failure_falls_back_without_failing_account() {
    let mut client = three_account_client();
    client.fail_names.insert("act_a".into());

    let result = fetch_account(&client, "act_a", &window(), &Thresholds::default(), false).await;
    let AccountResult::Ok(summary) = result else {
        panic!("name failure must not fail the account");
    };
    assert_eq!(summary.name, "Account act_a");
    assert_eq!(summary.campaigns.len(), 3);
}

#[tokio::test]
async fn trend_failure_degrades_to_empty_series() {
    let mut client = three_account_client();
    client.fail_trend.insert("act_a".into());

    let result = fetch_account(&client, "act_a", &window(), &Thresholds::default(), true).await;
    let AccountResult::Ok(summary) = result else {
        panic!("trend failure must not fail the account");
    };
    assert!(summary.daily_trend.is_empty());
    assert_eq!(summary.campaigns.len(), 3);
}

#[tokio::test]
async fn trend_rows_are_carried_when_requested() {
    let mut client = three_account_client();
    client.trend.insert(
        "act_a".into(),
        vec![
            DailySpend { date: "2024-03-01".into(), spend: 12.0 },
            DailySpend { date: "2024-03-02".into(), spend: 23.5 },
        ],
    );

    let result = fetch_account(&client, "act_a", &window(), &Thresholds::default(), true).await;
    let AccountResult::Ok(summary) = result else {
        panic!("expected success");
    };
    assert_eq!(summary.daily_trend.len(), 2);
    assert_eq!(summary.daily_trend[1].spend, 23.5);
}

#[tokio::test]
async fn classified_rows_flow_through_the_pipeline() {
    let client = Arc::new(three_account_client());
    let orch = FetchOrchestrator::new(client, Duration::from_secs(300), 5, false);

    let results = orch.fetch_all(&ids(&["act_a"]), &window()).await;
    let AccountResult::Ok(summary) = &results[0] else {
        panic!("expected success");
    };
    // A1: Sales, spend 10.00 over 2 leads => cpa 5.00 => Excellent.
    assert_eq!(summary.campaigns[0].health, Health::Excellent);
    // A2: Traffic with no ctr reported => Critical tier.
    assert_eq!(summary.campaigns[1].health, Health::Critical);
    // A3: Sales, spend 25.50 over 1 lead => cpa 25.50 => Good.
    assert_eq!(summary.campaigns[2].health, Health::Good);
}
