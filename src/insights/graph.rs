//! Graph API implementation of the insights client.
//!
//! All numeric fields come back as strings and zero-valued fields are
//! omitted, so the wire types stay `Option<String>` and normalization
//! happens downstream.

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::Config;
use crate::insights::retry::{retry_async, RetryConfig};
use crate::insights::{DailySpend, InsightRow, InsightsClient, TimeWindow};

const CAMPAIGN_FIELDS: &str =
    "campaign_name,spend,impressions,clicks,cpc,ctr,reach,frequency,cpm,actions,objective";

pub struct GraphClient {
    client: Client,
    base: String,
    api_version: String,
    access_token: String,
    retry: RetryConfig,
}

#[derive(Deserialize, Debug)]
struct InsightsEnvelope {
    #[serde(default)]
    data: Vec<InsightRow>,
}

#[derive(Deserialize, Debug)]
struct DailyEnvelope {
    #[serde(default)]
    data: Vec<DailyRow>,
}

#[derive(Deserialize, Debug)]
struct DailyRow {
    date_start: String,
    spend: Option<String>,
}

#[derive(Deserialize, Debug)]
struct AccountNameResponse {
    name: String,
}

#[derive(Deserialize, Debug)]
struct GraphErrorEnvelope {
    error: GraphError,
}

#[derive(Deserialize, Debug)]
struct GraphError {
    message: String,
    #[serde(default)]
    code: i64,
}

impl GraphClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(cfg.http_timeout_secs))
                .build()?,
            base: cfg.graph_base.clone(),
            api_version: cfg.api_version.clone(),
            access_token: cfg.access_token.clone(),
            retry: RetryConfig::default(),
        })
    }

    fn node_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base, self.api_version, path)
    }

    fn window_param(window: &TimeWindow) -> (&'static str, String) {
        match window {
            TimeWindow::Preset(p) => ("date_preset", p.as_token().to_string()),
            TimeWindow::Range { since, until } => (
                "time_range",
                format!(r#"{{"since":"{}","until":"{}"}}"#, since, until),
            ),
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .query(params)
            .query(&[("access_token", self.access_token.as_str())])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<GraphErrorEnvelope>(&body) {
                return Err(anyhow!(
                    "graph api error {} (code {}): {}",
                    status,
                    envelope.error.code,
                    envelope.error.message
                ));
            }
            return Err(anyhow!("graph api error {}: {}", status, body));
        }

        serde_json::from_str(&body).map_err(|e| anyhow!("unexpected graph response: {}", e))
    }
}

#[async_trait::async_trait]
impl InsightsClient for GraphClient {
    async fn account_name(&self, account_id: &str) -> Result<String> {
        let url = self.node_url(account_id);
        let params = [("fields", "name".to_string())];
        let resp: AccountNameResponse = retry_async(&self.retry, "account_name", || {
            self.get_json(&url, &params)
        })
        .await?;
        Ok(resp.name)
    }

    async fn campaign_insights(
        &self,
        account_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<InsightRow>> {
        let url = self.node_url(&format!("{}/insights", account_id));
        let (window_key, window_value) = Self::window_param(window);
        let params = [
            ("level", "campaign".to_string()),
            ("fields", CAMPAIGN_FIELDS.to_string()),
            (
                "filtering",
                r#"[{"field":"campaign.effective_status","operator":"IN","value":["ACTIVE"]}]"#
                    .to_string(),
            ),
            (window_key, window_value),
        ];
        let envelope: InsightsEnvelope = retry_async(&self.retry, "campaign_insights", || {
            self.get_json(&url, &params)
        })
        .await?;
        Ok(envelope.data)
    }

    async fn daily_spend(&self, account_id: &str, window: &TimeWindow) -> Result<Vec<DailySpend>> {
        let url = self.node_url(&format!("{}/insights", account_id));
        let (window_key, window_value) = Self::window_param(window);
        let params = [
            ("level", "account".to_string()),
            ("fields", "spend,date_start".to_string()),
            ("time_increment", "1".to_string()),
            (window_key, window_value),
        ];
        let envelope: DailyEnvelope = retry_async(&self.retry, "daily_spend", || {
            self.get_json(&url, &params)
        })
        .await?;

        Ok(envelope
            .data
            .into_iter()
            .map(|row| DailySpend {
                date: row.date_start,
                spend: row
                    .spend
                    .as_deref()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0.0),
            })
            .collect())
    }
}
