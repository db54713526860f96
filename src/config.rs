//! Environment-sourced configuration.
//!
//! Credentials and the account list are mandatory; everything else has a
//! default tuned for a small dashboard polling the Graph insights API.

use anyhow::{bail, Result};

#[derive(Clone, Debug)]
pub struct Config {
    pub app_id: String,
    pub app_secret: Option<String>,
    pub access_token: String,
    /// Account ids as configured, e.g. "act_123,act_456". Order is preserved.
    pub account_ids: Vec<String>,
    pub graph_base: String,
    pub api_version: String,
    /// Max concurrent in-flight account fetches.
    pub pool_size: usize,
    /// Result cache lifetime in seconds.
    pub cache_ttl_secs: u64,
    /// Per-request HTTP timeout in seconds.
    pub http_timeout_secs: u64,
    /// Dashboard poll interval in seconds (TV mode).
    pub refresh_secs: u64,
    /// Fetch the account-level daily spend series alongside campaign rows.
    pub include_trend: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let app_id = std::env::var("FB_APP_ID").unwrap_or_default();
        let access_token = std::env::var("FB_ACCESS_TOKEN").unwrap_or_default();
        let ids_string = std::env::var("FB_ACCOUNT_IDS").unwrap_or_default();

        if app_id.is_empty() || access_token.is_empty() || ids_string.is_empty() {
            bail!("missing credentials: FB_APP_ID, FB_ACCESS_TOKEN and FB_ACCOUNT_IDS are required");
        }

        let account_ids: Vec<String> = ids_string
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if account_ids.is_empty() {
            bail!("FB_ACCOUNT_IDS contains no account ids");
        }

        Ok(Self {
            app_id,
            app_secret: std::env::var("FB_APP_SECRET").ok(),
            access_token,
            account_ids,
            graph_base: std::env::var("GRAPH_BASE")
                .unwrap_or_else(|_| "https://graph.facebook.com".to_string()),
            api_version: std::env::var("GRAPH_API_VERSION").unwrap_or_else(|_| "v19.0".to_string()),
            pool_size: std::env::var("POOL_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(5),
            cache_ttl_secs: std::env::var("CACHE_TTL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(300),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(10),
            refresh_secs: std::env::var("REFRESH_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(300),
            include_trend: std::env::var("INCLUDE_TREND")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(true),
        })
    }
}
