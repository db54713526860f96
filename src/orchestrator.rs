//! Multi-account fetch orchestration.
//!
//! Runs per-account aggregation with a bounded degree of parallelism and
//! short-circuits through the TTL result cache. Completion order is
//! irrelevant; returned results are re-associated with the input order.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};

use crate::account::{fetch_account, AccountResult};
use crate::cache::{CacheKey, ResultCache};
use crate::health::Thresholds;
use crate::insights::{InsightsClient, TimeWindow};
use crate::logging::{json_log, obj, v_num, v_str};

pub struct FetchOrchestrator {
    client: Arc<dyn InsightsClient>,
    cache: ResultCache,
    pool_size: usize,
    thresholds: Thresholds,
    include_trend: bool,
}

impl FetchOrchestrator {
    pub fn new(
        client: Arc<dyn InsightsClient>,
        cache_ttl: Duration,
        pool_size: usize,
        include_trend: bool,
    ) -> Self {
        Self {
            client,
            cache: ResultCache::new(cache_ttl),
            pool_size: pool_size.max(1),
            thresholds: Thresholds::default(),
            include_trend,
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Fetch every configured account for the window. A cache hit issues
    /// zero upstream calls; a miss fans out at most `pool_size` concurrent
    /// account fetches and caches the full collection.
    pub async fn fetch_all(&self, account_ids: &[String], window: &TimeWindow) -> Vec<AccountResult> {
        let key = CacheKey::new(account_ids, window);
        if let Some(cached) = self.cache.get(&key) {
            json_log(
                "orchestrator",
                "cache_hit",
                obj(&[
                    ("accounts", v_num(account_ids.len() as f64)),
                    ("window", v_str(&window.cache_token())),
                ]),
            );
            return cached;
        }

        json_log(
            "orchestrator",
            "fetch_cycle",
            obj(&[
                ("accounts", v_num(account_ids.len() as f64)),
                ("window", v_str(&window.cache_token())),
                ("pool_size", v_num(self.pool_size as f64)),
            ]),
        );

        let client = self.client.as_ref();
        let mut indexed: Vec<(usize, AccountResult)> = stream::iter(
            account_ids.iter().enumerate().map(|(idx, id)| async move {
                (
                    idx,
                    fetch_account(client, id, window, &self.thresholds, self.include_trend).await,
                )
            }),
        )
        .buffer_unordered(self.pool_size)
        .collect()
        .await;

        indexed.sort_by_key(|(idx, _)| *idx);
        let results: Vec<AccountResult> = indexed.into_iter().map(|(_, r)| r).collect();

        let failures = results
            .iter()
            .filter(|r| matches!(r, AccountResult::Failed { .. }))
            .count();
        if failures > 0 {
            json_log(
                "orchestrator",
                "partial_failure",
                obj(&[
                    ("failed", v_num(failures as f64)),
                    ("total", v_num(results.len() as f64)),
                ]),
            );
        }

        self.cache.store(key, results.clone());
        results
    }

    /// User-triggered refresh: the next `fetch_all` re-fetches everything.
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
        json_log("orchestrator", "cache_invalidated", obj(&[]));
    }
}
