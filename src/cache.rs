//! Short-lived result cache for full fetch cycles.
//!
//! Key = (ordered account-id list, window token). The cache is the only
//! shared mutable state in the pipeline: reads take the shared lock,
//! store/invalidate take the exclusive one.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::account::AccountResult;
use crate::insights::TimeWindow;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    accounts: String,
    window: String,
}

impl CacheKey {
    pub fn new(account_ids: &[String], window: &TimeWindow) -> Self {
        Self {
            accounts: account_ids.join(","),
            window: window.cache_token(),
        }
    }
}

struct CachedCycle {
    results: Vec<AccountResult>,
    fetched_at: Instant,
}

impl CachedCycle {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

pub struct ResultCache {
    entries: RwLock<HashMap<CacheKey, CachedCycle>>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Fresh cached results for the key, if any. Expired entries read as
    /// misses and are overwritten on the next store.
    pub fn get(&self, key: &CacheKey) -> Option<Vec<AccountResult>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|c| c.is_fresh(self.ttl))
            .map(|c| c.results.clone())
    }

    pub fn store(&self, key: CacheKey, results: Vec<AccountResult>) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key,
            CachedCycle {
                results,
                fetched_at: Instant::now(),
            },
        );
    }

    /// User-triggered refresh: drop everything so the next call re-fetches.
    pub fn invalidate_all(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::DatePreset;

    fn key(accounts: &[&str]) -> CacheKey {
        let ids: Vec<String> = accounts.iter().map(|s| s.to_string()).collect();
        CacheKey::new(&ids, &TimeWindow::Preset(DatePreset::Today))
    }

    fn failed(id: &str) -> AccountResult {
        AccountResult::Failed {
            account_id: id.into(),
            reason: "x".into(),
        }
    }

    #[test]
    fn test_store_then_get() {
        let cache = ResultCache::new(Duration::from_secs(300));
        cache.store(key(&["act_1"]), vec![failed("act_1")]);
        let hit = cache.get(&key(&["act_1"])).expect("fresh entry");
        assert_eq!(hit.len(), 1);
    }

    #[test]
    fn test_key_is_order_sensitive() {
        let cache = ResultCache::new(Duration::from_secs(300));
        cache.store(key(&["act_1", "act_2"]), vec![failed("act_1")]);
        assert!(cache.get(&key(&["act_2", "act_1"])).is_none());
    }

    #[test]
    fn test_different_window_misses() {
        let cache = ResultCache::new(Duration::from_secs(300));
        let ids = vec!["act_1".to_string()];
        cache.store(
            CacheKey::new(&ids, &TimeWindow::Preset(DatePreset::Today)),
            vec![failed("act_1")],
        );
        assert!(cache
            .get(&CacheKey::new(&ids, &TimeWindow::Preset(DatePreset::Yesterday)))
            .is_none());
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = ResultCache::new(Duration::ZERO);
        cache.store(key(&["act_1"]), vec![failed("act_1")]);
        assert!(cache.get(&key(&["act_1"])).is_none());
    }

    #[test]
    fn test_invalidate_all_clears() {
        let cache = ResultCache::new(Duration::from_secs(300));
        cache.store(key(&["act_1"]), vec![failed("act_1")]);
        cache.invalidate_all();
        assert!(cache.get(&key(&["act_1"])).is_none());
    }
}
