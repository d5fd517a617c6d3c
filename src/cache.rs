// Copyright 2026 Docsim Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Score memoization.
//!
//! The engine talks to a [`ScoreCache`] only, so the eviction strategy is a
//! deployment decision: [`UnboundedCache`] never evicts, [`LruCache`] keeps at
//! most `capacity` entries.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use moka::policy::EvictionPolicy;

use crate::config::CacheStrategy;
use crate::config::Config;
use crate::error::SimilarityError;
use crate::error::SimilarityResult;
use crate::model::Metric;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub left: String,
    pub right: String,
    pub metric: Metric,
}

impl CacheKey {
    pub fn new(left: impl Into<String>, right: impl Into<String>, metric: Metric) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            metric,
        }
    }
}

pub trait ScoreCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> SimilarityResult<Option<f64>>;

    fn put(&self, key: CacheKey, score: f64) -> SimilarityResult<()>;

    fn clear(&self) -> SimilarityResult<()>;

    fn len(&self) -> SimilarityResult<usize>;

    fn is_empty(&self) -> SimilarityResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Strategy name for logs and stats.
    fn name(&self) -> &'static str;
}

#[derive(Debug, Default)]
pub struct UnboundedCache {
    entries: Mutex<HashMap<CacheKey, f64>>,
}

impl UnboundedCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> SimilarityResult<MutexGuard<'_, HashMap<CacheKey, f64>>> {
        self.entries
            .lock()
            .map_err(|_| SimilarityError::Cache("score cache lock poisoned".to_string()))
    }
}

impl ScoreCache for UnboundedCache {
    fn get(&self, key: &CacheKey) -> SimilarityResult<Option<f64>> {
        Ok(self.entries()?.get(key).copied())
    }

    fn put(&self, key: CacheKey, score: f64) -> SimilarityResult<()> {
        self.entries()?.insert(key, score);
        Ok(())
    }

    fn clear(&self) -> SimilarityResult<()> {
        self.entries()?.clear();
        Ok(())
    }

    fn len(&self) -> SimilarityResult<usize> {
        Ok(self.entries()?.len())
    }

    fn name(&self) -> &'static str {
        "unbounded"
    }
}

pub struct LruCache {
    inner: moka::sync::Cache<CacheKey, f64>,
    capacity: u64,
}

impl LruCache {
    pub fn new(capacity: u64) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: moka::sync::Cache::builder()
                .max_capacity(capacity)
                .eviction_policy(EvictionPolicy::lru())
                .build(),
            capacity,
        }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}

impl ScoreCache for LruCache {
    fn get(&self, key: &CacheKey) -> SimilarityResult<Option<f64>> {
        Ok(self.inner.get(key))
    }

    fn put(&self, key: CacheKey, score: f64) -> SimilarityResult<()> {
        self.inner.insert(key, score);
        Ok(())
    }

    fn clear(&self) -> SimilarityResult<()> {
        // invalidate_all is lazy; drop entries one by one so clear is observable at once.
        for (key, _) in self.inner.iter() {
            self.inner.invalidate(key.as_ref());
        }
        self.inner.run_pending_tasks();
        Ok(())
    }

    fn len(&self) -> SimilarityResult<usize> {
        // Eviction is applied lazily; flush it so the count is exact.
        self.inner.run_pending_tasks();
        Ok(self.inner.entry_count() as usize)
    }

    fn name(&self) -> &'static str {
        "lru"
    }
}

pub fn build_cache(config: &Config) -> Arc<dyn ScoreCache> {
    match config.cache {
        CacheStrategy::Unbounded => Arc::new(UnboundedCache::new()),
        CacheStrategy::Lru => Arc::new(LruCache::new(config.cache_capacity)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(left: &str, metric: Metric) -> CacheKey {
        CacheKey::new(left, "other", metric)
    }

    #[test]
    fn unbounded_cache_get_put_clear() -> SimilarityResult<()> {
        let cache = UnboundedCache::new();
        assert!(cache.is_empty()?);
        cache.put(key("a", Metric::Cosine), 0.25)?;
        cache.put(key("a", Metric::Jaccard), 0.5)?;
        assert_eq!(cache.get(&key("a", Metric::Cosine))?, Some(0.25));
        assert_eq!(cache.get(&key("a", Metric::Semantic))?, None);
        assert_eq!(cache.len()?, 2);

        cache.clear()?;
        assert!(cache.is_empty()?);
        cache.clear()?;
        assert_eq!(cache.len()?, 0);
        Ok(())
    }

    #[test]
    fn keys_are_ordered_pairs() -> SimilarityResult<()> {
        let cache = UnboundedCache::new();
        cache.put(CacheKey::new("a", "b", Metric::Cosine), 0.1)?;
        assert_eq!(cache.get(&CacheKey::new("b", "a", Metric::Cosine))?, None);
        Ok(())
    }

    #[test]
    fn lru_cache_respects_capacity() -> SimilarityResult<()> {
        let cache = LruCache::new(3);
        for i in 0..10 {
            cache.put(key(&format!("doc-{i}"), Metric::Cosine), i as f64 / 10.0)?;
        }
        assert!(cache.len()? <= 3);
        assert_eq!(cache.capacity(), 3);

        cache.clear()?;
        assert_eq!(cache.len()?, 0);
        Ok(())
    }

    #[test]
    fn lru_cache_evicts_least_recently_used() -> SimilarityResult<()> {
        let cache = LruCache::new(2);
        cache.put(key("a", Metric::Cosine), 0.1)?;
        cache.put(key("b", Metric::Cosine), 0.2)?;
        assert_eq!(cache.get(&key("a", Metric::Cosine))?, Some(0.1));
        cache.put(key("c", Metric::Cosine), 0.3)?;

        assert_eq!(cache.len()?, 2);
        assert_eq!(cache.get(&key("a", Metric::Cosine))?, Some(0.1));
        assert_eq!(cache.get(&key("b", Metric::Cosine))?, None);
        assert_eq!(cache.get(&key("c", Metric::Cosine))?, Some(0.3));
        Ok(())
    }

    #[test]
    fn build_cache_follows_config() {
        let config = Config {
            cache: CacheStrategy::Lru,
            cache_capacity: 8,
            ..Default::default()
        };
        assert_eq!(build_cache(&config).name(), "lru");
        assert_eq!(build_cache(&Config::default()).name(), "unbounded");
    }
}
