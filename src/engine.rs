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

use std::cmp::Ordering;
use std::sync::Arc;

use sha2::Digest;
use sha2::Sha256;

use crate::cache::CacheKey;
use crate::cache::ScoreCache;
use crate::cache::UnboundedCache;
use crate::cache::build_cache;
use crate::config::CacheKeyMode;
use crate::config::Config;
use crate::error::SimilarityResult;
use crate::metrics;
use crate::model::ComparisonResult;
use crate::model::DocumentRecord;
use crate::model::Metric;
use crate::model::MetricOutcome;
use crate::model::RankedMatch;

pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Scores document pairs and memoizes the results.
///
/// Cached scores are keyed by the records' paths, or their file names when no
/// path is known (see [`CacheKeyMode`]), not their content: re-scoring a pair
/// whose content changed under the same names returns the cached value until
/// [`SimilarityEngine::clear_cache`].
#[derive(Clone)]
pub struct SimilarityEngine {
    cache: Arc<dyn ScoreCache>,
    key_mode: CacheKeyMode,
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        Self::new(Arc::new(UnboundedCache::new()))
    }
}

impl SimilarityEngine {
    pub fn new(cache: Arc<dyn ScoreCache>) -> Self {
        Self {
            cache,
            key_mode: CacheKeyMode::FileName,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(build_cache(config)).with_key_mode(config.cache_key)
    }

    pub fn with_key_mode(mut self, key_mode: CacheKeyMode) -> Self {
        self.key_mode = key_mode;
        self
    }

    pub fn cache(&self) -> &Arc<dyn ScoreCache> {
        &self.cache
    }

    pub fn score(
        &self,
        a: &DocumentRecord,
        b: &DocumentRecord,
        metric: Metric,
    ) -> SimilarityResult<f64> {
        let key = self.cache_key(a, b, metric);
        if let Some(score) = self.cache.get(&key)? {
            tracing::debug!(metric = %metric, left = %key.left, right = %key.right, "score cache hit");
            return Ok(score);
        }

        let score = metrics::compute(metric, a, b);
        tracing::debug!(metric = %metric, left = %key.left, right = %key.right, score, "score computed");
        self.cache.put(key, score)?;
        Ok(score)
    }

    /// Like [`SimilarityEngine::score`] with the metric given by name.
    pub fn score_named(
        &self,
        a: &DocumentRecord,
        b: &DocumentRecord,
        metric: &str,
    ) -> SimilarityResult<f64> {
        self.score(a, b, metric.parse()?)
    }

    /// Candidates scoring at least `threshold`, best first. Ties keep input order.
    pub fn rank<'a>(
        &self,
        target: &DocumentRecord,
        candidates: &'a [DocumentRecord],
        threshold: f64,
        metric: Metric,
    ) -> SimilarityResult<Vec<RankedMatch<'a>>> {
        let mut matches = Vec::new();
        for candidate in candidates {
            let score = self.score(target, candidate, metric)?;
            if score >= threshold {
                matches.push(RankedMatch {
                    document: candidate,
                    score,
                });
            }
        }
        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        Ok(matches)
    }

    /// Scores every metric. A metric that fails is recorded as failed and counts as zero.
    pub fn compare_all(&self, a: &DocumentRecord, b: &DocumentRecord) -> ComparisonResult {
        let outcome = |metric: Metric| match self.score(a, b, metric) {
            Ok(score) => MetricOutcome::Scored(score),
            Err(err) => {
                tracing::warn!(metric = %metric, error = %err, "error calculating similarity");
                MetricOutcome::Failed(err.to_string())
            }
        };

        let cosine = outcome(Metric::Cosine);
        let jaccard = outcome(Metric::Jaccard);
        let semantic = outcome(Metric::Semantic);
        let structural = outcome(Metric::Structural);
        let overall = Metric::Cosine.weight() * cosine.score()
            + Metric::Jaccard.weight() * jaccard.score()
            + Metric::Semantic.weight() * semantic.score()
            + Metric::Structural.weight() * structural.score();

        ComparisonResult {
            cosine,
            jaccard,
            semantic,
            structural,
            overall,
        }
    }

    pub fn clear_cache(&self) -> SimilarityResult<()> {
        self.cache.clear()?;
        tracing::info!(cache = self.cache.name(), "similarity cache cleared");
        Ok(())
    }

    pub fn cache_len(&self) -> SimilarityResult<usize> {
        self.cache.len()
    }

    fn cache_key(&self, a: &DocumentRecord, b: &DocumentRecord, metric: Metric) -> CacheKey {
        CacheKey::new(self.doc_key(a), self.doc_key(b), metric)
    }

    fn doc_key(&self, doc: &DocumentRecord) -> String {
        match self.key_mode {
            CacheKeyMode::FileName => doc.display_name().to_string(),
            CacheKeyMode::ContentHash => {
                format!("{}#{}", doc.display_name(), sha256_hex(doc.content.as_bytes()))
            }
        }
    }
}

fn sha256_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}
