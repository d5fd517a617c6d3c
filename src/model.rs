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

//! Shared domain types used by the engine, the loader and the CLI.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use serde_json::json;

use crate::error::SimilarityError;

/// A document as produced by ingestion. The engine only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentRecord {
    pub file_name: String,
    pub content: String,
    pub format: String,
    pub file_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl DocumentRecord {
    pub fn new(
        file_name: impl Into<String>,
        content: impl Into<String>,
        format: impl Into<String>,
        file_size: u64,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            format: format.into(),
            file_size,
            file_path: None,
        }
    }

    /// Path when known, otherwise the bare file name.
    pub fn display_name(&self) -> &str {
        self.file_path.as_deref().unwrap_or(&self.file_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Metric {
    Cosine,
    Jaccard,
    Semantic,
    Structural,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Cosine,
        Metric::Jaccard,
        Metric::Semantic,
        Metric::Structural,
    ];

    pub fn as_label(self) -> &'static str {
        match self {
            Metric::Cosine => "cosine",
            Metric::Jaccard => "jaccard",
            Metric::Semantic => "semantic",
            Metric::Structural => "structural",
        }
    }

    /// Weight of this metric in the overall comparison score. Weights sum to 1.0.
    pub fn weight(self) -> f64 {
        match self {
            Metric::Cosine => 0.3,
            Metric::Jaccard => 0.2,
            Metric::Semantic => 0.4,
            Metric::Structural => 0.1,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_label())
    }
}

impl FromStr for Metric {
    type Err = SimilarityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cosine" => Ok(Metric::Cosine),
            "jaccard" => Ok(Metric::Jaccard),
            "semantic" => Ok(Metric::Semantic),
            "structural" => Ok(Metric::Structural),
            _ => Err(SimilarityError::InvalidMetric(s.to_string())),
        }
    }
}

impl TryFrom<String> for Metric {
    type Error = SimilarityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Result of one metric inside a full comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricOutcome {
    Scored(f64),
    Failed(String),
}

impl MetricOutcome {
    /// Failed metrics count as zero.
    pub fn score(&self) -> f64 {
        match self {
            MetricOutcome::Scored(score) => *score,
            MetricOutcome::Failed(_) => 0.0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, MetricOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub cosine: MetricOutcome,
    pub jaccard: MetricOutcome,
    pub semantic: MetricOutcome,
    pub structural: MetricOutcome,
    pub overall: f64,
}

impl ComparisonResult {
    pub fn outcome(&self, metric: Metric) -> &MetricOutcome {
        match metric {
            Metric::Cosine => &self.cosine,
            Metric::Jaccard => &self.jaccard,
            Metric::Semantic => &self.semantic,
            Metric::Structural => &self.structural,
        }
    }

    pub fn score(&self, metric: Metric) -> f64 {
        self.outcome(metric).score()
    }

    /// Looks up a score by its result key, including `overall`.
    pub fn get(&self, key: &str) -> Option<f64> {
        if key == "overall" {
            return Some(self.overall);
        }
        key.parse::<Metric>().ok().map(|metric| self.score(metric))
    }

    pub fn failed(&self) -> Vec<Metric> {
        Metric::ALL
            .into_iter()
            .filter(|metric| self.outcome(*metric).is_failed())
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let failed: Vec<serde_json::Value> = Metric::ALL
            .into_iter()
            .filter_map(|metric| match self.outcome(metric) {
                MetricOutcome::Failed(reason) => Some(json!({
                    "metric": metric.as_label(),
                    "reason": reason,
                })),
                MetricOutcome::Scored(_) => None,
            })
            .collect();
        let mut value = json!({
            "cosine": self.cosine.score(),
            "jaccard": self.jaccard.score(),
            "semantic": self.semantic.score(),
            "structural": self.structural.score(),
            "overall": self.overall,
        });
        if !failed.is_empty()
            && let Some(obj) = value.as_object_mut()
        {
            obj.insert("failed".into(), serde_json::Value::Array(failed));
        }
        value
    }
}

/// A candidate that passed the ranking threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMatch<'a> {
    pub document: &'a DocumentRecord,
    pub score: f64,
}

impl RankedMatch<'_> {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "file_name": self.document.file_name,
            "path": self.document.display_name(),
            "format": self.document.format,
            "file_size": self.document.file_size,
            "score": self.score,
        })
    }
}
