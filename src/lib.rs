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

//! Multi-metric similarity scoring for proposals and other business documents.
//!
//! The [`engine::SimilarityEngine`] compares two [`model::DocumentRecord`]s
//! under cosine, Jaccard, structural and a blended "semantic" metric, memoizes
//! the scores in an injected [`cache::ScoreCache`], and ranks candidate sets
//! against a target.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod model;

pub use cache::ScoreCache;
pub use engine::SimilarityEngine;
pub use error::SimilarityError;
pub use model::ComparisonResult;
pub use model::DocumentRecord;
pub use model::Metric;
