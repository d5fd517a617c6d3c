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

//! Pure scoring functions. Every score lies in `[0, 1]`.

use std::collections::BTreeSet;

use crate::model::DocumentRecord;
use crate::model::Metric;

const FORMAT_MATCH_SCORE: f64 = 1.0;
const FORMAT_MISMATCH_SCORE: f64 = 0.5;

pub fn compute(metric: Metric, a: &DocumentRecord, b: &DocumentRecord) -> f64 {
    match metric {
        Metric::Cosine => cosine(a, b),
        Metric::Jaccard => jaccard(a, b),
        Metric::Semantic => semantic(a, b),
        Metric::Structural => structural(a, b),
    }
}

/// Distinct lowercased whitespace-separated tokens.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Cosine of the binary incidence vectors over the union vocabulary.
pub fn cosine(a: &DocumentRecord, b: &DocumentRecord) -> f64 {
    let words_a = tokenize(&a.content);
    let words_b = tokenize(&b.content);
    let vocabulary: BTreeSet<&String> = words_a.union(&words_b).collect();
    if vocabulary.is_empty() {
        return 0.0;
    }

    let vec_a: Vec<f64> = vocabulary
        .iter()
        .map(|word| if words_a.contains(*word) { 1.0 } else { 0.0 })
        .collect();
    let vec_b: Vec<f64> = vocabulary
        .iter()
        .map(|word| if words_b.contains(*word) { 1.0 } else { 0.0 })
        .collect();

    let mut dot_product = 0.0;
    let mut magnitude_a = 0.0;
    let mut magnitude_b = 0.0;
    for (x, y) in vec_a.iter().zip(vec_b.iter()) {
        dot_product += x * y;
        magnitude_a += x * x;
        magnitude_b += y * y;
    }

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }
    // sqrt of the product keeps self-similarity at exactly 1.0.
    dot_product / (magnitude_a * magnitude_b).sqrt()
}

pub fn jaccard(a: &DocumentRecord, b: &DocumentRecord) -> f64 {
    let words_a = tokenize(&a.content);
    let words_b = tokenize(&b.content);
    let union = words_a.union(&words_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = words_a.intersection(&words_b).count();
    intersection as f64 / union as f64
}

/// Heuristic stand-in for an embedding measure: mean of cosine and structural.
pub fn semantic(a: &DocumentRecord, b: &DocumentRecord) -> f64 {
    (cosine(a, b) + structural(a, b)) / 2.0
}

pub fn structural(a: &DocumentRecord, b: &DocumentRecord) -> f64 {
    (format_score(a, b) + size_score(a, b)) / 2.0
}

pub fn format_score(a: &DocumentRecord, b: &DocumentRecord) -> f64 {
    if a.format == b.format {
        FORMAT_MATCH_SCORE
    } else {
        FORMAT_MISMATCH_SCORE
    }
}

pub fn size_score(a: &DocumentRecord, b: &DocumentRecord) -> f64 {
    match (a.file_size, b.file_size) {
        (0, 0) => 1.0,
        (0, _) | (_, 0) => 0.0,
        (x, y) => x.min(y) as f64 / x.max(y) as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str, format: &str, size: u64) -> DocumentRecord {
        DocumentRecord::new("doc", content, format, size)
    }

    #[test]
    fn tokenize_lowercases_and_dedups() {
        let tokens = tokenize("Cloud  cloud\tSECURITY\nservices");
        let expected: Vec<&str> = vec!["cloud", "security", "services"];
        assert_eq!(tokens.iter().map(String::as_str).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn cosine_is_one_for_identical_content() {
        let a = doc("Cloud security services for the public sector", ".txt", 10);
        assert_eq!(cosine(&a, &a), 1.0);
        assert_eq!(jaccard(&a, &a), 1.0);
    }

    #[test]
    fn cosine_partial_overlap() {
        let a = doc("alpha beta", "", 0);
        let b = doc("beta gamma delta", "", 0);
        let expected = 1.0 / (2.0f64 * 3.0).sqrt();
        assert!((cosine(&a, &b) - expected).abs() < 1e-12);
        assert!((jaccard(&a, &b) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn empty_content_scores_zero() {
        let a = doc("", ".txt", 0);
        let b = doc("   ", ".txt", 0);
        assert_eq!(cosine(&a, &b), 0.0);
        assert_eq!(jaccard(&a, &b), 0.0);

        let c = doc("words here", ".txt", 0);
        assert_eq!(cosine(&a, &c), 0.0);
        assert_eq!(jaccard(&a, &c), 0.0);
    }

    #[test]
    fn disjoint_content_scores_zero() {
        let a = doc("cloud security services", "", 0);
        let b = doc("totally unrelated text about cooking", "", 0);
        assert_eq!(cosine(&a, &b), 0.0);
        assert_eq!(jaccard(&a, &b), 0.0);
    }

    #[test]
    fn size_score_boundaries() {
        assert_eq!(size_score(&doc("", "", 0), &doc("", "", 0)), 1.0);
        assert_eq!(size_score(&doc("", "", 0), &doc("", "", 10)), 0.0);
        assert_eq!(size_score(&doc("", "", 10), &doc("", "", 0)), 0.0);
        assert_eq!(size_score(&doc("", "", 10), &doc("", "", 20)), 0.5);
    }

    #[test]
    fn structural_blends_format_and_size() {
        let a = doc("", "pdf", 10);
        let b = doc("", "pdf", 20);
        assert_eq!(format_score(&a, &b), 1.0);
        assert_eq!(structural(&a, &b), 0.75);

        let c = doc("", "docx", 20);
        assert_eq!(format_score(&a, &c), 0.5);
        assert_eq!(structural(&a, &c), 0.5);
    }

    #[test]
    fn semantic_is_mean_of_cosine_and_structural() {
        let a = doc("alpha beta", ".md", 100);
        let b = doc("beta gamma", ".txt", 50);
        let expected = (cosine(&a, &b) + structural(&a, &b)) / 2.0;
        assert_eq!(semantic(&a, &b), expected);
    }

    #[test]
    fn symmetric_and_bounded() {
        let docs = [
            doc("", "", 0),
            doc("alpha", ".txt", 1),
            doc("Alpha beta gamma", ".md", 300),
            doc("gamma delta epsilon zeta", ".pdf", 4096),
        ];
        for a in &docs {
            for b in &docs {
                for metric in Metric::ALL {
                    let score = compute(metric, a, b);
                    assert!((0.0..=1.0).contains(&score), "{metric} out of range: {score}");
                    if metric != Metric::Semantic {
                        assert_eq!(score, compute(metric, b, a), "{metric} not symmetric");
                    }
                }
            }
        }
    }
}
