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

//! Turns files on disk into [`DocumentRecord`]s.

use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use walkdir::WalkDir;

use crate::config::Config;
use crate::model::DocumentRecord;

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub glob: Option<String>,
    pub ignore: Vec<String>,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub documents: Vec<DocumentRecord>,
    pub warnings: Vec<String>,
}

/// Lowercased extension with its leading dot, or an empty string.
pub fn document_format(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

pub fn load_document(path: &Path, config: &Config) -> Result<DocumentRecord> {
    let mut warnings = Vec::new();
    let doc = load_document_inner(path, config, &mut warnings)?;
    for warn in warnings {
        tracing::warn!("{warn}");
    }
    Ok(doc)
}

fn load_document_inner(
    path: &Path,
    config: &Config,
    warnings: &mut Vec<String>,
) -> Result<DocumentRecord> {
    if !path.exists() {
        anyhow::bail!("document not found: {}", path.display());
    }
    let format = document_format(path);
    if !config.is_supported_format(&format) {
        anyhow::bail!(
            "unsupported format '{}' for {}; supported: {}",
            format,
            path.display(),
            config.supported_formats.join(", ")
        );
    }

    let metadata =
        std::fs::metadata(path).with_context(|| format!("metadata {}", path.display()))?;
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let content = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(_) => {
            warnings.push(format!(
                "no text extracted from {} ({format}); scoring on structure only",
                path.display()
            ));
            String::new()
        }
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    tracing::debug!(path = %path.display(), format = %format, size = metadata.len(), "loaded document");
    Ok(DocumentRecord {
        file_name,
        content,
        format,
        file_size: metadata.len(),
        file_path: Some(path.to_string_lossy().into_owned()),
    })
}

/// Loads every matching file under `paths`. Per-file failures become warnings.
pub fn load_documents(
    paths: Vec<PathBuf>,
    opts: &LoadOptions,
    config: &Config,
) -> Result<LoadReport> {
    let include_set = build_globset(opts.glob.as_deref())?;
    let ignore_set = build_ignore_set(&opts.ignore)?;

    let mut report = LoadReport::default();
    for path in resolve_paths(paths) {
        if path.is_dir() {
            for entry in WalkDir::new(&path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_file() {
                    load_file(entry.path(), config, &include_set, &ignore_set, &mut report);
                }
            }
        } else {
            load_file(&path, config, &include_set, &ignore_set, &mut report);
        }
    }

    tracing::debug!(
        documents = report.documents.len(),
        warnings = report.warnings.len(),
        "loaded candidate documents"
    );
    Ok(report)
}

fn resolve_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    }
}

fn build_globset(pattern: Option<&str>) -> Result<Option<GlobSet>> {
    if let Some(pat) = pattern {
        let mut builder = GlobSetBuilder::new();
        builder.add(Glob::new(pat).with_context(|| format!("invalid glob {pat}"))?);
        let set = builder.build()?;
        Ok(Some(set))
    } else {
        Ok(None)
    }
}

fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat).with_context(|| format!("invalid glob {pat}"))?);
    }
    Ok(builder.build()?)
}

fn load_file(
    path: &Path,
    config: &Config,
    include_set: &Option<GlobSet>,
    ignore_set: &GlobSet,
    report: &mut LoadReport,
) {
    if !ignore_set.is_empty() && ignore_set.is_match(path) {
        return;
    }
    if let Some(set) = include_set
        && !set.is_match(path)
    {
        return;
    }

    match load_document_inner(path, config, &mut report.warnings) {
        Ok(doc) => report.documents.push(doc),
        Err(err) => report
            .warnings
            .push(format!("skip {}: {err}", path.display())),
    }
}
