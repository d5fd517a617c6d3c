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

use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

use crate::engine::DEFAULT_THRESHOLD;
use crate::model::Metric;

pub const CONFIG_FILE_NAME: &str = "docsim.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStrategy {
    Unbounded,
    Lru,
}

/// What identifies a document inside a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKeyMode {
    /// The record's path, or its `file_name` when it has none. Content changes
    /// under the same name are not noticed.
    FileName,
    /// The same name plus a SHA-256 of the content.
    ContentHash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cache: CacheStrategy,
    pub cache_capacity: u64,
    pub cache_key: CacheKeyMode,
    pub threshold: f64,
    pub metric: Metric,
    pub supported_formats: Vec<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheStrategy::Unbounded,
            cache_capacity: 10_000,
            cache_key: CacheKeyMode::FileName,
            threshold: DEFAULT_THRESHOLD,
            metric: Metric::Cosine,
            supported_formats: vec![
                ".pdf".to_string(),
                ".docx".to_string(),
                ".txt".to_string(),
                ".md".to_string(),
            ],
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            anyhow::bail!(
                "config threshold {} must be within [0, 1]",
                self.threshold
            );
        }
        if self.cache == CacheStrategy::Lru && self.cache_capacity == 0 {
            anyhow::bail!("config cache_capacity must be greater than 0 for the lru cache");
        }
        Ok(())
    }

    pub fn is_supported_format(&self, format: &str) -> bool {
        self.supported_formats
            .iter()
            .any(|f| f.eq_ignore_ascii_case(format))
    }
}

fn config_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return Some(PathBuf::from(appdata));
        }
        if let Ok(profile) = std::env::var("USERPROFILE") {
            return Some(PathBuf::from(profile).join("AppData").join("Roaming"));
        }
        return None;
    }

    if cfg!(target_os = "macos") {
        let home = std::env::var("HOME").ok()?;
        return Some(
            PathBuf::from(home)
                .join("Library")
                .join("Application Support"),
        );
    }

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg));
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config"))
}

pub fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("docsim").join(CONFIG_FILE_NAME))
}

/// Loads `path` when given, otherwise the global config. A missing global file means defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return read_config(path);
    }
    let Some(path) = global_config_path() else {
        return Ok(Config::default());
    };
    if !path.exists() {
        return Ok(Config::default());
    }
    read_config(&path)
}

pub fn read_config(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config: Config =
        toml::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let text = toml::to_string_pretty(config).context("serialize config")?;
    std::fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
