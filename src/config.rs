use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dispatch::{DispatchOptions, default_workers};
use crate::error::{FitError, Result};
use crate::import::ColumnMap;
use crate::search::{AntiDominance, DEFAULT_K, SearchOptions, SourceOversizeCap};

/// File name of the per-project configuration.
pub const PROJECT_CONFIG_FILE: &str = "fitpick.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub columns: ColumnMap,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("FITPICK_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            match Self::load_patch(&path)? {
                Some(patch) => config.merge_patch(patch),
                None => {
                    return Err(FitError::NotFound(format!(
                        "config file {}",
                        path.display()
                    )));
                }
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(project_root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Path of the per-user configuration, if the platform has a config dir.
    #[must_use]
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fitpick/config.toml"))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        match Self::global_path() {
            Some(path) => Self::load_patch(&path),
            None => Ok(None),
        }
    }

    fn load_project(project_root: &Path) -> Result<Option<ConfigPatch>> {
        let path = project_root.join(PROJECT_CONFIG_FILE);
        Self::load_patch(&path)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| FitError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| FitError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.columns {
            merge_columns(&mut self.columns, patch);
        }
        if let Some(patch) = patch.dispatch {
            self.dispatch.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = parse_var::<usize>(&lookup, "FITPICK_K")? {
            self.search.k = value;
        }
        if let Some(value) = lookup("FITPICK_MUST_INCLUDE") {
            let value = value.trim();
            if !value.is_empty() {
                self.search.must_include = Some(value.to_string());
            }
        }
        if let Some(values) = list_var(&lookup, "FITPICK_ACCEPTED_SOURCES") {
            self.search.accepted_sources = merge_unique(values, &self.search.accepted_sources);
        }
        if let Some(value) = parse_var::<f64>(&lookup, "FITPICK_MIN_SIZE")? {
            self.search.min_size = Some(value);
        }
        if let Some(value) = parse_var::<f64>(&lookup, "FITPICK_MAX_SIZE")? {
            self.search.max_size = Some(value);
        }

        if let Some(value) = parse_var::<usize>(&lookup, "FITPICK_WORKERS")? {
            self.dispatch.workers = value;
        }
        if let Some(value) = parse_var::<usize>(&lookup, "FITPICK_QUEUE_CAPACITY")? {
            self.dispatch.queue_capacity = value;
        }
        if let Some(value) = parse_var::<u64>(&lookup, "FITPICK_TIMEOUT_MS")? {
            self.dispatch.timeout_ms = Some(value);
        }
        Ok(())
    }

    /// Look up one value by dotted path, e.g. `search.k`.
    pub fn value_at(&self, key: &str) -> Result<serde_json::Value> {
        let mut current = serde_json::to_value(self)?;
        for part in key.split('.') {
            current = current
                .get(part)
                .cloned()
                .ok_or_else(|| FitError::NotFound(format!("config key {key}")))?;
        }
        Ok(current)
    }
}

/// Defaults applied to every search unless a flag overrides them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_include: Option<String>,
    #[serde(default)]
    pub accepted_sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anti_dominance: Option<AntiDominance>,
    #[serde(default)]
    pub oversize_caps: Vec<SourceOversizeCap>,
}

const fn default_k() -> usize {
    DEFAULT_K
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            must_include: None,
            accepted_sources: Vec::new(),
            min_size: None,
            max_size: None,
            anti_dominance: None,
            oversize_caps: Vec::new(),
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(value) = patch.k {
            self.k = value;
        }
        if let Some(value) = patch.must_include {
            self.must_include = Some(value);
        }
        if let Some(value) = patch.accepted_sources {
            self.accepted_sources = value;
        }
        if let Some(value) = patch.min_size {
            self.min_size = Some(value);
        }
        if let Some(value) = patch.max_size {
            self.max_size = Some(value);
        }
        if let Some(value) = patch.anti_dominance {
            self.anti_dominance = Some(value);
        }
        if let Some(value) = patch.oversize_caps {
            self.oversize_caps = value;
        }
    }

    /// Search options carried by this configuration.
    #[must_use]
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            min_size: self.min_size,
            max_size: self.max_size,
            accepted_sources: self.accepted_sources.clone(),
            anti_dominance: self.anti_dominance.clone(),
            oversize_caps: self.oversize_caps.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

const fn default_queue_capacity() -> usize {
    64
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            timeout_ms: None,
        }
    }
}

impl DispatchConfig {
    fn merge(&mut self, patch: DispatchPatch) {
        if let Some(value) = patch.workers {
            self.workers = value;
        }
        if let Some(value) = patch.queue_capacity {
            self.queue_capacity = value;
        }
        if let Some(value) = patch.timeout_ms {
            self.timeout_ms = Some(value);
        }
    }

    #[must_use]
    pub fn options(&self) -> DispatchOptions {
        DispatchOptions {
            workers: self.workers,
            queue_capacity: self.queue_capacity,
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }
}

fn merge_columns(columns: &mut ColumnMap, patch: ColumnsPatch) {
    if let Some(value) = patch.size_keys {
        columns.size_keys = value;
    }
    if let Some(value) = patch.type_keys {
        columns.type_keys = value;
    }
    if let Some(value) = patch.size_index {
        columns.size_index = value;
    }
    if let Some(value) = patch.type_index {
        columns.type_index = value;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub search: Option<SearchPatch>,
    pub columns: Option<ColumnsPatch>,
    pub dispatch: Option<DispatchPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchPatch {
    pub k: Option<usize>,
    pub must_include: Option<String>,
    pub accepted_sources: Option<Vec<String>>,
    pub min_size: Option<f64>,
    pub max_size: Option<f64>,
    pub anti_dominance: Option<AntiDominance>,
    pub oversize_caps: Option<Vec<SourceOversizeCap>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ColumnsPatch {
    pub size_keys: Option<Vec<String>>,
    pub type_keys: Option<Vec<String>>,
    pub size_index: Option<usize>,
    pub type_index: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DispatchPatch {
    pub workers: Option<usize>,
    pub queue_capacity: Option<usize>,
    pub timeout_ms: Option<u64>,
}

fn merge_unique(values: Vec<String>, existing: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values.into_iter().chain(existing.iter().cloned()) {
        if seen.insert(value.clone()) {
            out.push(value);
        }
    }
    out
}

fn parse_var<T>(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse::<T>().map(Some).map_err(|err| {
            FitError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        None => Ok(None),
    }
}

fn list_var(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Option<Vec<String>> {
    lookup(key).map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(ToString::to_string)
            .collect()
    })
}
