// src/config.rs
//
// Indexer configuration
//
// Values come from an optional JSON file (path in TMDB_INDEX_CONFIG) and are
// then overridden by individual TMDB_INDEX_* environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AppError, AppResult};

pub const ENV_CONFIG_FILE: &str = "TMDB_INDEX_CONFIG";
pub const ENV_DATABASE_URL: &str = "TMDB_INDEX_DATABASE_URL";
pub const ENV_AUTH_TOKEN: &str = "TMDB_INDEX_AUTH_TOKEN";
pub const ENV_SOURCE_PATH: &str = "TMDB_INDEX_SOURCE_PATH";
pub const ENV_OUTPUT_PATH: &str = "TMDB_INDEX_OUTPUT_PATH";
pub const ENV_PARTITION_PAGE_SIZE: &str = "TMDB_INDEX_PARTITION_PAGE_SIZE";
pub const ENV_ENTRY_PAGE_SIZE: &str = "TMDB_INDEX_ENTRY_PAGE_SIZE";
pub const ENV_TIMEOUT_SECS: &str = "TMDB_INDEX_TIMEOUT_SECS";
pub const ENV_STOP_ON_SHORT_PAGE: &str = "TMDB_INDEX_STOP_ON_SHORT_PAGE";
pub const ENV_RESUME_AFTER: &str = "TMDB_INDEX_RESUME_AFTER";
pub const ENV_DRY_RUN: &str = "TMDB_INDEX_DRY_RUN";

/// Settings for one indexing run.
///
/// The page and chunk sizes are the only memory knobs: peak usage is one
/// page of raw entries plus one partition's index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Base URL of the realtime database, without a trailing `.json`.
    pub database_url: String,

    /// Database secret or ID token. Never logged.
    #[serde(skip_serializing)]
    pub auth_token: Option<String>,

    /// Node holding one child per partition.
    pub source_path: String,

    /// Child of each partition holding its entry list.
    pub content_key: String,

    /// Node the index is written under, one child per partition name.
    pub index_path: String,

    pub partition_page_size: usize,
    pub entry_page_size: usize,

    /// Indexes with more records than this are written in chunks.
    pub chunk_threshold: usize,
    pub chunk_size: usize,

    pub request_timeout_secs: u64,

    /// Treat a page shorter than requested as the last one. Saves one
    /// round trip per scan but trusts the store never to cut pages short.
    pub stop_on_short_page: bool,

    /// Resume the partition walk strictly after this raw partition key.
    pub resume_after: Option<String>,

    /// Scan and aggregate without writing anything back.
    pub dry_run: bool,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            auth_token: None,
            source_path: "documents/Content/latest".to_string(),
            content_key: "content".to_string(),
            index_path: "tmdb_index".to_string(),
            partition_page_size: 3,
            entry_page_size: 100,
            chunk_threshold: 1000,
            chunk_size: 500,
            request_timeout_secs: 30,
            stop_on_short_page: true,
            resume_after: None,
            dry_run: false,
        }
    }
}

impl IndexerConfig {
    /// Load from the process environment: optional file first, then
    /// variable overrides, then validation.
    pub fn load() -> AppResult<Self> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// Same as `load`, reading variables through `lookup`.
    pub fn load_with<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match lookup(ENV_CONFIG_FILE) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.apply_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            AppError::Config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    fn apply_overrides<F>(mut self, lookup: &F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.database_url = url;
        }
        if let Some(token) = lookup(ENV_AUTH_TOKEN) {
            self.auth_token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(path) = lookup(ENV_SOURCE_PATH) {
            self.source_path = path;
        }
        if let Some(path) = lookup(ENV_OUTPUT_PATH) {
            self.index_path = path;
        }
        if let Some(size) = lookup(ENV_PARTITION_PAGE_SIZE) {
            self.partition_page_size = parse_var(ENV_PARTITION_PAGE_SIZE, &size)?;
        }
        if let Some(size) = lookup(ENV_ENTRY_PAGE_SIZE) {
            self.entry_page_size = parse_var(ENV_ENTRY_PAGE_SIZE, &size)?;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = parse_var(ENV_TIMEOUT_SECS, &secs)?;
        }
        if let Some(flag) = lookup(ENV_STOP_ON_SHORT_PAGE) {
            self.stop_on_short_page = parse_flag(ENV_STOP_ON_SHORT_PAGE, &flag)?;
        }
        if let Some(key) = lookup(ENV_RESUME_AFTER) {
            self.resume_after = Some(key).filter(|k| !k.is_empty());
        }
        if let Some(flag) = lookup(ENV_DRY_RUN) {
            self.dry_run = parse_flag(ENV_DRY_RUN, &flag)?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.database_url.trim().is_empty() {
            return Err(AppError::Config(format!(
                "Database URL is required (set {})",
                ENV_DATABASE_URL
            )));
        }
        for (name, value) in [
            ("partition_page_size", self.partition_page_size),
            ("entry_page_size", self.entry_page_size),
            ("chunk_size", self.chunk_size),
        ] {
            if value == 0 {
                return Err(AppError::Config(format!("{} must be at least 1", name)));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} has invalid value {:?}", name, raw)))
}

fn parse_flag(name: &str, raw: &str) -> AppResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Config(format!(
            "{} has invalid value {:?}",
            name, raw
        ))),
    }
}
