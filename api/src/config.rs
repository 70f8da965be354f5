//! Server configuration, read from an optional TOML file

use anyhow::{Context, Result};
use riwaya_lib::{CorpusPaths, LoadOptions, StateOptions, DEFAULT_GRADE};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub corpus: CorpusConfig,
    pub storage: StorageConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
    /// Per-IP rate limiting; disabled when absent
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            body_limit_bytes: default_body_limit(),
            rate_limit: None,
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}
fn default_body_limit() -> usize {
    64 * 1024
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    /// Seconds between replenished requests
    #[serde(default = "default_per_second")]
    pub per_second: u64,
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,
}

fn default_per_second() -> u64 {
    1
}
fn default_burst_size() -> u32 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    #[serde(default = "default_search_paths")]
    pub search_paths: Vec<PathBuf>,
    /// Grade given to hadiths whose source has none
    #[serde(default = "default_grade")]
    pub default_grade: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            search_paths: default_search_paths(),
            default_grade: default_grade(),
        }
    }
}

fn default_search_paths() -> Vec<PathBuf> {
    CorpusPaths::default().roots().to_vec()
}
fn default_grade() -> String {
    DEFAULT_GRADE.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// SQLite file for bookmarks and preferences; in-memory when absent
    #[serde(default)]
    pub settings_db: Option<PathBuf>,
    #[serde(default = "default_visitors_file")]
    pub visitors_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_db: None,
            visitors_file: default_visitors_file(),
        }
    }
}

fn default_visitors_file() -> PathBuf {
    PathBuf::from("server/visitors.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_capacity() -> usize {
    riwaya_lib::cache::DEFAULT_CACHE_CAPACITY
}

impl Config {
    pub fn state_options(&self) -> StateOptions {
        StateOptions {
            corpus_paths: CorpusPaths::new(self.corpus.search_paths.clone()),
            load: LoadOptions {
                default_grade: self.corpus.default_grade.clone(),
            },
            settings_db: self.storage.settings_db.clone(),
            visitors_file: self.storage.visitors_file.clone(),
            cache_capacity: self.cache.capacity,
            ..Default::default()
        }
    }
}

/// Load configuration from `path`, or defaults when no file is given
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}
