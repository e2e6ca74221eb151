// src/config/app.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::providers::{atcoder, codechef, codeforces};
use crate::ingest::types::Platform;

pub const ENV_CONFIG_PATH: &str = "CONTESTS_CONFIG_PATH";
pub const ENV_PORT: &str = "PORT";
pub const ENV_CACHE_TTL_SECS: &str = "CONTESTS_CACHE_TTL_SECS";
pub const DEFAULT_CONFIG_PATH: &str = "config/aggregator.toml";

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub port: u16,
    pub cache_ttl_secs: u64,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub codeforces_url: String,
    pub codechef_url: String,
    pub atcoder_url: String,
    /// Platform names; unknown names are ignored with a warning.
    pub enabled: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            http_timeout_secs: 10,
            user_agent: concat!("contest-aggregator/", env!("CARGO_PKG_VERSION")).to_string(),
            sources: SourcesConfig::default(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            codeforces_url: codeforces::DEFAULT_URL.to_string(),
            codechef_url: codechef::DEFAULT_URL.to_string(),
            atcoder_url: atcoder::DEFAULT_URL.to_string(),
            enabled: Platform::ALL.iter().map(|p| p.as_str().to_string()).collect(),
        }
    }
}

impl SourcesConfig {
    /// Enabled platforms in fixed adapter order, regardless of list order.
    pub fn enabled_platforms(&self) -> Vec<Platform> {
        for name in &self.enabled {
            if Platform::from_name(name).is_none() {
                tracing::warn!(source = %name, "unknown source in config, ignoring");
            }
        }
        Platform::ALL
            .into_iter()
            .filter(|p| self.enabled.iter().any(|n| Platform::from_name(n) == Some(*p)))
            .collect()
    }
}

impl AppConfig {
    /// Parse a TOML file; missing keys keep their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let cfg: AppConfig =
            toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
        Ok(cfg)
    }

    /// Defaults, then file, then env:
    /// 1) $CONTESTS_CONFIG_PATH (must exist when set)
    /// 2) config/aggregator.toml if present
    /// 3) $PORT / $CONTESTS_CACHE_TTL_SECS override individual fields
    pub fn load() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from_file(&pb)?
        } else {
            let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_p.exists() {
                Self::load_from_file(&default_p)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Some(port) = parse_env(ENV_PORT) {
            self.port = port;
        }
        if let Some(ttl) = parse_env(ENV_CACHE_TTL_SECS) {
            self.cache_ttl_secs = ttl;
        }
    }

    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache_ttl_secs)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring invalid env value");
            None
        }
    }
}
