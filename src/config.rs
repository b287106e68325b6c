// src/config.rs
//! Runtime configuration: defaults, optional TOML file, then environment overrides.
//!
//! Lookup order for the file:
//! 1) $SENTIRAX_CONFIG_PATH
//! 2) config/sentirax.toml
//! Missing file means defaults. Env vars always win over the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_PORT: u16 = 5173;
pub const DEFAULT_ASSET_DIR: &str = "static";
pub const DEFAULT_API_BASE: &str = "https://sentirax-downloader-backend.onrender.com";
pub const DEFAULT_CONFIG_PATH: &str = "config/sentirax.toml";

pub const ENV_CONFIG_PATH: &str = "SENTIRAX_CONFIG_PATH";
pub const ENV_PORT: &str = "PORT";
pub const ENV_ASSET_DIR: &str = "SENTIRAX_ASSET_DIR";
pub const ENV_API_BASE: &str = "SENTIRAX_API_BASE";
pub const ENV_METRICS_PORT: &str = "METRICS_PORT";

fn default_connect_timeout_secs() -> u64 {
    4
}
fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
struct FileConfig {
    port: Option<u16>,
    asset_dir: Option<PathBuf>,
    api_base: Option<String>,
    metrics_port: Option<u16>,
    #[serde(default = "default_connect_timeout_secs")]
    connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub asset_dir: PathBuf,
    pub api_base: Url,
    pub metrics_port: Option<u16>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            api_base: default_api_base(),
            metrics_port: None,
            connect_timeout: Duration::from_secs(default_connect_timeout_secs()),
            request_timeout: Duration::from_secs(default_request_timeout_secs()),
        }
    }
}

fn default_api_base() -> Url {
    Url::parse(DEFAULT_API_BASE).expect("default api base is a valid url")
}

impl AppConfig {
    /// Defaults + file (if any) + env. Loads `.env` first; a missing `.env` is fine.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut cfg = match config_path()? {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let f: FileConfig = toml::from_str(s)?;
        let defaults = Self::default();
        let api_base = match f.api_base {
            Some(raw) => parse_api_base(&raw)?,
            None => defaults.api_base,
        };
        Ok(Self {
            port: f.port.unwrap_or(defaults.port),
            asset_dir: f.asset_dir.unwrap_or(defaults.asset_dir),
            api_base,
            metrics_port: f.metrics_port,
            connect_timeout: Duration::from_secs(f.connect_timeout_secs),
            request_timeout: Duration::from_secs(f.request_timeout_secs),
        })
    }

    /// Env overrides. Unparseable values are ignored with a warning.
    pub fn apply_env(&mut self) {
        if let Ok(raw) = std::env::var(ENV_PORT) {
            match raw.trim().parse::<u16>() {
                Ok(p) => self.port = p,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid PORT"),
            }
        }
        if let Ok(raw) = std::env::var(ENV_ASSET_DIR) {
            if !raw.trim().is_empty() {
                self.asset_dir = PathBuf::from(raw.trim());
            }
        }
        if let Ok(raw) = std::env::var(ENV_API_BASE) {
            match parse_api_base(&raw) {
                Ok(u) => self.api_base = u,
                Err(e) => tracing::warn!(value = %raw, error = %e, "ignoring invalid SENTIRAX_API_BASE"),
            }
        }
        if let Ok(raw) = std::env::var(ENV_METRICS_PORT) {
            match raw.trim().parse::<u16>() {
                Ok(p) => self.metrics_port = Some(p),
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid METRICS_PORT"),
            }
        }
    }
}

fn config_path() -> Result<Option<PathBuf>> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Ok(Some(pb));
        }
        return Err(anyhow!("SENTIRAX_CONFIG_PATH points to non-existent path"));
    }
    let p = PathBuf::from(DEFAULT_CONFIG_PATH);
    Ok(p.exists().then_some(p))
}

fn parse_api_base(raw: &str) -> Result<Url> {
    let u = Url::parse(raw.trim()).with_context(|| format!("api base {raw:?}"))?;
    match u.scheme() {
        "http" | "https" => Ok(u),
        other => Err(anyhow!("unsupported api base scheme: {other}")),
    }
}
