use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{FixedOffset, Offset, Utc};

use crate::origins::DEFAULT_CACHE_GROUP;

const MINUTES_PER_DAY: i32 = 24 * 60;

#[derive(Debug, Clone)]
pub struct ImportQuotaConfig {
    pub server_host: String,
    pub server_port: u16,
    pub data_dir: PathBuf,
    /// When false the aggregator stays unloaded and refuses quota work.
    pub should_load: bool,
    pub default_daily_limit: u64,
    pub utc_offset_minutes: i32,
    pub quota_ttl_secs: u64,
    pub origins_cache_group: String,
    pub origins_cache_ttl_secs: u64,
    pub token_notice_boundary_secs: u64,
    pub purge_interval_secs: u64,
    pub log_level: String,
}

impl Default for ImportQuotaConfig {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 8190,
            data_dir: PathBuf::from("data/aggregator"),
            should_load: true,
            default_daily_limit: 100,
            utc_offset_minutes: 0,
            quota_ttl_secs: 86_400,
            origins_cache_group: DEFAULT_CACHE_GROUP.to_string(),
            origins_cache_ttl_secs: 6 * 3_600,
            token_notice_boundary_secs: 4 * 86_400,
            purge_interval_secs: 300,
            log_level: "info".to_string(),
        }
    }
}

impl ImportQuotaConfig {
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();

        if let Ok(host) = env::var("EA_HOST") {
            cfg.server_host = host;
        }
        if let Ok(port) = env::var("EA_PORT") {
            cfg.server_port = port.parse().context("EA_PORT must be a valid u16")?;
        }
        if let Ok(dir) = env::var("EA_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Ok(flag) = env::var("EA_SHOULD_LOAD") {
            cfg.should_load = parse_bool(&flag)
                .with_context(|| format!("EA_SHOULD_LOAD is invalid: {flag}"))?;
        }
        if let Ok(limit) = env::var("EA_DEFAULT_DAILY_LIMIT") {
            cfg.default_daily_limit = limit
                .parse()
                .context("EA_DEFAULT_DAILY_LIMIT must be a positive integer")?;
        }
        if let Ok(offset) = env::var("EA_UTC_OFFSET_MINUTES") {
            cfg.utc_offset_minutes = offset
                .parse()
                .context("EA_UTC_OFFSET_MINUTES must be an integer")?;
        }
        if let Ok(ttl) = env::var("EA_QUOTA_TTL_SECS") {
            cfg.quota_ttl_secs = ttl
                .parse()
                .context("EA_QUOTA_TTL_SECS must be a positive integer")?;
        }
        if let Ok(group) = env::var("EA_ORIGINS_CACHE_GROUP") {
            cfg.origins_cache_group = group;
        }
        if let Ok(ttl) = env::var("EA_ORIGINS_CACHE_TTL_SECS") {
            cfg.origins_cache_ttl_secs = ttl
                .parse()
                .context("EA_ORIGINS_CACHE_TTL_SECS must be a positive integer")?;
        }
        if let Ok(boundary) = env::var("EA_TOKEN_NOTICE_BOUNDARY_SECS") {
            cfg.token_notice_boundary_secs = boundary
                .parse()
                .context("EA_TOKEN_NOTICE_BOUNDARY_SECS must be a non-negative integer")?;
        }
        if let Ok(interval) = env::var("EA_PURGE_INTERVAL_SECS") {
            cfg.purge_interval_secs = interval
                .parse()
                .context("EA_PURGE_INTERVAL_SECS must be a positive integer")?;
        }
        if let Ok(level) = env::var("LOG_LEVEL") {
            cfg.log_level = level;
        }

        cfg.validate()?;
        ensure_directory(&cfg.data_dir)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_daily_limit == 0 {
            anyhow::bail!("EA_DEFAULT_DAILY_LIMIT must be greater than zero");
        }
        if self.utc_offset_minutes.abs() >= MINUTES_PER_DAY {
            anyhow::bail!("EA_UTC_OFFSET_MINUTES must be within one day of UTC");
        }
        if self.quota_ttl_secs == 0 {
            anyhow::bail!("EA_QUOTA_TTL_SECS must be greater than zero");
        }
        if self.origins_cache_group.trim().is_empty() {
            anyhow::bail!("EA_ORIGINS_CACHE_GROUP cannot be empty");
        }
        if self.origins_cache_ttl_secs == 0 {
            anyhow::bail!("EA_ORIGINS_CACHE_TTL_SECS must be greater than zero");
        }
        if self.token_notice_boundary().is_none() {
            anyhow::bail!("EA_TOKEN_NOTICE_BOUNDARY_SECS is out of range");
        }
        if self.purge_interval_secs == 0 {
            anyhow::bail!("EA_PURGE_INTERVAL_SECS must be greater than zero");
        }

        Ok(())
    }

    /// Offset used to decide which calendar day "today" is.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// How long before token expiry the warning starts. `None` when the
    /// configured value does not fit a time delta.
    pub fn token_notice_boundary(&self) -> Option<chrono::Duration> {
        i64::try_from(self.token_notice_boundary_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn ensure_directory(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            anyhow::bail!("{} exists but is not a directory", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("unable to create data directory {}", path.display()))?;
    }
    Ok(())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => anyhow::bail!("invalid boolean value {value}"),
    }
}
