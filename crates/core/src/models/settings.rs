use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::CoreError;

use super::asset::Asset;

/// Immutable configuration for the tracker pipeline.
///
/// Every field has a default, so a TOML file only needs to list what it
/// overrides:
///
/// ```toml
/// window_days = 14
/// data_dir = "/var/lib/crypto-tracker"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Reference asset (BTC by default); ties in the leading signal go here.
    pub asset_a: Asset,

    /// Challenger asset (ETH by default).
    pub asset_b: Asset,

    /// Trailing window fetched on every live run, in days.
    pub window_days: u32,

    /// Kline interval passed to the exchange.
    pub interval: String,

    /// EMA span for the trend lines.
    pub ema_span: usize,

    /// Dashboard auto-refresh cadence in live mode.
    pub refresh_interval_secs: u64,

    /// Directory holding the daily summary logs.
    pub data_dir: PathBuf,

    /// Directory holding the per-day raw snapshots.
    pub raw_data_dir: PathBuf,

    /// Exchange REST base URL, without trailing slash.
    pub api_base_url: String,

    /// Fetch attempts per asset before the run is aborted.
    pub fetch_attempts: u32,

    /// Pause between fetch attempts.
    pub retry_delay_ms: u64,

    /// HTTP request timeout.
    pub request_timeout_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            asset_a: Asset::bitcoin(),
            asset_b: Asset::ethereum(),
            window_days: 7,
            interval: "1h".to_string(),
            ema_span: 7,
            refresh_interval_secs: 60,
            data_dir: PathBuf::from("data_logs"),
            raw_data_dir: PathBuf::from("data_logs/raw_data"),
            api_base_url: "https://api.binance.com".to_string(),
            fetch_attempts: 3,
            retry_delay_ms: 500,
            request_timeout_secs: 30,
        }
    }
}

impl TrackerConfig {
    /// Parse a TOML document on top of the defaults and validate it.
    pub fn from_toml_str(s: &str) -> Result<Self, CoreError> {
        let config: TrackerConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Point both storage directories under a single root
    /// (`<root>` for logs, `<root>/raw_data` for snapshots).
    pub fn with_data_root(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        self.raw_data_dir = root.join("raw_data");
        self.data_dir = root;
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.window_days == 0 {
            return Err(CoreError::Config("window_days must be at least 1".into()));
        }
        if self.ema_span == 0 {
            return Err(CoreError::Config("ema_span must be at least 1".into()));
        }
        if self.fetch_attempts == 0 {
            return Err(CoreError::Config("fetch_attempts must be at least 1".into()));
        }
        if self.interval.trim().is_empty() {
            return Err(CoreError::Config("interval must not be empty".into()));
        }
        if self.asset_a == self.asset_b {
            return Err(CoreError::Config(format!(
                "asset_a and asset_b must differ (both are {})",
                self.asset_a.symbol
            )));
        }
        Ok(())
    }
}
