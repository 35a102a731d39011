use anyhow::Context;
use std::path::{Path, PathBuf};

use crypto_tracker_core::models::settings::TrackerConfig;

/// Default listen address for `serve`.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Build the tracker configuration: defaults, then the optional TOML file,
/// then the data directory override.
pub fn load_tracker_config(
    config_path: Option<&Path>,
    data_dir: Option<PathBuf>,
) -> anyhow::Result<TrackerConfig> {
    let mut config = match config_path {
        Some(path) => TrackerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => TrackerConfig::default(),
    };

    if let Some(dir) = data_dir {
        config = config.with_data_root(dir);
    }

    config.validate().context("invalid tracker configuration")?;
    Ok(config)
}
