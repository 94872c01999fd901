//! CLI subcommands.

pub mod config;
pub mod expense;
pub mod insights;
pub mod scan;

use std::path::{Path, PathBuf};

use tracing::debug;

use tally_core::store::{JsonFileStore, Session};
use tally_core::TallyConfig;

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tally")
        .join("config.json")
}

fn default_ledger_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tally")
        .join("expenses.json")
}

/// Resolve the config file: the `--config` flag, else the platform default.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration. An explicit path must exist; a missing default file
/// means defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<TallyConfig> {
    match config_path {
        Some(path) => Ok(TallyConfig::from_file(Path::new(path))?),
        None => {
            let path = default_config_path();
            if path.exists() {
                Ok(TallyConfig::from_file(&path)?)
            } else {
                debug!("No config at {}, using defaults", path.display());
                Ok(TallyConfig::default())
            }
        }
    }
}

/// Open the configured ledger with a session for the configured user.
pub fn open_ledger(config: &TallyConfig) -> anyhow::Result<(JsonFileStore, Session)> {
    let path = config
        .storage
        .path
        .clone()
        .unwrap_or_else(default_ledger_path);
    let store = JsonFileStore::open(path)?;
    let session = Session::new(config.user.id.as_str())?;
    Ok((store, session))
}
