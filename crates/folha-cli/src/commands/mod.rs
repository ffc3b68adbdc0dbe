//! CLI subcommands.

pub mod config;
pub mod extract;
pub mod schema;

use std::path::{Path, PathBuf};

use folha_core::models::config::FolhaConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folha")
        .join("config.json")
}

/// Load the configuration from an explicit path, the default location, or defaults.
///
/// An explicit path must exist; the default location is optional.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FolhaConfig> {
    if let Some(path) = config_path {
        return Ok(FolhaConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        Ok(FolhaConfig::from_file(&default_path)?)
    } else {
        Ok(FolhaConfig::default())
    }
}
