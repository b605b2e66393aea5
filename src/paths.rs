//! Common paths for tootline data storage
//!
//! All tootline data is stored under ~/.config/tootline/ on all platforms:
//! - config.toml - User configuration and profile credentials

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the tootline data directory (~/.config/tootline/)
///
/// This is consistent across all platforms for simplicity.
pub fn tootline_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let dir = home.join(".config").join("tootline");
    fs::create_dir_all(&dir).context("Failed to create tootline directory")?;
    Ok(dir)
}

/// Get the config file path (~/.config/tootline/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(tootline_dir()?.join("config.toml"))
}
