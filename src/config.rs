//! Configuration module for tootline
//!
//! Credentials and preferences live in one TOML file with a table per
//! profile, so several accounts (or instances) can be used side by side:
//!
//! ```toml
//! [profiles.default]
//! instance = "https://mastodon.social"
//! client_id = "..."
//! client_secret = "..."
//! token = "..."
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::paths;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Shorten displayed links the way browsers do
    #[serde(default = "default_shorten_links")]
    pub shorten_links: bool,

    /// Default number of items to fetch per request
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,

    /// Show display-name emoji as `:shortcodes:` instead of glyphs
    #[serde(default)]
    pub emoji_shortcodes: bool,

    /// Stored credentials, one table per profile name
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

/// Credentials for one instance/account pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Instance base URL (scheme included)
    pub instance: String,
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// OAuth access token
    pub token: String,
}

fn default_shorten_links() -> bool {
    true
}

fn default_fetch_limit() -> usize {
    20
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        paths::config_path()
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self {
                shorten_links: default_shorten_links(),
                fetch_limit: default_fetch_limit(),
                emoji_shortcodes: false,
                profiles: BTreeMap::new(),
            })
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Insert or replace a profile
    pub fn set_profile(&mut self, name: &str, profile: Profile) {
        self.profiles.insert(name.to_string(), profile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert!(config.shorten_links);
        assert_eq!(config.fetch_limit, 20);
        assert!(!config.emoji_shortcodes);
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::load_from(&path).unwrap();
        config.emoji_shortcodes = true;
        config.set_profile(
            "default",
            Profile {
                instance: "https://example.social".to_string(),
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
                token: "token".to_string(),
            },
        );
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.emoji_shortcodes);
        let profile = loaded.profile("default").unwrap();
        assert_eq!(profile.instance, "https://example.social");
        assert_eq!(profile.token, "token");
        assert!(loaded.profile("other").is_none());
    }
}
