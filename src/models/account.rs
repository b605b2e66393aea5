//! Account and relationship models

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A Mastodon account as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    /// Server-assigned account ID
    pub id: String,
    /// Local username (without domain)
    pub username: String,
    /// Webfinger account `user` or `user@domain`
    pub acct: String,
    /// Display name (may contain emoji shortcodes)
    pub display_name: String,
    /// Whether the account requires follow approval
    #[serde(default)]
    pub locked: bool,
    /// Profile bio, as HTML
    #[serde(default)]
    pub note: String,
    /// Profile URL on the home instance
    #[serde(default)]
    pub url: String,
    /// Number of statuses posted
    #[serde(default)]
    pub statuses_count: u64,
    /// Number of accounts this account follows
    #[serde(default)]
    pub following_count: u64,
    /// Number of followers
    #[serde(default)]
    pub followers_count: u64,
    /// When the account was created
    pub created_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Handle with the leading `@`
    pub fn handle(&self) -> String {
        format!("@{}", self.acct)
    }
}

/// Relationship between the authenticated user and another account
#[derive(Debug, Clone, Deserialize)]
pub struct Relationship {
    /// Target account ID
    pub id: String,
    /// Whether we follow them
    #[serde(default)]
    pub following: bool,
    /// Whether they follow us
    #[serde(default)]
    pub followed_by: bool,
    /// Whether we block them
    #[serde(default)]
    pub blocking: bool,
    /// Whether we mute them
    #[serde(default)]
    pub muting: bool,
}
