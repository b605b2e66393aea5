//! Status (toot) model

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::Account;

/// A status/toot as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    /// Server-assigned status ID
    pub id: String,
    /// When the status was posted
    pub created_at: DateTime<Utc>,
    /// Status body, as server-rendered HTML
    #[serde(default)]
    pub content: String,
    /// URL of the status on the web
    pub url: Option<String>,
    /// Author account
    pub account: Account,
    /// The boosted status, if this is a boost
    pub reblog: Option<Box<Status>>,
    /// Favorite count
    #[serde(default)]
    pub favourites_count: u64,
    /// Boost count
    #[serde(default)]
    pub reblogs_count: u64,
    /// Reply count
    #[serde(default)]
    pub replies_count: u64,
    /// Whether the authenticated user favorited this status
    pub favourited: Option<bool>,
    /// Whether the authenticated user boosted this status
    pub reblogged: Option<bool>,
    /// ID of the status this replies to
    pub in_reply_to_id: Option<String>,
    /// Visibility (public, unlisted, private, direct)
    #[serde(default)]
    pub visibility: String,
    /// Content warning text
    #[serde(default)]
    pub spoiler_text: String,
    /// Whether media is marked sensitive
    #[serde(default)]
    pub sensitive: bool,
    /// Attached media
    #[serde(default)]
    pub media_attachments: Vec<MediaAttachment>,
    /// Attached poll, if any
    pub poll: Option<Poll>,
}

impl Status {
    /// The status whose content should be displayed: the boost target for
    /// boosts, otherwise self.
    pub fn original(&self) -> &Status {
        self.reblog.as_deref().unwrap_or(self)
    }

    /// Relative age string (e.g. "5m", "2h", "3d")
    pub fn relative_time(&self) -> String {
        let duration = Utc::now().signed_duration_since(self.created_at);
        if duration.num_seconds() < 60 {
            format!("{}s", duration.num_seconds().max(0))
        } else if duration.num_minutes() < 60 {
            format!("{}m", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h", duration.num_hours())
        } else if duration.num_days() < 7 {
            format!("{}d", duration.num_days())
        } else {
            self.created_at.format("%b %d %Y").to_string()
        }
    }
}

/// Media attachment metadata
#[derive(Debug, Clone, Deserialize)]
pub struct MediaAttachment {
    /// Media URL
    pub url: Option<String>,
    /// Attachment type (image, video, gifv, audio, unknown)
    #[serde(rename = "type", default)]
    pub media_type: String,
    /// Alt text description
    pub description: Option<String>,
}

/// A poll attached to a status
#[derive(Debug, Clone, Deserialize)]
pub struct Poll {
    /// Server-assigned poll ID
    pub id: String,
    /// Whether multiple choices are allowed
    #[serde(default)]
    pub multiple: bool,
    /// Whether voting has closed
    #[serde(default)]
    pub expired: bool,
    /// Poll choices
    #[serde(default)]
    pub options: Vec<PollOption>,
}

/// One poll choice
#[derive(Debug, Clone, Deserialize)]
pub struct PollOption {
    /// Choice text
    pub title: String,
    /// Vote count, if visible
    pub votes_count: Option<u64>,
}
