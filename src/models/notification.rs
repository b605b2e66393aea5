//! Notification model

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{Account, Status};

/// A notification as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    /// Server-assigned notification ID
    pub id: String,
    /// Kind of event (mention, favourite, reblog, follow, poll, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// When the event happened
    pub created_at: DateTime<Utc>,
    /// Account that triggered the event
    pub account: Account,
    /// Status involved, when the event concerns one
    pub status: Option<Status>,
}
