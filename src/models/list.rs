//! List model

use serde::Deserialize;

/// A user-defined timeline list
#[derive(Debug, Clone, Deserialize)]
pub struct List {
    /// Server-assigned list ID
    pub id: String,
    /// List title
    pub title: String,
}
