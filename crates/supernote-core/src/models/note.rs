//! Note model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A unique identifier for a note, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Create a new unique note ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A note owned by a user
///
/// Serialized with camelCase keys; optional decorations serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier, assigned on creation
    pub id: NoteId,
    /// Owner; no referential integrity is enforced
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub plain_text: String,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
    /// Refreshed by every successful update
    pub updated_at: DateTime<Utc>,
    pub emoji: Option<String>,
    pub background_color: Option<String>,
    pub header_color: Option<String>,
    pub tags: Vec<String>,
    pub is_pinned: bool,
    pub is_archived: bool,
    /// Soft delete flag. Reads never filter on it.
    pub is_deleted: bool,
    pub is_locked: bool,
    pub read_only: bool,
    /// Opaque reminder timestamp string
    pub reminder_at: Option<String>,
}

impl Note {
    /// Create a note with the given owner, title, and content; every other
    /// field takes its default.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NoteId::new(),
            user_id: user_id.into(),
            title: title.into(),
            content: content.into(),
            plain_text: String::new(),
            created_at: now,
            updated_at: now,
            emoji: None,
            background_color: None,
            header_color: None,
            tags: Vec::new(),
            is_pinned: false,
            is_archived: false,
            is_deleted: false,
            is_locked: false,
            read_only: false,
            reminder_at: None,
        }
    }
}
