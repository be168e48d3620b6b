//! Creation input for notes

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{lenient, Note};
use crate::error::{Error, Result};

/// Message returned when a draft lacks one of the required fields
pub const REQUIRED_FIELDS_MESSAGE: &str =
    "Error: 'title', 'content', and 'userId' are required fields.";

const DEFAULT_TITLE: &str = "Default Title";
const DEFAULT_CONTENT: &str = "Default Content";
const DEFAULT_USER_ID: &str = "user123";

/// Fields accepted when creating a note
///
/// Every field is optional on the wire. Keys not listed here (`plainText`,
/// `emoji`, colours, ids, timestamps) are ignored at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteDraft {
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub user_id: Option<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub tags: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_pinned: Option<bool>,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_archived: Option<bool>,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_deleted: Option<bool>,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_locked: Option<bool>,
    #[serde(deserialize_with = "lenient::flag")]
    pub read_only: Option<bool>,
    #[serde(deserialize_with = "lenient::text")]
    pub reminder_at: Option<String>,
}

impl NoteDraft {
    /// Check that `title`, `content`, and `userId` are present and non-empty.
    pub fn validate(&self) -> Result<()> {
        let missing = [&self.title, &self.content, &self.user_id]
            .into_iter()
            .any(|field| filled(field.as_deref()).is_none());
        if missing {
            return Err(Error::InvalidInput(REQUIRED_FIELDS_MESSAGE.to_string()));
        }
        Ok(())
    }

    /// Build a note, falling back to defaults for anything not supplied.
    ///
    /// Independent of [`Self::validate`]: the title/content/owner defaults
    /// only apply when validation was skipped.
    #[must_use]
    pub fn into_note(self, now: DateTime<Utc>) -> Note {
        let title = filled(self.title.as_deref()).unwrap_or(DEFAULT_TITLE);
        let content = filled(self.content.as_deref()).unwrap_or(DEFAULT_CONTENT);
        let user_id = filled(self.user_id.as_deref()).unwrap_or(DEFAULT_USER_ID);

        let mut note = Note::new(user_id, title, content, now);
        note.tags = self.tags.unwrap_or_default();
        note.is_pinned = self.is_pinned.unwrap_or(false);
        note.is_archived = self.is_archived.unwrap_or(false);
        note.is_deleted = self.is_deleted.unwrap_or(false);
        note.is_locked = self.is_locked.unwrap_or(false);
        note.read_only = self.read_only.unwrap_or(false);
        note.reminder_at = self.reminder_at.filter(|value| !value.is_empty());
        note
    }
}

fn filled(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
