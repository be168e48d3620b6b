//! Partial update input for notes

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{lenient, Note};

/// Fields a caller may change on an existing note
///
/// Text and tag fields only apply when present and non-empty. Boolean flags
/// apply whenever present, so an explicit `false` clears a flag. `null`
/// counts as absent for every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotePatch {
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub plain_text: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub emoji: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub background_color: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub header_color: Option<String>,
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

impl NotePatch {
    /// Apply the patch to `note` and stamp `updated_at` with `now`.
    pub fn apply(self, note: &mut Note, now: DateTime<Utc>) {
        if let Some(title) = non_empty(self.title) {
            note.title = title;
        }
        if let Some(content) = non_empty(self.content) {
            note.content = content;
        }
        if let Some(plain_text) = non_empty(self.plain_text) {
            note.plain_text = plain_text;
        }
        if let Some(emoji) = non_empty(self.emoji) {
            note.emoji = Some(emoji);
        }
        if let Some(color) = non_empty(self.background_color) {
            note.background_color = Some(color);
        }
        if let Some(color) = non_empty(self.header_color) {
            note.header_color = Some(color);
        }
        if let Some(tags) = self.tags.filter(|tags| !tags.is_empty()) {
            note.tags = tags;
        }
        if let Some(reminder_at) = non_empty(self.reminder_at) {
            note.reminder_at = Some(reminder_at);
        }

        note.is_pinned = self.is_pinned.unwrap_or(note.is_pinned);
        note.is_archived = self.is_archived.unwrap_or(note.is_archived);
        note.is_deleted = self.is_deleted.unwrap_or(note.is_deleted);
        note.is_locked = self.is_locked.unwrap_or(note.is_locked);
        note.read_only = self.read_only.unwrap_or(note.read_only);

        note.updated_at = now;
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn existing() -> Note {
        let mut note = Note::new("u1", "Title", "Content", Utc::now());
        note.plain_text = "plain".to_string();
        note.emoji = Some("📝".to_string());
        note.tags = vec!["old".to_string()];
        note.is_pinned = true;
        note.reminder_at = Some("2030-01-01T00:00:00.000Z".to_string());
        note
    }

    fn parse(body: &str) -> NotePatch {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_empty_patch_only_refreshes_updated_at() {
        let mut note = existing();
        let before = note.clone();
        let later = before.updated_at + Duration::seconds(5);

        NotePatch::default().apply(&mut note, later);

        assert_eq!(note.updated_at, later);
        note.updated_at = before.updated_at;
        assert_eq!(note, before);
    }

    #[test]
    fn test_empty_strings_and_sequences_are_skipped() {
        let mut note = existing();
        parse(r#"{"title":"","content":"","plainText":"","emoji":"","tags":[],"reminderAt":""}"#)
            .apply(&mut note, Utc::now());

        assert_eq!(note.title, "Title");
        assert_eq!(note.content, "Content");
        assert_eq!(note.plain_text, "plain");
        assert_eq!(note.emoji.as_deref(), Some("📝"));
        assert_eq!(note.tags, vec!["old"]);
        assert!(note.reminder_at.is_some());
    }

    #[test]
    fn test_explicit_false_clears_a_flag() {
        let mut note = existing();
        parse(r#"{"isPinned":false}"#).apply(&mut note, Utc::now());
        assert!(!note.is_pinned);
    }

    #[test]
    fn test_null_flags_are_treated_as_absent() {
        let mut note = existing();
        parse(r#"{"isPinned":null,"title":null}"#).apply(&mut note, Utc::now());
        assert!(note.is_pinned);
        assert_eq!(note.title, "Title");
    }

    #[test]
    fn test_supplied_values_overwrite() {
        let mut note = existing();
        parse(
            r##"{"title":"T2","headerColor":"#fff","backgroundColor":"#000","tags":["a","b"],"isArchived":true,"readOnly":true}"##,
        )
        .apply(&mut note, Utc::now());

        assert_eq!(note.title, "T2");
        assert_eq!(note.content, "Content");
        assert_eq!(note.header_color.as_deref(), Some("#fff"));
        assert_eq!(note.background_color.as_deref(), Some("#000"));
        assert_eq!(note.tags, vec!["a", "b"]);
        assert!(note.is_archived);
        assert!(note.read_only);
        assert!(note.is_pinned);
    }

    #[test]
    fn test_owner_and_id_cannot_be_patched() {
        let mut note = existing();
        let id = note.id;
        parse(r#"{"userId":"intruder","id":"x","createdAt":"1999-01-01T00:00:00Z"}"#)
            .apply(&mut note, Utc::now());
        assert_eq!(note.user_id, "u1");
        assert_eq!(note.id, id);
    }

    #[test]
    fn test_scalar_values_are_cast() {
        let mut note = existing();
        parse(r#"{"title":42,"tags":"solo","isPinned":"false","readOnly":1}"#)
            .apply(&mut note, Utc::now());

        assert_eq!(note.title, "42");
        assert_eq!(note.tags, vec!["solo"]);
        assert!(!note.is_pinned);
        assert!(note.read_only);
    }
}
