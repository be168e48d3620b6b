//! Note repository implementation

use chrono::{DateTime, SecondsFormat, Utc};
use libsql::{params, Connection, Row, Value};

use crate::error::{Error, Result};
use crate::models::{Note, NoteId};

const NOTE_COLUMNS: &str = "id, user_id, title, content, plain_text, created_at, updated_at, \
    emoji, background_color, header_color, tags, \
    is_pinned, is_archived, is_deleted, is_locked, read_only, reminder_at";

/// Trait for note storage operations (async)
///
/// Reads never filter on `is_deleted` and return notes in insertion order.
#[allow(async_fn_in_trait)]
pub trait NoteRepository {
    /// Insert a new note document
    async fn insert(&self, note: &Note) -> Result<()>;

    /// List every note
    async fn list_all(&self) -> Result<Vec<Note>>;

    /// List notes whose owner is exactly `user_id`
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Note>>;

    /// Find the note with `id` owned by `user_id`
    async fn find_owned(&self, id: &NoteId, user_id: &str) -> Result<Option<Note>>;

    /// Overwrite the stored document with `note`
    async fn save(&self, note: &Note) -> Result<()>;

    /// Remove the note with `id` owned by `user_id` in one statement, returning it
    async fn delete_owned(&self, id: &NoteId, user_id: &str) -> Result<Option<Note>>;

    /// Number of stored notes
    async fn count(&self) -> Result<u64>;
}

/// libSQL implementation of `NoteRepository`
pub struct LibSqlNoteRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlNoteRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    async fn query_notes(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Vec<Note>> {
        let mut rows = self.conn.query(sql, params).await?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next().await? {
            notes.push(parse_note(&row)?);
        }
        Ok(notes)
    }
}

impl NoteRepository for LibSqlNoteRepository<'_> {
    async fn insert(&self, note: &Note) -> Result<()> {
        let sql = format!(
            "INSERT INTO notes ({NOTE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
        self.conn
            .execute(
                &sql,
                params![
                    note.id.as_str(),
                    note.user_id.as_str(),
                    note.title.as_str(),
                    note.content.as_str(),
                    note.plain_text.as_str(),
                    format_timestamp(note.created_at),
                    format_timestamp(note.updated_at),
                    text_or_null(note.emoji.as_deref()),
                    text_or_null(note.background_color.as_deref()),
                    text_or_null(note.header_color.as_deref()),
                    serde_json::to_string(&note.tags)?,
                    i64::from(note.is_pinned),
                    i64::from(note.is_archived),
                    i64::from(note.is_deleted),
                    i64::from(note.is_locked),
                    i64::from(note.read_only),
                    text_or_null(note.reminder_at.as_deref()),
                ],
            )
            .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Note>> {
        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY rowid");
        self.query_notes(&sql, ()).await
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Note>> {
        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = ? ORDER BY rowid");
        self.query_notes(&sql, [user_id]).await
    }

    async fn find_owned(&self, id: &NoteId, user_id: &str) -> Result<Option<Note>> {
        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ? AND user_id = ?");
        let id = id.as_str();
        let mut notes = self.query_notes(&sql, [id.as_str(), user_id]).await?;
        Ok(notes.pop())
    }

    async fn save(&self, note: &Note) -> Result<()> {
        let rows = self
            .conn
            .execute(
                "UPDATE notes SET
                    title = ?, content = ?, plain_text = ?, updated_at = ?,
                    emoji = ?, background_color = ?, header_color = ?, tags = ?,
                    is_pinned = ?, is_archived = ?, is_deleted = ?, is_locked = ?, read_only = ?,
                    reminder_at = ?
                 WHERE id = ?",
                params![
                    note.title.as_str(),
                    note.content.as_str(),
                    note.plain_text.as_str(),
                    format_timestamp(note.updated_at),
                    text_or_null(note.emoji.as_deref()),
                    text_or_null(note.background_color.as_deref()),
                    text_or_null(note.header_color.as_deref()),
                    serde_json::to_string(&note.tags)?,
                    i64::from(note.is_pinned),
                    i64::from(note.is_archived),
                    i64::from(note.is_deleted),
                    i64::from(note.is_locked),
                    i64::from(note.read_only),
                    text_or_null(note.reminder_at.as_deref()),
                    note.id.as_str(),
                ],
            )
            .await?;

        // The document vanished between lookup and save
        if rows == 0 {
            return Err(Error::Database(format!(
                "No document found to save for note {}",
                note.id
            )));
        }
        Ok(())
    }

    async fn delete_owned(&self, id: &NoteId, user_id: &str) -> Result<Option<Note>> {
        let sql = format!("DELETE FROM notes WHERE id = ? AND user_id = ? RETURNING {NOTE_COLUMNS}");
        let id = id.as_str();
        let mut notes = self.query_notes(&sql, [id.as_str(), user_id]).await?;
        Ok(notes.pop())
    }

    async fn count(&self) -> Result<u64> {
        let mut rows = self.conn.query("SELECT COUNT(*) FROM notes", ()).await?;
        let count: i64 = match rows.next().await? {
            Some(row) => row.get(0)?,
            None => 0,
        };
        u64::try_from(count).map_err(|_| Error::Database(format!("Invalid note count: {count}")))
    }
}

/// Parse a note from a database row selected with `NOTE_COLUMNS`
fn parse_note(row: &Row) -> Result<Note> {
    let id: String = row.get(0)?;
    let tags: String = row.get(10)?;

    Ok(Note {
        id: id
            .parse()
            .map_err(|_| Error::Database(format!("Invalid note ID in store: {id}")))?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        plain_text: row.get(4)?,
        created_at: parse_timestamp(&row.get::<String>(5)?)?,
        updated_at: parse_timestamp(&row.get::<String>(6)?)?,
        emoji: optional_text(row, 7)?,
        background_color: optional_text(row, 8)?,
        header_color: optional_text(row, 9)?,
        tags: serde_json::from_str(&tags)?,
        is_pinned: row.get::<i64>(11)? != 0,
        is_archived: row.get::<i64>(12)? != 0,
        is_deleted: row.get::<i64>(13)? != 0,
        is_locked: row.get::<i64>(14)? != 0,
        read_only: row.get::<i64>(15)? != 0,
        reminder_at: optional_text(row, 16)?,
    })
}

fn optional_text(row: &Row, idx: i32) -> Result<Option<String>> {
    match row.get_value(idx)? {
        Value::Null => Ok(None),
        Value::Text(value) => Ok(Some(value)),
        other => Err(Error::Database(format!(
            "Expected text in column {idx}, found {other:?}"
        ))),
    }
}

fn text_or_null(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |value| Value::Text(value.to_string()))
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use pretty_assertions::assert_eq;

    async fn setup() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    fn note(user_id: &str, title: &str) -> Note {
        Note::new(user_id, title, "content", Utc::now())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_insert_and_find_round_trips_every_field() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let mut stored = note("u1", "Hello");
        stored.emoji = Some("🔥".to_string());
        stored.header_color = Some("#123456".to_string());
        stored.tags = vec!["b".to_string(), "a".to_string()];
        stored.is_locked = true;
        stored.reminder_at = Some("2030-05-01T10:00:00.000Z".to_string());
        repo.insert(&stored).await.unwrap();

        let fetched = repo.find_owned(&stored.id, "u1").await.unwrap().unwrap();
        assert_eq!(fetched, stored);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_find_owned_requires_matching_owner() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let stored = note("u1", "Mine");
        repo.insert(&stored).await.unwrap();

        assert!(repo.find_owned(&stored.id, "u2").await.unwrap().is_none());
        assert!(repo.find_owned(&NoteId::new(), "u1").await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_list_keeps_insertion_order_and_deleted_notes() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let first = note("u1", "first");
        let mut second = note("u2", "second");
        second.is_deleted = true;
        let third = note("u1", "third");
        for n in [&first, &second, &third] {
            repo.insert(n).await.unwrap();
        }

        let titles: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);

        let by_user = repo.list_by_user("u1").await.unwrap();
        assert_eq!(by_user.len(), 2);
        assert!(by_user.iter().all(|n| n.user_id == "u1"));

        let deleted = repo.list_by_user("u2").await.unwrap();
        assert_eq!(deleted.len(), 1);
        assert!(deleted[0].is_deleted);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_save_overwrites_document() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let mut stored = note("u1", "before");
        repo.insert(&stored).await.unwrap();

        stored.title = "after".to_string();
        stored.is_archived = true;
        stored.emoji = None;
        repo.save(&stored).await.unwrap();

        let fetched = repo.find_owned(&stored.id, "u1").await.unwrap().unwrap();
        assert_eq!(fetched, stored);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_save_missing_document_fails() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let err = repo.save(&note("u1", "ghost")).await.unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_owned_returns_removed_note() {
        let db = setup().await;
        let repo = LibSqlNoteRepository::new(db.connection());

        let stored = note("u1", "doomed");
        repo.insert(&stored).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        assert!(repo.delete_owned(&stored.id, "u2").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);

        let removed = repo.delete_owned(&stored.id, "u1").await.unwrap().unwrap();
        assert_eq!(removed, stored);
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.delete_owned(&stored.id, "u1").await.unwrap().is_none());
    }
}
