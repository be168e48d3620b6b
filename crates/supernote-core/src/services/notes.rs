//! Note service: the five CRUD operations over the note store.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::db::{Database, LibSqlNoteRepository, NoteRepository, SyncConfig};
use crate::models::{Note, NoteDraft, NoteId, NotePatch};
use crate::{Error, Result};

/// Stateless per call; the only thing shared between requests is the store handle.
#[derive(Clone)]
pub struct NoteService {
    db: Arc<Mutex<Database>>,
}

impl NoteService {
    /// Wrap an already opened database.
    pub fn from_database(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Open a note service backed by the database file at `db_path`.
    ///
    /// With a sync config the file is an embedded replica of the remote database.
    pub async fn open_path(
        db_path: impl Into<PathBuf>,
        sync_config: Option<SyncConfig>,
    ) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = match sync_config {
            Some(config) => {
                tracing::info!(
                    "Opening {} as replica of {}",
                    db_path.display(),
                    config.url.as_deref().unwrap_or("unknown")
                );
                Database::open_with_sync(&db_path, config).await?
            }
            None => {
                tracing::info!("Opening local database at {}", db_path.display());
                Database::open(&db_path).await?
            }
        };
        tracing::info!(replica = db.is_sync_enabled(), "Note store ready");
        Ok(Self::from_database(db))
    }

    /// Open an in-memory note service (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        Ok(Self::from_database(Database::open_in_memory().await?))
    }

    /// Flush a replica to its remote before the handle is dropped.
    pub async fn close(self) -> Result<()> {
        let db = self.db.lock().await;
        db.sync().await
    }

    /// Every note, in store order, soft-deleted ones included.
    pub async fn list_all(&self) -> Result<Vec<Note>> {
        let db = self.db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        repo.list_all().await
    }

    /// Validate, apply defaults, and insert a new note.
    pub async fn create(&self, draft: NoteDraft) -> Result<Note> {
        draft.validate()?;
        let note = draft.into_note(Utc::now());

        let db = self.db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        repo.insert(&note).await?;
        Ok(note)
    }

    /// Notes whose owner is exactly `user_id`, soft-deleted ones included.
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Note>> {
        let db = self.db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        repo.list_by_user(user_id).await
    }

    /// Apply `patch` to the note `note_id` owned by `user_id`.
    ///
    /// Lookup and save are separate store calls; a concurrent writer between
    /// them is overwritten.
    pub async fn update_by_id(
        &self,
        user_id: &str,
        note_id: &str,
        patch: NotePatch,
    ) -> Result<Note> {
        let mut note = self.find_owned(user_id, note_id).await?;
        patch.apply(&mut note, Utc::now());
        self.save(&note).await?;
        Ok(note)
    }

    /// Mark the note as deleted without removing it. `updated_at` is left alone.
    pub async fn soft_delete_by_id(&self, user_id: &str, note_id: &str) -> Result<Note> {
        let mut note = self.find_owned(user_id, note_id).await?;
        note.is_deleted = true;
        self.save(&note).await?;
        Ok(note)
    }

    /// Remove the note in a single store operation and return what was removed.
    pub async fn hard_delete_by_id(&self, user_id: &str, note_id: &str) -> Result<Note> {
        let id = parse_note_id(note_id)?;
        let db = self.db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        repo.delete_owned(&id, user_id)
            .await?
            .ok_or_else(|| Error::NotFound(note_id.to_string()))
    }

    /// Number of stored notes.
    pub async fn count(&self) -> Result<u64> {
        let db = self.db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        repo.count().await
    }

    async fn find_owned(&self, user_id: &str, note_id: &str) -> Result<Note> {
        let id = parse_note_id(note_id)?;
        let db = self.db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        repo.find_owned(&id, user_id)
            .await?
            .ok_or_else(|| Error::NotFound(note_id.to_string()))
    }

    async fn save(&self, note: &Note) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlNoteRepository::new(db.connection());
        repo.save(note).await
    }
}

/// A malformed identifier cannot match any stored note.
fn parse_note_id(note_id: &str) -> Result<NoteId> {
    note_id
        .parse()
        .map_err(|_| Error::NotFound(note_id.to_string()))
}
