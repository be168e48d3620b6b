//! Document store for notes, backed by libSQL

mod connection;
mod migrations;
mod repository;

pub use connection::{Database, SyncConfig};
pub use repository::{LibSqlNoteRepository, NoteRepository};
