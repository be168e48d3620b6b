//! supernote-core - Core library for Super Note
//!
//! This crate contains the note model, the libSQL-backed document store, and
//! the note service consumed by the HTTP API.

pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use error::{Error, Result};
pub use models::{Note, NoteDraft, NoteId, NotePatch};
pub use services::NoteService;
