//! Data models for Super Note

mod draft;
pub mod lenient;
mod note;
mod patch;

pub use draft::{NoteDraft, REQUIRED_FIELDS_MESSAGE};
pub use note::{Note, NoteId};
pub use patch::NotePatch;
