//! Services shared by every Super Note interface.

mod notes;

pub use notes::NoteService;
