pub mod error;
pub mod gesture;
pub mod note;
pub mod store;
pub mod tag;

// Convenience re-exports
pub use error::{Result, ZettelError};
pub use gesture::{GestureConfig, GestureOutcome, GestureStateMachine};
pub use note::Note;
pub use store::{NoteCollection, NoteStore};
pub use tag::{Tag, TagIndex};
