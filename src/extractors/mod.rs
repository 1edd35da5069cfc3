mod classify;
mod notes;
mod outline;

pub use classify::{ChecklistGroup, ChecklistPolicy, Classification, TaskState};
pub use notes::{NoteBuilder, NoteDescriptor};
pub use outline::{outline_document, render_outline};
