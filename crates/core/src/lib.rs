//! Pure domain logic for the vidboard dashboard.
//!
//! Holds the job model and its state machine, upload validation, the
//! completion-event payload type, download-target resolution, and the
//! user-facing notification queue.  Nothing in this crate performs I/O.

pub mod event;
pub mod job;
pub mod notify;
pub mod resolver;
pub mod validate;

pub use event::CompletionEvent;
pub use job::{DownloadTarget, Job, JobState, TranscriptTarget};

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
