//! Job records and the upload-to-delivery state machine.
//!
//! A [`Job`] tracks one user-initiated upload from submission until the
//! processing pipeline reports completion.  The store owns all mutation;
//! this module only defines the record shape and the transition rules.

use serde::Serialize;

use crate::Timestamp;

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Upload request is in flight.
    ///
    /// Rendered optimistically by upload UIs while the request is on
    /// the wire.  The store itself only registers jobs once the server
    /// has acknowledged them, so its records enter at
    /// [`JobState::AwaitingProcessing`] (or [`JobState::Failed`]).
    Uploading,
    /// Upload acknowledged; waiting for a completion event.
    AwaitingProcessing,
    /// Completion event received; download targets are populated.
    Processed,
    /// Upload was rejected by the server or failed in transport.
    Failed,
}

impl JobState {
    /// Whether this state is terminal in the forward direction.
    ///
    /// `Processed` is monotonic: once reached, a job never regresses to
    /// `AwaitingProcessing` or `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Processed | JobState::Failed)
    }
}

/// A resolved, user-clickable download link for one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadTarget {
    /// Resolution label, e.g. `"720p"`.
    pub label: String,
    /// Fully resolved URL.
    pub url: String,
}

/// A resolved transcript link for one format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptTarget {
    /// Transcript format, e.g. `"txt"` or `"srt"`.
    pub format: String,
    /// Fully resolved URL.
    pub url: String,
}

/// One upload-to-delivery lifecycle tracked by the dashboard.
///
/// Exactly one record exists per `job_id` within a session.  Download and
/// transcript targets are non-empty only in [`JobState::Processed`].
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    /// Opaque identifier: the server's `video_id`, or a locally
    /// synthesized id for uploads that never received one.
    pub job_id: String,
    /// Original file name, informational only.
    pub file_name: String,
    pub state: JobState,
    /// Ordered download links, populated on completion.
    pub downloads: Vec<DownloadTarget>,
    /// Ordered transcript links, populated on completion.
    pub transcripts: Vec<TranscriptTarget>,
    /// Last human-readable status text (server-supplied or synthesized).
    pub message: String,
    /// When this record was first created (UTC).
    pub registered_at: Timestamp,
}

impl Job {
    /// Create a record for an acknowledged upload awaiting processing.
    pub fn awaiting(job_id: impl Into<String>, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        Self {
            job_id: job_id.into(),
            message: format!("Uploaded {file_name}, awaiting processing"),
            file_name,
            state: JobState::AwaitingProcessing,
            downloads: Vec::new(),
            transcripts: Vec::new(),
            registered_at: chrono::Utc::now(),
        }
    }

    /// Create a record for an upload that failed before receiving an id.
    pub fn failed(
        job_id: impl Into<String>,
        file_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            file_name: file_name.into(),
            state: JobState::Failed,
            downloads: Vec::new(),
            transcripts: Vec::new(),
            message: message.into(),
            registered_at: chrono::Utc::now(),
        }
    }

    /// Transition to `Processed`, replacing message and targets.
    ///
    /// Safe to call repeatedly: re-application overwrites the completed
    /// fields instead of appending, which keeps duplicate completion
    /// events idempotent.
    pub fn complete(
        &mut self,
        message: impl Into<String>,
        downloads: Vec<DownloadTarget>,
        transcripts: Vec<TranscriptTarget>,
    ) {
        self.state = JobState::Processed;
        self.message = message.into();
        self.downloads = downloads;
        self.transcripts = transcripts;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn awaiting_job_has_no_targets() {
        let job = Job::awaiting("v1", "clip.mp4");
        assert_eq!(job.state, JobState::AwaitingProcessing);
        assert!(job.downloads.is_empty());
        assert!(job.transcripts.is_empty());
    }

    #[test]
    fn failed_job_is_terminal() {
        let job = Job::failed("local-1", "clip.mp4", "server rejected");
        assert_eq!(job.state, JobState::Failed);
        assert!(job.state.is_terminal());
    }

    #[test]
    fn complete_replaces_targets_instead_of_appending() {
        let mut job = Job::awaiting("v1", "clip.mp4");
        let targets = vec![DownloadTarget {
            label: "480p".into(),
            url: "http://dl/f480".into(),
        }];

        job.complete("done", targets.clone(), Vec::new());
        job.complete("done", targets.clone(), Vec::new());

        assert_eq!(job.state, JobState::Processed);
        assert_eq!(job.downloads, targets);
    }
}
