//! Authoritative job-status store.
//!
//! The only component allowed to mutate job state.  Holds jobs in
//! insertion order for stable rendering and broadcasts a
//! [`StoreUpdate`] after every mutation so the rendering layer can stay
//! a pure observer.
//!
//! The correctness core lives in [`JobStatusStore::apply_event`]: the
//! upload acknowledgment and the completion event for the same job
//! arrive on independent channels with no ordering guarantee, and both
//! orders must converge to one identical record.  Completion events for
//! ids the store has never seen materialize a new `Processed` record —
//! a pipeline outcome is never silently dropped.

use std::collections::HashMap;

use tokio::sync::{broadcast, RwLock};
use vidboard_core::resolver::{resolve_targets, DownloadBase};
use vidboard_core::{CompletionEvent, Job, JobState};

/// Broadcast capacity for store updates.
const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// Notification that one job's record changed.
#[derive(Debug, Clone)]
pub struct StoreUpdate {
    pub job_id: String,
    pub state: JobState,
}

/// Insertion-ordered job records plus an id index.
#[derive(Default)]
struct StoreInner {
    jobs: Vec<Job>,
    index: HashMap<String, usize>,
}

/// The authoritative mapping from job id to status record.
pub struct JobStatusStore {
    inner: RwLock<StoreInner>,
    update_tx: broadcast::Sender<StoreUpdate>,
    download_base: DownloadBase,
}

impl JobStatusStore {
    /// Create an empty store resolving raw identifiers against `base`.
    pub fn new(base: DownloadBase) -> Self {
        let (update_tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            inner: RwLock::new(StoreInner::default()),
            update_tx,
            download_base: base,
        }
    }

    /// Subscribe to per-job update notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreUpdate> {
        self.update_tx.subscribe()
    }

    /// Register an acknowledged upload as awaiting processing.
    ///
    /// Re-registration of a known id is a no-op merge: at most the
    /// file name is filled in if the record was materialized from an
    /// event that arrived first, in which case an update is broadcast
    /// so renderers pick the name up.  A `Processed` record never
    /// regresses.
    pub async fn register_uploading(&self, job_id: &str, file_name: &str) {
        let mut inner = self.inner.write().await;

        if let Some(&pos) = inner.index.get(job_id) {
            let job = &mut inner.jobs[pos];
            if job.file_name.is_empty() && !file_name.is_empty() {
                job.file_name = file_name.to_string();
                let update = StoreUpdate {
                    job_id: job.job_id.clone(),
                    state: job.state,
                };
                drop(inner);
                tracing::debug!(job_id, file_name, "Filled file name on merged registration");
                let _ = self.update_tx.send(update);
                return;
            }
            tracing::debug!(job_id, state = ?job.state, "Job already known, merging registration");
            return;
        }

        let job = Job::awaiting(job_id, file_name);
        let update = StoreUpdate {
            job_id: job.job_id.clone(),
            state: job.state,
        };
        push_job(&mut inner, job);
        drop(inner);

        tracing::info!(job_id, file_name, "Registered job awaiting processing");
        let _ = self.update_tx.send(update);
    }

    /// Register a failed upload under a synthesized local id.
    ///
    /// The server only assigns ids on success, so a rejected or
    /// transport-failed upload gets a `local-<uuid>` id to occupy
    /// exactly one slot in the rendered list.  Returns the id.
    pub async fn register_failed(&self, file_name: &str, message: &str) -> String {
        let job_id = format!("local-{}", uuid::Uuid::new_v4());
        let job = Job::failed(&job_id, file_name, message);
        let update = StoreUpdate {
            job_id: job_id.clone(),
            state: job.state,
        };

        let mut inner = self.inner.write().await;
        push_job(&mut inner, job);
        drop(inner);

        tracing::info!(job_id = %job_id, file_name, "Registered failed upload");
        let _ = self.update_tx.send(update);
        job_id
    }

    /// Apply a completion event, transitioning (or materializing) the
    /// matching job as `Processed`.
    ///
    /// Idempotent: re-applying the same event overwrites the completed
    /// fields rather than duplicating targets or records.
    pub async fn apply_event(&self, event: &CompletionEvent) {
        let resolved = resolve_targets(event, &self.download_base);
        let message = event.message_or_default();

        let mut inner = self.inner.write().await;
        match inner.index.get(&event.video_id).copied() {
            Some(pos) => {
                inner.jobs[pos].complete(message, resolved.downloads, resolved.transcripts);
                tracing::info!(job_id = %event.video_id, "Job processed");
            }
            None => {
                // The event beat the upload acknowledgment (or belongs to a
                // job this session never submitted). Completion events are
                // the ground truth of pipeline outcome, so materialize the
                // record rather than discarding it.
                let mut job = Job::awaiting(&event.video_id, "");
                job.complete(message, resolved.downloads, resolved.transcripts);
                push_job(&mut inner, job);
                tracing::info!(
                    job_id = %event.video_id,
                    "Materialized job from completion event for unknown id",
                );
            }
        }
        drop(inner);

        let _ = self.update_tx.send(StoreUpdate {
            job_id: event.video_id.clone(),
            state: JobState::Processed,
        });
    }

    /// All job records in insertion order, stable for rendering.
    pub async fn snapshot(&self) -> Vec<Job> {
        self.inner.read().await.jobs.clone()
    }
}

fn push_job(inner: &mut StoreInner, job: Job) {
    inner.index.insert(job.job_id.clone(), inner.jobs.len());
    inner.jobs.push(job);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> JobStatusStore {
        JobStatusStore::new(DownloadBase::new("http://dl.local"))
    }

    fn completion(json: serde_json::Value) -> CompletionEvent {
        serde_json::from_value(json).unwrap()
    }

    #[tokio::test]
    async fn duplicate_registration_is_a_no_op() {
        let store = store();
        store.register_uploading("v1", "clip.mp4").await;
        store.register_uploading("v1", "other.mp4").await;

        let jobs = store.snapshot().await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].file_name, "clip.mp4");
    }

    #[tokio::test]
    async fn registration_after_completion_does_not_regress() {
        let store = store();
        store
            .apply_event(&completion(serde_json::json!({
                "video_id": "v1",
                "resolutions": {"480p": "f480"},
            })))
            .await;
        store.register_uploading("v1", "clip.mp4").await;

        let jobs = store.snapshot().await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].state, JobState::Processed);
        // The late registration only fills in the file name.
        assert_eq!(jobs[0].file_name, "clip.mp4");
        assert_eq!(jobs[0].downloads.len(), 1);
    }

    #[tokio::test]
    async fn merge_that_fills_the_file_name_is_observable() {
        let store = store();
        let mut rx = store.subscribe();

        store
            .apply_event(&completion(serde_json::json!({"video_id": "v1"})))
            .await;
        rx.recv().await.unwrap();

        store.register_uploading("v1", "clip.mp4").await;
        let update = rx.recv().await.unwrap();
        assert_eq!(update.job_id, "v1");
        assert_eq!(update.state, JobState::Processed);
        assert_eq!(store.snapshot().await[0].file_name, "clip.mp4");
    }

    #[tokio::test]
    async fn failed_uploads_get_distinct_local_ids() {
        let store = store();
        let a = store.register_failed("a.mp4", "rejected").await;
        let b = store.register_failed("b.mp4", "rejected").await;

        assert_ne!(a, b);
        assert!(a.starts_with("local-"));
        assert_eq!(store.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn updates_are_observable() {
        let store = store();
        let mut rx = store.subscribe();

        store.register_uploading("v1", "clip.mp4").await;
        let update = rx.recv().await.unwrap();
        assert_eq!(update.job_id, "v1");
        assert_eq!(update.state, JobState::AwaitingProcessing);

        store
            .apply_event(&completion(serde_json::json!({"video_id": "v1"})))
            .await;
        let update = rx.recv().await.unwrap();
        assert_eq!(update.state, JobState::Processed);
    }
}
