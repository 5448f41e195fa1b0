//! Upload path: HTTP client and submission coordinator.
//!
//! [`UploadApi`] wraps the upload service's multipart endpoint with
//! [`reqwest`].  [`UploadCoordinator`] gates each submission through the
//! file validator, fires the request, registers the outcome with the
//! job store, and queues the user-facing notification.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Mutex;
use vidboard_core::notify::{Notification, NotificationQueue};
use vidboard_core::validate::{validate_upload, UploadFile, ValidationError};

use crate::store::JobStatusStore;

/// Owner used when no identity has been resolved; the dashboard must
/// stay usable without one.
pub const DEFAULT_OWNER_ID: &str = "unknown";

/// HTTP client for the upload service.
pub struct UploadApi {
    client: reqwest::Client,
    base_url: String,
}

/// Success body of the upload endpoint.
#[derive(Debug, Deserialize)]
pub struct UploadAccepted {
    /// Server-assigned job identifier.
    pub video_id: String,
}

/// Error body of the upload endpoint, when structured.
#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    detail: Option<String>,
}

/// Errors from the upload HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upload service returned a non-2xx status code.
    #[error("Upload rejected ({status}): {detail}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server-supplied detail, or a generic substitute.
        detail: String,
    },
}

impl UploadError {
    /// Text suitable for the user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::Request(_) => "Upload failed: could not reach the server".to_string(),
            UploadError::Rejected { detail, .. } => format!("Upload failed: {detail}"),
        }
    }
}

impl UploadApi {
    /// Create a new API client for the upload service.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://host:8000`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Submit a file to `POST /upload-video/?user_id=<owner>`.
    ///
    /// Fire-and-forget from the dashboard's perspective: the response
    /// only acknowledges receipt; completion arrives later on the push
    /// channel.
    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        owner_id: &str,
    ) -> Result<UploadAccepted, UploadError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(vidboard_core::validate::SUPPORTED_MEDIA_TYPE)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/upload-video/", self.base_url))
            .query(&[("user_id", owner_id)])
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Map the response to an acknowledgment or a structured rejection.
    async fn parse_response(response: reqwest::Response) -> Result<UploadAccepted, UploadError> {
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<UploadErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail)
                .unwrap_or_else(|| "the server rejected the upload".to_string());
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response.json::<UploadAccepted>().await?)
    }
}

/// Result of one submission attempt, as seen by the caller.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Rejected locally; no network call was made and no job exists.
    Rejected(ValidationError),
    /// Acknowledged by the server; a job is awaiting processing.
    Accepted { job_id: String },
    /// The upload failed; a `Failed` job records the attempt.
    Failed { job_id: String, message: String },
}

/// Gates, submits, registers, and notifies for each upload.
pub struct UploadCoordinator {
    api: UploadApi,
    store: Arc<JobStatusStore>,
    notifications: Arc<Mutex<NotificationQueue>>,
    owner_id: String,
}

impl UploadCoordinator {
    /// `owner_id` of `None` falls back to [`DEFAULT_OWNER_ID`].
    pub fn new(
        api: UploadApi,
        store: Arc<JobStatusStore>,
        notifications: Arc<Mutex<NotificationQueue>>,
        owner_id: Option<String>,
    ) -> Self {
        Self {
            api,
            store,
            notifications,
            owner_id: owner_id.unwrap_or_else(|| DEFAULT_OWNER_ID.to_string()),
        }
    }

    /// Submit one file: validate, upload, register the outcome, notify.
    ///
    /// Validation rejections never reach the network and never create a
    /// job; they surface only through the notification queue.
    pub async fn submit(&self, file: UploadFile, bytes: Vec<u8>) -> SubmitOutcome {
        if let Err(rejection) = validate_upload(&file) {
            tracing::info!(
                file_name = %file.file_name,
                reason = %rejection,
                "Upload rejected locally",
            );
            self.notify(Notification::error(rejection.to_string())).await;
            return SubmitOutcome::Rejected(rejection);
        }

        match self
            .api
            .upload(&file.file_name, bytes, &self.owner_id)
            .await
        {
            Ok(accepted) => {
                self.store
                    .register_uploading(&accepted.video_id, &file.file_name)
                    .await;
                self.notify(Notification::info(format!(
                    "File {} uploaded successfully, processing started",
                    file.file_name
                )))
                .await;
                SubmitOutcome::Accepted {
                    job_id: accepted.video_id,
                }
            }
            Err(e) => {
                tracing::warn!(file_name = %file.file_name, error = %e, "Upload failed");
                let message = e.user_message();
                let job_id = self.store.register_failed(&file.file_name, &message).await;
                self.notify(Notification::error(message.clone())).await;
                SubmitOutcome::Failed { job_id, message }
            }
        }
    }

    async fn notify(&self, notification: Notification) {
        self.notifications.lock().await.show(notification);
    }
}
