//! Dashboard session wiring.
//!
//! [`DashboardSession`] assembles the store, the notification queue, the
//! upload coordinator, and the event channel for one dashboard
//! lifetime, and runs the forwarding task that feeds channel events
//! into the store.  Closing the session tears the channel down first,
//! then the forwarder, so no job mutation happens afterwards; upload
//! responses that land late are absorbed by the store's merge rules.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;
use vidboard_channel::{ChannelConfig, ChannelEvent, EventChannel, ReconnectConfig};
use vidboard_core::notify::NotificationQueue;
use vidboard_core::resolver::DownloadBase;

use crate::config::DashboardConfig;
use crate::store::JobStatusStore;
use crate::upload::{UploadApi, UploadCoordinator};

/// How long `close` waits for the forwarding task to exit.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// One dashboard lifetime: store, uploads, notifications, event channel.
pub struct DashboardSession {
    store: Arc<JobStatusStore>,
    notifications: Arc<Mutex<NotificationQueue>>,
    uploads: UploadCoordinator,
    channel: Arc<EventChannel>,
    cancel: CancellationToken,
    forward_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl DashboardSession {
    /// Build the session and open the push-event subscription.
    pub fn start(config: DashboardConfig) -> Arc<Self> {
        let store = Arc::new(JobStatusStore::new(DownloadBase::new(
            config.download_base_url.clone(),
        )));
        let notifications = Arc::new(Mutex::new(NotificationQueue::new()));

        let uploads = UploadCoordinator::new(
            UploadApi::new(config.upload_url.clone()),
            Arc::clone(&store),
            Arc::clone(&notifications),
            config.user_id.clone(),
        );

        let channel = EventChannel::start(ChannelConfig {
            ws_url: config.channel_ws_url.clone(),
            reconnect: ReconnectConfig {
                max_attempts: config.reconnect_max_attempts,
                ..ReconnectConfig::default()
            },
        });

        let cancel = CancellationToken::new();
        let forward_handle = tokio::spawn(forward_events(
            Arc::clone(&store),
            channel.subscribe(),
            cancel.clone(),
        ));

        Arc::new(Self {
            store,
            notifications,
            uploads,
            channel,
            cancel,
            forward_handle: Mutex::new(Some(forward_handle)),
        })
    }

    /// The authoritative job store. Rendering observes it via
    /// [`JobStatusStore::snapshot`] and [`JobStatusStore::subscribe`].
    pub fn store(&self) -> &Arc<JobStatusStore> {
        &self.store
    }

    /// The upload coordinator for this session.
    pub fn uploads(&self) -> &UploadCoordinator {
        &self.uploads
    }

    /// The user-facing notification queue.
    pub fn notifications(&self) -> &Arc<Mutex<NotificationQueue>> {
        &self.notifications
    }

    /// Tear down the session: close the channel, stop the forwarder.
    ///
    /// Deterministic on all exit paths; call it when the dashboard
    /// becomes inactive, including abnormal navigation away.
    pub async fn close(&self) {
        self.channel.close().await;
        self.cancel.cancel();

        if let Some(handle) = self.forward_handle.lock().await.take() {
            let _ = tokio::time::timeout(CLOSE_TIMEOUT, handle).await;
        }
        tracing::info!("Dashboard session closed");
    }
}

/// Feed channel events into the store until cancellation.
async fn forward_events(
    store: Arc<JobStatusStore>,
    mut receiver: broadcast::Receiver<ChannelEvent>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Event forwarder cancelled");
                return;
            }
            event = receiver.recv() => match event {
                Ok(ChannelEvent::Completion(completion)) => {
                    store.apply_event(&completion).await;
                }
                Ok(ChannelEvent::Connected) => {
                    tracing::info!("Event channel connected");
                }
                Ok(ChannelEvent::Disconnected) => {
                    tracing::warn!("Event channel disconnected");
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event forwarder lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event channel dropped, forwarder shutting down");
                    return;
                }
            },
        }
    }
}
