//! Event-channel lifecycle handle.
//!
//! [`EventChannel`] owns the single persistent subscription for a
//! dashboard session.  It spawns one connection task
//! (connect -> process frames -> bounded reconnect) and fans decoded
//! events out via a [`tokio::sync::broadcast`] channel.  Call
//! [`EventChannel::subscribe`] to receive them and
//! [`EventChannel::close`] to tear the subscription down; no event is
//! delivered after `close` resolves.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;

use crate::client::ChannelClient;
use crate::events::ChannelEvent;
use crate::processor::process_frames;
use crate::reconnect::{reconnect_loop, ReconnectConfig};

/// Broadcast channel capacity for decoded events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// How long `close` waits for the connection task to exit.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for one event-channel session.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// WebSocket URL of the push-event source.
    pub ws_url: String,
    /// Reconnection tuning.
    pub reconnect: ReconnectConfig,
}

/// The dashboard session's subscription to the push-event source.
///
/// A restartable resource: dropping or closing one channel and starting
/// another is the supported way to re-establish the subscription.
pub struct EventChannel {
    event_tx: broadcast::Sender<ChannelEvent>,
    cancel: CancellationToken,
    task_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl EventChannel {
    /// Open the subscription and start the connection task.
    ///
    /// Returns a shared handle; the task runs until [`close`](Self::close)
    /// or until the reconnect budget is exhausted.
    pub fn start(config: ChannelConfig) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();

        let client = ChannelClient::new(config.ws_url);
        let task_tx = event_tx.clone();
        let task_cancel = cancel.clone();

        let task_handle = tokio::spawn(async move {
            tracing::info!("Starting event-channel connection task");
            run_connection_loop(&client, &config.reconnect, &task_tx, &task_cancel).await;
            tracing::info!("Event-channel connection task exited");
        });

        Arc::new(Self {
            event_tx,
            cancel,
            task_handle: Mutex::new(Some(task_handle)),
        })
    }

    /// Subscribe to decoded channel events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.event_tx.subscribe()
    }

    /// Close the subscription and release the underlying connection.
    ///
    /// Deterministic: cancels the connection task, then waits (bounded)
    /// for it to exit, so no handler fires afterwards.
    pub async fn close(&self) {
        tracing::info!("Closing event channel");
        self.cancel.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            let _ = tokio::time::timeout(CLOSE_TIMEOUT, handle).await;
        }
    }
}

/// Core connection loop: connect -> process frames -> reconnect.
///
/// Runs until the cancellation token is triggered or the reconnect
/// budget runs out.
async fn run_connection_loop(
    client: &ChannelClient,
    reconnect_config: &ReconnectConfig,
    event_tx: &broadcast::Sender<ChannelEvent>,
    cancel: &CancellationToken,
) {
    // Initial connection, falling into the reconnect loop on failure.
    // Raced against cancellation so a stalled handshake cannot outlive
    // `close`.
    let mut conn = tokio::select! {
        _ = cancel.cancelled() => return,
        result = client.connect() => match result {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "Connection failed, entering reconnect loop");
                match reconnect_loop(client, reconnect_config, cancel).await {
                    Some(conn) => conn,
                    None => {
                        let _ = event_tx.send(ChannelEvent::Disconnected);
                        return;
                    }
                }
            }
        }
    };

    loop {
        let _ = event_tx.send(ChannelEvent::Connected);

        // Process frames until the connection drops or the session closes.
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = process_frames(&mut conn.ws_stream, event_tx) => {}
        }

        let _ = event_tx.send(ChannelEvent::Disconnected);

        if cancel.is_cancelled() {
            return;
        }

        tracing::info!("Connection lost, entering reconnect loop");
        match reconnect_loop(client, reconnect_config, cancel).await {
            Some(new_conn) => conn = new_conn,
            None => return,
        }
    }
}
