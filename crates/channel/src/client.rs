//! WebSocket client for the push-event source.
//!
//! [`ChannelClient`] holds the connection configuration for the
//! dashboard's single event subscription.  Call
//! [`ChannelClient::connect`] to establish a live [`ChannelConnection`].

use tokio_tungstenite::{connect_async, MaybeTlsStream};

/// Configuration handle for the push-event source.
pub struct ChannelClient {
    ws_url: String,
}

/// A live WebSocket subscription to the push-event source.
pub struct ChannelConnection {
    /// Unique client ID sent during the WebSocket handshake.
    pub client_id: String,
    /// The raw WebSocket stream for reading frames.
    pub ws_stream: tokio_tungstenite::WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl ChannelClient {
    /// Create a new client targeting the event source.
    ///
    /// * `ws_url` - WebSocket base URL, e.g. `ws://host:8001/ws`.
    pub fn new(ws_url: String) -> Self {
        Self { ws_url }
    }

    /// WebSocket base URL.
    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    /// Connect to the push-event WebSocket endpoint.
    ///
    /// Generates a unique `client_id` (UUID v4) and appends it as a
    /// query parameter so the event source can address this session.
    pub async fn connect(&self) -> Result<ChannelConnection, ChannelError> {
        let client_id = uuid::Uuid::new_v4().to_string();
        let url = format!("{}?client_id={}", self.ws_url, client_id);

        let (ws_stream, _response) = connect_async(&url).await.map_err(|e| {
            ChannelError::Connection(format!(
                "Failed to connect to event source at {}: {e}",
                self.ws_url
            ))
        })?;

        tracing::info!(
            client_id = %client_id,
            "Connected to event source at {}",
            self.ws_url,
        );

        Ok(ChannelConnection {
            client_id,
            ws_stream,
        })
    }
}

/// Errors that can occur when working with the event channel.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Failed to establish the WebSocket connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A protocol-level error on an already-established connection.
    #[error("Protocol error: {0}")]
    Protocol(String),
}
