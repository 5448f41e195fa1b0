//! WebSocket frame processing loop.
//!
//! Reads raw frames from the event-source connection in transport order,
//! parses them via [`parse_frame`], and forwards completion events to
//! the broadcast channel.  A frame that fails to decode is logged and
//! dropped; it never terminates the loop.

use futures::StreamExt;
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::Message;

use crate::events::ChannelEvent;
use crate::messages::{parse_frame, PushMessage};

/// Process frames from the push-event connection.
///
/// Loops until the WebSocket closes, encounters a receive error, or the
/// stream is exhausted.  No reordering or batching: frames reach the
/// broadcast channel in the order the transport delivered them.
pub async fn process_frames(
    ws_stream: &mut tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    event_tx: &broadcast::Sender<ChannelEvent>,
) {
    while let Some(msg_result) = ws_stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                handle_text_frame(&text, event_tx);
            }
            Ok(Message::Binary(_)) => {
                // The event source is text-only; binary frames carry nothing
                // the dashboard understands.
                tracing::trace!("Ignoring binary frame");
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {
                // Handled automatically by tungstenite.
            }
            Ok(Message::Close(frame)) => {
                tracing::info!(?frame, "Event source closed the connection");
                break;
            }
            Ok(Message::Frame(_)) => {}
            Err(e) => {
                tracing::error!(error = %e, "WebSocket receive error");
                break;
            }
        }
    }
}

/// Parse a single text frame and forward it if it carries a completion.
fn handle_text_frame(text: &str, event_tx: &broadcast::Sender<ChannelEvent>) {
    match parse_frame(text) {
        Ok(PushMessage::VideoProcessed(event)) => {
            tracing::info!(video_id = %event.video_id, "Completion event received");
            let _ = event_tx.send(ChannelEvent::Completion(event));
        }
        Ok(PushMessage::Unrecognized { kind }) => {
            tracing::debug!(kind = %kind, "Ignoring unrecognized event kind");
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                raw_frame = %text,
                "Failed to parse push frame, dropping it",
            );
        }
    }
}
