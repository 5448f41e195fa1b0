//! Channel-level events delivered to subscribers.

use vidboard_core::CompletionEvent;

/// What the event channel tells the rest of the dashboard.
///
/// Produced by the read loop and the connection lifecycle; consumed by
/// the session wiring, which feeds completions into the job store.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// The subscription to the push-event source was established.
    Connected,

    /// The subscription dropped. Emitted once per drop, and once more
    /// after reconnection attempts are exhausted.
    Disconnected,

    /// The pipeline reported a job as processed.
    Completion(CompletionEvent),
}
