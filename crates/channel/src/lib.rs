//! Push-event channel for the vidboard dashboard.
//!
//! Owns the single long-lived WebSocket subscription that carries
//! completion notifications from the processing pipeline: typed frame
//! parsing, the read loop, bounded-retry reconnection, and a lifecycle
//! handle with publish/subscribe fan-out.  This crate decodes frames; it
//! does not interpret event semantics.

pub mod channel;
pub mod client;
pub mod events;
pub mod messages;
pub mod processor;
pub mod reconnect;

pub use channel::{ChannelConfig, EventChannel};
pub use client::{ChannelClient, ChannelError};
pub use events::ChannelEvent;
pub use reconnect::ReconnectConfig;
