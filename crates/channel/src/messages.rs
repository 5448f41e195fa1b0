//! Push-frame parsing.
//!
//! The event source sends JSON text frames shaped like
//! `{"event": "<kind>", "video_id": ..., ...}`.  Only `video_processed`
//! carries semantics the dashboard acts on; every other kind is
//! tolerated and reported as [`PushMessage::Unrecognized`] so the read
//! loop can skip it without treating it as an error.

use serde::Deserialize;
use vidboard_core::CompletionEvent;

/// The only frame kind the dashboard currently interprets.
pub const EVENT_VIDEO_PROCESSED: &str = "video_processed";

/// Envelope used to peel off the `event` tag before interpreting the
/// remaining fields.
#[derive(Debug, Deserialize)]
struct RawFrame {
    event: String,
    #[serde(flatten)]
    rest: serde_json::Value,
}

/// A decoded push frame.
#[derive(Debug, Clone)]
pub enum PushMessage {
    /// A completion notification for one job.
    VideoProcessed(CompletionEvent),

    /// A syntactically valid frame of a kind this dashboard ignores.
    Unrecognized { kind: String },
}

/// Parse a text frame into a typed [`PushMessage`].
///
/// Returns `Err` only for malformed JSON or a recognized kind whose
/// payload does not match its schema.  Unknown kinds are `Ok`.
pub fn parse_frame(text: &str) -> Result<PushMessage, serde_json::Error> {
    let raw: RawFrame = serde_json::from_str(text)?;
    match raw.event.as_str() {
        EVENT_VIDEO_PROCESSED => Ok(PushMessage::VideoProcessed(serde_json::from_value(
            raw.rest,
        )?)),
        _ => Ok(PushMessage::Unrecognized { kind: raw.event }),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_video_processed_frame() {
        let json = r#"{
            "event": "video_processed",
            "video_id": "v1",
            "message": "All resolutions ready",
            "resolutions": {"480p": "f480", "720p": "f720"},
            "download_links": {"720p": "http://cdn/720p.mp4"},
            "transcript_file_id": "t1"
        }"#;
        let msg = parse_frame(json).unwrap();
        match msg {
            PushMessage::VideoProcessed(event) => {
                assert_eq!(event.video_id, "v1");
                assert_eq!(event.message.as_deref(), Some("All resolutions ready"));
                assert_eq!(event.resolutions["480p"], "f480");
                assert_eq!(event.download_links["720p"], "http://cdn/720p.mp4");
                assert_eq!(event.transcript_file_id.as_deref(), Some("t1"));
                assert!(event.download_transcript_srt.is_none());
            }
            other => panic!("Expected VideoProcessed, got {other:?}"),
        }
    }

    #[test]
    fn parse_minimal_video_processed_frame() {
        let json = r#"{"event":"video_processed","video_id":"v2"}"#;
        let msg = parse_frame(json).unwrap();
        assert_matches!(msg, PushMessage::VideoProcessed(event) if event.video_id == "v2");
    }

    #[test]
    fn unknown_kind_is_tolerated() {
        let json = r#"{"event":"heartbeat","uptime_secs":42}"#;
        let msg = parse_frame(json).unwrap();
        assert_matches!(msg, PushMessage::Unrecognized { kind } if kind == "heartbeat");
    }

    #[test]
    fn malformed_json_returns_error() {
        assert!(parse_frame("not json at all").is_err());
    }

    #[test]
    fn missing_event_tag_returns_error() {
        assert!(parse_frame(r#"{"video_id":"v1"}"#).is_err());
    }

    #[test]
    fn video_processed_without_id_returns_error() {
        assert!(parse_frame(r#"{"event":"video_processed","message":"hi"}"#).is_err());
    }
}
