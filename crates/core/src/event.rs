//! Completion-event payload emitted by the processing pipeline.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Decoded payload of a `video_processed` push frame.
///
/// Resolution maps use [`BTreeMap`] so that iteration (and therefore the
/// resolved target order) is deterministic regardless of how the server
/// serialized its JSON object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionEvent {
    /// Server-assigned job identifier.
    pub video_id: String,

    /// Human-readable status text from the pipeline.
    #[serde(default)]
    pub message: Option<String>,

    /// Resolution label → raw storage identifier.
    #[serde(default)]
    pub resolutions: BTreeMap<String, String>,

    /// Resolution label → direct download URL. Wins over `resolutions`
    /// for the same label.
    #[serde(default)]
    pub download_links: BTreeMap<String, String>,

    /// Raw storage identifier for the plain-text transcript.
    #[serde(default)]
    pub transcript_file_id: Option<String>,

    /// Direct URL for the plain-text transcript.
    #[serde(default)]
    pub download_transcript_txt: Option<String>,

    /// Direct URL for the timed-caption (SRT) transcript.
    #[serde(default)]
    pub download_transcript_srt: Option<String>,
}

impl CompletionEvent {
    /// Status text to record on the job, falling back to a generic line.
    pub fn message_or_default(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| format!("Video {} processed", self.video_id))
    }
}
