//! Download-target resolution.
//!
//! Turns a raw [`CompletionEvent`] into the ordered set of named links the
//! dashboard renders.  Per resolution label a direct link wins; a raw
//! storage identifier is otherwise joined to the configured download
//! service.  Labels with neither are omitted.  Total: absence of data
//! yields an empty result, never an error.

use crate::event::CompletionEvent;
use crate::job::{DownloadTarget, TranscriptTarget};

/// Plain-text transcript format label.
pub const TRANSCRIPT_FORMAT_TXT: &str = "txt";
/// Timed-caption (SRT) transcript format label.
pub const TRANSCRIPT_FORMAT_SRT: &str = "srt";

/// Origin of the download service used to synthesize URLs from raw
/// storage identifiers, e.g. `http://localhost:8002`.
#[derive(Debug, Clone)]
pub struct DownloadBase(String);

impl DownloadBase {
    /// Wrap a service origin, stripping any trailing slash.
    pub fn new(origin: impl Into<String>) -> Self {
        let origin = origin.into();
        Self(origin.trim_end_matches('/').to_string())
    }

    /// Synthesize a download URL for a raw storage identifier.
    pub fn url_for(&self, file_id: &str) -> String {
        format!("{}/download/{file_id}", self.0)
    }
}

/// The uniform download surface derived from one completion event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTargets {
    pub downloads: Vec<DownloadTarget>,
    pub transcripts: Vec<TranscriptTarget>,
}

/// Resolve a completion event into render-ready download targets.
///
/// Resolution labels come out in lexicographic order; transcripts list
/// `txt` before `srt`.
pub fn resolve_targets(event: &CompletionEvent, base: &DownloadBase) -> ResolvedTargets {
    let mut downloads = Vec::new();

    // Union of labels from both maps, deduplicated by BTreeMap ordering.
    let labels = event
        .download_links
        .keys()
        .chain(event.resolutions.keys())
        .collect::<std::collections::BTreeSet<_>>();

    for label in labels {
        if let Some(url) = resolve_one(
            event.download_links.get(label).map(String::as_str),
            event.resolutions.get(label).map(String::as_str),
            base,
        ) {
            downloads.push(DownloadTarget {
                label: label.clone(),
                url,
            });
        }
    }

    let mut transcripts = Vec::new();
    if let Some(url) = resolve_one(
        event.download_transcript_txt.as_deref(),
        event.transcript_file_id.as_deref(),
        base,
    ) {
        transcripts.push(TranscriptTarget {
            format: TRANSCRIPT_FORMAT_TXT.to_string(),
            url,
        });
    }
    // SRT is only ever published as a direct link.
    if let Some(url) = non_empty(event.download_transcript_srt.as_deref()) {
        transcripts.push(TranscriptTarget {
            format: TRANSCRIPT_FORMAT_SRT.to_string(),
            url: url.to_string(),
        });
    }

    ResolvedTargets {
        downloads,
        transcripts,
    }
}

/// Dual-path resolution for a single target: direct link wins, raw
/// identifier synthesizes a URL, nothing yields `None`.
fn resolve_one(direct: Option<&str>, file_id: Option<&str>, base: &DownloadBase) -> Option<String> {
    if let Some(url) = non_empty(direct) {
        return Some(url.to_string());
    }
    non_empty(file_id).map(|id| base.url_for(id))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> DownloadBase {
        DownloadBase::new("http://dl.local")
    }

    fn event_with(json: serde_json::Value) -> CompletionEvent {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn raw_identifier_synthesizes_url() {
        let event = event_with(serde_json::json!({
            "video_id": "v1",
            "resolutions": {"720p": "f1"},
        }));
        let resolved = resolve_targets(&event, &base());
        assert_eq!(
            resolved.downloads,
            vec![DownloadTarget {
                label: "720p".into(),
                url: "http://dl.local/download/f1".into(),
            }]
        );
    }

    #[test]
    fn direct_link_wins_over_raw_identifier() {
        let event = event_with(serde_json::json!({
            "video_id": "v1",
            "resolutions": {"720p": "f1"},
            "download_links": {"720p": "http://cdn/direct-720p"},
        }));
        let resolved = resolve_targets(&event, &base());
        assert_eq!(resolved.downloads[0].url, "http://cdn/direct-720p");
        assert_eq!(resolved.downloads.len(), 1);
    }

    #[test]
    fn empty_identifier_is_omitted() {
        let event = event_with(serde_json::json!({
            "video_id": "v1",
            "resolutions": {"480p": "", "720p": "f1"},
        }));
        let resolved = resolve_targets(&event, &base());
        assert_eq!(resolved.downloads.len(), 1);
        assert_eq!(resolved.downloads[0].label, "720p");
    }

    #[test]
    fn labels_are_ordered_lexicographically() {
        let event = event_with(serde_json::json!({
            "video_id": "v1",
            "resolutions": {"720p": "a", "1080p": "b", "480p": "c"},
        }));
        let resolved = resolve_targets(&event, &base());
        let labels: Vec<&str> = resolved
            .downloads
            .iter()
            .map(|t| t.label.as_str())
            .collect();
        assert_eq!(labels, vec!["1080p", "480p", "720p"]);
    }

    #[test]
    fn transcript_file_id_resolves_to_txt_target() {
        let event = event_with(serde_json::json!({
            "video_id": "v1",
            "transcript_file_id": "t1",
        }));
        let resolved = resolve_targets(&event, &base());
        assert_eq!(
            resolved.transcripts,
            vec![TranscriptTarget {
                format: "txt".into(),
                url: "http://dl.local/download/t1".into(),
            }]
        );
    }

    #[test]
    fn direct_transcript_links_win_and_keep_format_order() {
        let event = event_with(serde_json::json!({
            "video_id": "v1",
            "transcript_file_id": "t1",
            "download_transcript_txt": "http://cdn/t.txt",
            "download_transcript_srt": "http://cdn/t.srt",
        }));
        let resolved = resolve_targets(&event, &base());
        let formats: Vec<&str> = resolved
            .transcripts
            .iter()
            .map(|t| t.format.as_str())
            .collect();
        assert_eq!(formats, vec!["txt", "srt"]);
        assert_eq!(resolved.transcripts[0].url, "http://cdn/t.txt");
        assert_eq!(resolved.transcripts[1].url, "http://cdn/t.srt");
    }

    #[test]
    fn empty_event_resolves_to_empty_surface() {
        let event = event_with(serde_json::json!({"video_id": "v1"}));
        assert_eq!(resolve_targets(&event, &base()), ResolvedTargets::default());
    }

    #[test]
    fn base_trailing_slash_is_normalized() {
        assert_eq!(
            DownloadBase::new("http://dl.local/").url_for("f1"),
            "http://dl.local/download/f1"
        );
    }
}
