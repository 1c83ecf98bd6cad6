//! Generation records as returned by the vendor API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a generation job.
///
/// The vendor reports states as strings and the set is not closed;
/// anything unrecognized deserializes to [`GenerationState::Unknown`]
/// so listing never fails on a new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationState {
    /// Queued, not yet picked up.
    Pending,
    /// Actively rendering.
    Processing,
    /// Finished with a video.
    Completed,
    /// Terminal failure.
    Failed,
    /// Any state string this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl GenerationState {
    /// Whether the job can still change state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationState::Completed | GenerationState::Failed)
    }
}

impl std::fmt::Display for GenerationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GenerationState::Pending => "pending",
            GenerationState::Processing => "processing",
            GenerationState::Completed => "completed",
            GenerationState::Failed => "failed",
            GenerationState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Rendered video asset, present once a generation completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// Direct URL to the video file.
    pub url: String,
    /// Width in pixels.
    #[serde(default)]
    pub width: Option<u32>,
    /// Height in pixels.
    #[serde(default)]
    pub height: Option<u32>,
    /// Thumbnail image URL.
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// One video-generation job as reported by the vendor.
///
/// Immutable value object; a fresh one is parsed from every list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationItem {
    /// Vendor-assigned unique id.
    pub id: String,
    /// The prompt the job was submitted with.
    pub prompt: String,
    /// Current lifecycle state.
    pub state: GenerationState,
    /// When the vendor created the job.
    pub created_at: DateTime<Utc>,
    /// Rendered video, once available.
    #[serde(default)]
    pub video: Option<Video>,
    /// Whether the user liked the result.
    #[serde(default)]
    pub liked: Option<bool>,
    /// Vendor's queue-time estimate, in seconds.
    #[serde(default)]
    pub estimate_wait_seconds: Option<u64>,
}

impl GenerationItem {
    /// URL of the finished video, if the item carries a non-empty one.
    pub fn completed_video_url(&self) -> Option<&str> {
        self.video
            .as_ref()
            .map(|v| v.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_parses_known_strings() {
        let state: GenerationState = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(state, GenerationState::Completed);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_state_unknown_string_does_not_fail() {
        let state: GenerationState = serde_json::from_str("\"dreaming\"").unwrap();
        assert_eq!(state, GenerationState::Unknown);
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_item_parses_vendor_payload() {
        let json = r#"{
            "id": "gen-123",
            "prompt": "a cat",
            "state": "completed",
            "created_at": "2024-03-01T12:00:00.123456Z",
            "video": {"url": "https://x/y.mp4", "width": 1280, "height": 720, "thumbnail": null},
            "liked": null,
            "estimate_wait_seconds": 30
        }"#;

        let item: GenerationItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "gen-123");
        assert_eq!(item.completed_video_url(), Some("https://x/y.mp4"));
        assert_eq!(item.estimate_wait_seconds, Some(30));
    }

    #[test]
    fn test_item_without_video_has_no_completed_url() {
        let json = r#"{
            "id": "gen-456",
            "prompt": "a dog",
            "state": "pending",
            "created_at": "2024-03-01T12:00:00.000000Z"
        }"#;

        let item: GenerationItem = serde_json::from_str(json).unwrap();
        assert!(item.video.is_none());
        assert_eq!(item.completed_video_url(), None);
    }

    #[test]
    fn test_empty_video_url_is_not_completed() {
        let item = GenerationItem {
            id: "gen-789".to_string(),
            prompt: "a bird".to_string(),
            state: GenerationState::Processing,
            created_at: Utc::now(),
            video: Some(Video {
                url: String::new(),
                width: None,
                height: None,
                thumbnail: None,
            }),
            liked: None,
            estimate_wait_seconds: None,
        };
        assert_eq!(item.completed_video_url(), None);
    }
}
