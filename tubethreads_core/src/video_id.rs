//! Video ID extraction from canonical watch URLs.
//!
//! Only the `youtube.com/watch?v=<id>` form is recognised. Short links
//! (`youtu.be/...`) and embed URLs are not supported, and the scheme and host
//! are not validated beyond what the pattern itself requires.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static WATCH_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.)?youtube\.com/watch\?v=(?P<video_id>[-_A-Za-z0-9]{11})")
        .unwrap()
});

static BARE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-_A-Za-z0-9]{11}$").unwrap());

/// An 11-character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Accepts a bare identifier. Returns `None` unless it is exactly 11
    /// characters from `[-_A-Za-z0-9]`.
    pub fn new(raw: &str) -> Option<Self> {
        if BARE_ID_RE.is_match(raw) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Pull the video ID out of a watch URL.
///
/// Absence is a recoverable condition: callers turn `None` into an
/// invalid-request signal at their own boundary.
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    let caps = WATCH_URL_RE.captures(url.trim())?;
    let id = caps.name("video_id")?.as_str();
    tracing::info!(video_id = id, "Extracted video ID");
    Some(VideoId(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_canonical_urls() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://youtube.com/watch?v=dQw4w9WgXcQ",
            "www.youtube.com/watch?v=dQw4w9WgXcQ",
            "youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
        ] {
            let id = extract_video_id(url).unwrap();
            assert_eq!(id.as_str(), "dQw4w9WgXcQ", "url: {url}");
        }
    }

    #[test]
    fn keeps_dashes_and_underscores() {
        let id = extract_video_id("https://www.youtube.com/watch?v=a-b_c-d_e-f").unwrap();
        assert_eq!(id.as_str(), "a-b_c-d_e-f");
    }

    #[test]
    fn rejects_other_forms() {
        assert!(extract_video_id("https://youtu.be/dQw4w9WgXcQ").is_none());
        assert!(extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ").is_none());
        assert!(extract_video_id("https://www.youtube.com/watch?v=short").is_none());
        assert!(extract_video_id("https://vimeo.com/watch?v=dQw4w9WgXcQ").is_none());
        assert!(extract_video_id("").is_none());
    }

    #[test]
    fn bare_id_validation() {
        assert!(VideoId::new("dQw4w9WgXcQ").is_some());
        assert!(VideoId::new("dQw4w9WgXc").is_none());
        assert!(VideoId::new("dQw4w9WgXcQQ").is_none());
        assert!(VideoId::new("dQw4w9WgX!Q").is_none());
    }

    #[test]
    fn watch_url_round_trips() {
        let id = VideoId::new("dQw4w9WgXcQ").unwrap();
        assert_eq!(extract_video_id(&id.watch_url()), Some(id));
    }
}
