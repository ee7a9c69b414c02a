pub mod analyzer;
pub mod completion;
pub mod config;
pub mod output;
pub mod pages;
pub mod report;
pub mod sections;
pub mod server;
pub mod transcript;
pub mod youtube;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// A video the user can ask to have analyzed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoReference {
    pub video_id: String,
    pub title: String,
}

impl VideoReference {
    /// Build a reference from any supported YouTube URL shape
    pub fn from_url(url: &str, title: impl Into<String>) -> Option<Self> {
        extract_video_id(url).map(|video_id| Self {
            video_id,
            title: title.into(),
        })
    }
}

const VIDEO_ID_LEN: usize = 11;

// Order matters: the first pattern yielding an 11-character id wins.
static VIDEO_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"watch\?v=([^&]+)", // youtube.com/watch?v=ID
        r"youtu\.be/([^?]+)", // youtu.be/ID
        r"embed/([^?]+)",    // youtube.com/embed/ID
        r"v/([^?]+)",        // youtube.com/v/ID
    ]
    .iter()
    .map(|p| Regex::new(p).expect("video id pattern is valid"))
    .collect()
});

/// Extract video ID from various YouTube URL formats
pub fn extract_video_id(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }

    VIDEO_ID_PATTERNS.iter().find_map(|re| {
        let id = re.captures(url)?.get(1)?.as_str();
        (id.chars().count() == VIDEO_ID_LEN).then(|| id.to_string())
    })
}

/// Accept either a supported URL or a bare 11-character video ID
pub fn parse_video_input(input: &str) -> Option<String> {
    let input = input.trim();
    extract_video_id(input).or_else(|| {
        (input.len() == VIDEO_ID_LEN
            && input
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .then(|| input.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=5s"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abc"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_v_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/v/dQw4w9WgXcQ?version=3"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_wrong_length_keeps_trying() {
        // watch?v= captures "abc", which is rejected; the v/ pattern still matches
        assert_eq!(
            extract_video_id("https://example.com/v/dQw4w9WgXcQ?next=watch?v=abc"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_wrong_length_id() {
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXc"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQQ"), None);
    }

    #[test]
    fn test_foreign_url() {
        assert_eq!(extract_video_id("https://vimeo.com/123456789"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"), None);
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("not a url at all"), None);
        assert_eq!(extract_video_id("watch?v="), None);
        assert_eq!(extract_video_id("\u{1F3AF}\u{1F680}"), None);
    }

    #[test]
    fn test_video_reference_from_url() {
        let r = VideoReference::from_url("https://youtu.be/dQw4w9WgXcQ", "Never Gonna").unwrap();
        assert_eq!(r.video_id, "dQw4w9WgXcQ");
        assert_eq!(r.title, "Never Gonna");
        assert!(VideoReference::from_url("https://example.com", "x").is_none());
    }

    #[test]
    fn test_parse_video_input() {
        assert_eq!(parse_video_input("  dQw4w9WgXcQ  "), Some("dQw4w9WgXcQ".to_string()));
        assert_eq!(
            parse_video_input("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(parse_video_input("dQw4w9WgXc!"), None);
        assert_eq!(parse_video_input("short"), None);
    }
}
