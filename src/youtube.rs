use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::{Result, bail};
use log::debug;
use serde::{Deserialize, Serialize};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// A single subtitle stream attached to a video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    pub id: String,
    pub language: String,
}

/// One search hit with its statistics
#[derive(Debug, Clone, Serialize)]
pub struct VideoRecord {
    pub title: String,
    pub video_url: String,
    pub video_id: Option<String>,
    pub channel_id: String,
    pub channel_title: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub duration_secs: u64,
    pub published_at: DateTime<Utc>,
    pub thumbnail: Option<String>,
}

/// Caption listing and download
#[async_trait]
pub trait CaptionService: Send + Sync {
    async fn list_captions(&self, video_id: &str) -> Result<Vec<CaptionTrack>>;

    /// Raw SRT bytes for a caption track
    async fn download_caption(&self, track_id: &str) -> Result<Vec<u8>>;
}

/// Keyword search over videos, with per-video statistics
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search_videos(&self, keyword: &str, max_results: u32) -> Result<Vec<VideoRecord>>;
}

/// YouTube Data API v3 client
#[derive(Clone)]
pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// Build a client from YOUTUBE_API_KEY, if set
    pub fn from_env(client: reqwest::Client) -> Option<Self> {
        std::env::var("YOUTUBE_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(|k| Self::new(client, k))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{API_BASE}/{path}");
        debug!("GET {url} {query:?}");

        let resp = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("YouTube API returned {status}: {body}");
        }

        Ok(resp.json().await?)
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct CaptionItem {
    id: String,
    snippet: CaptionSnippet,
}

#[derive(Debug, Deserialize)]
struct CaptionSnippet {
    language: String,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
}

#[derive(Debug, Deserialize)]
struct SearchId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
    #[serde(rename = "contentDetails")]
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    title: String,
    #[serde(rename = "channelId")]
    channel_id: String,
    #[serde(rename = "channelTitle")]
    channel_title: String,
    #[serde(rename = "publishedAt")]
    published_at: DateTime<Utc>,
    #[serde(default)]
    thumbnails: std::collections::HashMap<String, Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

// The API returns counters as strings and omits hidden ones
#[derive(Debug, Default, Deserialize)]
struct VideoStatistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
    #[serde(rename = "commentCount")]
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

fn parse_count(value: Option<&str>) -> u64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0)
}

/// Parse an ISO-8601 duration such as `PT1H2M3S` into seconds
pub fn parse_iso8601_duration(duration: &str) -> u64 {
    let mut seconds = 0;
    let mut current = String::new();
    let mut in_time = false;

    for c in duration.chars() {
        if c.is_ascii_digit() {
            current.push(c);
            continue;
        }
        if let Ok(n) = current.parse::<u64>() {
            let unit = match c {
                'D' => 86_400,
                'H' => 3600,
                'M' if in_time => 60,
                'S' => 1,
                _ => 0,
            };
            seconds = n.saturating_mul(unit).saturating_add(seconds);
        }
        if c == 'T' {
            in_time = true;
        }
        current.clear();
    }

    seconds
}

impl VideoItem {
    fn into_record(self) -> VideoRecord {
        let thumbnail = ["high", "medium", "default"]
            .iter()
            .find_map(|k| self.snippet.thumbnails.get(*k))
            .map(|t| t.url.clone());

        VideoRecord {
            video_url: format!("https://www.youtube.com/watch?v={}", self.id),
            video_id: None,
            title: self.snippet.title,
            channel_id: self.snippet.channel_id,
            channel_title: self.snippet.channel_title,
            views: parse_count(self.statistics.view_count.as_deref()),
            likes: parse_count(self.statistics.like_count.as_deref()),
            comments: parse_count(self.statistics.comment_count.as_deref()),
            duration_secs: self
                .content_details
                .map(|c| parse_iso8601_duration(&c.duration))
                .unwrap_or(0),
            published_at: self.snippet.published_at,
            thumbnail,
        }
    }
}

#[async_trait]
impl CaptionService for YouTubeClient {
    async fn list_captions(&self, video_id: &str) -> Result<Vec<CaptionTrack>> {
        let resp: ListResponse<CaptionItem> = self
            .get_json("captions", &[("part", "snippet"), ("videoId", video_id)])
            .await?;

        Ok(resp
            .items
            .into_iter()
            .map(|item| CaptionTrack {
                id: item.id,
                language: item.snippet.language,
            })
            .collect())
    }

    async fn download_caption(&self, track_id: &str) -> Result<Vec<u8>> {
        let url = format!("{API_BASE}/captions/{track_id}");
        debug!("Downloading caption track {track_id}");

        let bytes = self
            .client
            .get(&url)
            .query(&[("tfmt", "srt"), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn search_videos(&self, keyword: &str, max_results: u32) -> Result<Vec<VideoRecord>> {
        let max = max_results.to_string();
        let search: ListResponse<SearchItem> = self
            .get_json(
                "search",
                &[("part", "id"), ("type", "video"), ("q", keyword), ("maxResults", max.as_str())],
            )
            .await?;

        let ids: Vec<String> = search.items.into_iter().filter_map(|i| i.id.video_id).collect();
        debug!("Search for {keyword:?} returned {} video ids", ids.len());
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids.join(",");
        let videos: ListResponse<VideoItem> = self
            .get_json(
                "videos",
                &[("part", "snippet,statistics,contentDetails"), ("id", joined.as_str())],
            )
            .await?;

        Ok(videos.items.into_iter().map(VideoItem::into_record).collect())
    }
}
