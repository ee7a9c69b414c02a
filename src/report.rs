use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::extract_video_id;
use crate::youtube::VideoRecord;

const SIX_MONTHS_DAYS: i64 = 182;
const ONE_YEAR_DAYS: i64 = 365;

/// Per-channel share of a result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelStat {
    pub channel_title: String,
    pub videos: usize,
    pub total_views: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

/// Aggregate statistics over the videos found for a keyword
#[derive(Debug, Clone, Serialize)]
pub struct SeoReport {
    pub keyword: String,
    pub videos: Vec<VideoRecord>,
    pub avg_views: f64,
    pub avg_likes: f64,
    pub avg_comments: f64,
    pub avg_duration_secs: Option<u64>,
    pub unique_channels: usize,
    pub channel_stats: Vec<ChannelStat>,
    pub last_six_months: Vec<VideoRecord>,
    pub last_year: Vec<VideoRecord>,
    pub older_than_year: Vec<VideoRecord>,
    pub totals: Totals,
    pub analyzable: usize,
}

impl SeoReport {
    /// Build the report, attaching the extracted video id to every record
    pub fn build(keyword: &str, mut videos: Vec<VideoRecord>, now: DateTime<Utc>) -> Self {
        for video in &mut videos {
            video.video_id = extract_video_id(&video.video_url);
        }

        let (last_six_months, last_year, older_than_year) = categorize_by_age(&videos, now);

        Self {
            keyword: keyword.to_string(),
            avg_views: average(&videos, |v| v.views),
            avg_likes: average(&videos, |v| v.likes),
            avg_comments: average(&videos, |v| v.comments),
            avg_duration_secs: average_duration(&videos),
            unique_channels: count_unique_channels(&videos),
            channel_stats: channel_stats(&videos),
            totals: totals(&videos),
            analyzable: videos.iter().filter(|v| v.video_id.is_some()).count(),
            last_six_months,
            last_year,
            older_than_year,
            videos,
        }
    }
}

fn average(videos: &[VideoRecord], field: impl Fn(&VideoRecord) -> u64) -> f64 {
    if videos.is_empty() {
        return 0.0;
    }
    videos.iter().map(|v| field(v) as f64).sum::<f64>() / videos.len() as f64
}

pub fn average_duration(videos: &[VideoRecord]) -> Option<u64> {
    if videos.is_empty() {
        return None;
    }
    Some(videos.iter().map(|v| v.duration_secs).sum::<u64>() / videos.len() as u64)
}

pub fn count_unique_channels(videos: &[VideoRecord]) -> usize {
    videos
        .iter()
        .map(|v| v.channel_id.as_str())
        .collect::<std::collections::HashSet<_>>()
        .len()
}

/// Channels ordered by number of videos, then total views
pub fn channel_stats(videos: &[VideoRecord]) -> Vec<ChannelStat> {
    let mut by_channel: HashMap<&str, ChannelStat> = HashMap::new();
    for v in videos {
        let stat = by_channel.entry(&v.channel_id).or_insert_with(|| ChannelStat {
            channel_title: v.channel_title.clone(),
            videos: 0,
            total_views: 0,
        });
        stat.videos += 1;
        stat.total_views += v.views;
    }

    let mut stats: Vec<ChannelStat> = by_channel.into_values().collect();
    stats.sort_by(|a, b| {
        b.videos
            .cmp(&a.videos)
            .then(b.total_views.cmp(&a.total_views))
            .then_with(|| a.channel_title.cmp(&b.channel_title))
    });
    stats
}

/// Split into published within six months, within a year, and older
pub fn categorize_by_age(
    videos: &[VideoRecord],
    now: DateTime<Utc>,
) -> (Vec<VideoRecord>, Vec<VideoRecord>, Vec<VideoRecord>) {
    let mut recent = Vec::new();
    let mut year = Vec::new();
    let mut older = Vec::new();

    for v in videos {
        let age = (now - v.published_at).num_days();
        match age {
            a if a <= SIX_MONTHS_DAYS => recent.push(v.clone()),
            a if a <= ONE_YEAR_DAYS => year.push(v.clone()),
            _ => older.push(v.clone()),
        }
    }

    (recent, year, older)
}

pub fn totals(videos: &[VideoRecord]) -> Totals {
    videos.iter().fold(Totals::default(), |mut t, v| {
        t.views += v.views;
        t.likes += v.likes;
        t.comments += v.comments;
        t
    })
}

/// `1234567` → `1,234,567`
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `H:MM:SS`, or `M:SS` under an hour
pub fn format_duration(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}
