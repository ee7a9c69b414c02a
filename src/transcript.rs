use log::{debug, error, info, warn};
use serde::Serialize;

use crate::youtube::{CaptionService, CaptionTrack};

/// Most words sent to the model
pub const MAX_WORDS: usize = 3000;

pub const TRUNCATION_MARKER: &str = "... [transcripción truncada]";

/// Languages tried before falling back to the first listed track
const PREFERRED_LANGUAGES: [&str; 4] = ["es", "es-ES", "en", "en-US"];

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("API de YouTube no configurada")]
    NotConfigured,
}

/// Caption text cleaned down to prose
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub text: String,
    pub word_count: usize,
}

impl Transcript {
    pub fn new(text: String) -> Self {
        let word_count = text.split_whitespace().count();
        Self { text, word_count }
    }

    /// First 300 characters, with an ellipsis when cut
    pub fn preview(&self) -> String {
        const PREVIEW_CHARS: usize = 300;
        match self.text.char_indices().nth(PREVIEW_CHARS) {
            Some((idx, _)) => format!("{}...", &self.text[..idx]),
            None => self.text.clone(),
        }
    }
}

/// Fetch and clean the captions of a video.
///
/// `Ok(None)` covers both "no captions" and any upstream failure; only a
/// missing captions service is reported as an error.
pub async fn fetch_transcript(
    captions: Option<&dyn CaptionService>,
    video_id: &str,
) -> Result<Option<Transcript>, TranscriptError> {
    let captions = captions.ok_or(TranscriptError::NotConfigured)?;

    match fetch_srt(captions, video_id).await {
        Ok(Some(srt)) => {
            let text = clean_srt(&srt);
            if text.is_empty() {
                warn!("Captions for video {video_id} contain no spoken text");
                return Ok(None);
            }
            let transcript = Transcript::new(truncate_words(&text, MAX_WORDS));
            info!("Transcript for {video_id}: {} words", transcript.word_count);
            Ok(Some(transcript))
        }
        Ok(None) => Ok(None),
        Err(e) => {
            error!("Error fetching transcript for video {video_id}: {e}");
            Ok(None)
        }
    }
}

async fn fetch_srt(captions: &dyn CaptionService, video_id: &str) -> eyre::Result<Option<String>> {
    debug!("Listing captions for video {video_id}");
    let tracks = captions.list_captions(video_id).await?;

    let Some(track) = select_track(&tracks) else {
        warn!("No captions found for video {video_id}");
        return Ok(None);
    };
    debug!("Found {} caption tracks, using {} ({})", tracks.len(), track.id, track.language);

    let bytes = captions.download_caption(&track.id).await?;
    Ok(Some(String::from_utf8(bytes)?))
}

/// Pick the first track in a preferred language, else the first track
pub fn select_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|t| PREFERRED_LANGUAGES.contains(&t.language.as_str()))
        .or_else(|| tracks.first())
}

/// Strip SRT sequence numbers, timestamps and markup, leaving one line of prose
pub fn clean_srt(srt: &str) -> String {
    srt.lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && !line.chars().all(|c| c.is_ascii_digit())
                && !line.contains("-->")
                && !line.starts_with('<')
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep at most `max` words, appending the truncation marker when cut
pub fn truncate_words(text: &str, max: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > max {
        format!("{}{TRUNCATION_MARKER}", words[..max].join(" "))
    } else {
        text.to_string()
    }
}
