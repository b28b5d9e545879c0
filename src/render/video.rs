//! Paragraphs that are nothing but a video or Telegram link.

use std::sync::LazyLock;

use regex::Regex;

static YOUTUBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([a-zA-Z0-9_-]+)").expect("YOUTUBE regex")
});

static TELEGRAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:www\.)?(?:t|telegram)\.me/\S+$").expect("TELEGRAM regex")
});

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaLink {
    YouTube { url: String, video_id: String },
    Telegram { url: String },
}

impl MediaLink {
    pub fn url(&self) -> &str {
        match self {
            MediaLink::YouTube { url, .. } | MediaLink::Telegram { url } => url,
        }
    }
}

pub fn youtube_embed_url(video_id: &str) -> String {
    format!("{}{}", YOUTUBE_EMBED_BASE, video_id)
}

/// Classify paragraph text that is a single bare URL.
///
/// Text with anything besides the URL stays a normal paragraph.
pub fn classify_media_link(text: &str) -> Option<MediaLink> {
    let text = text.trim();
    if text.is_empty() || text.chars().any(char::is_whitespace) {
        return None;
    }

    if let Some(caps) = YOUTUBE.captures(text) {
        return Some(MediaLink::YouTube {
            url: text.to_string(),
            video_id: caps[1].to_string(),
        });
    }
    if TELEGRAM.is_match(text) {
        return Some(MediaLink::Telegram {
            url: text.to_string(),
        });
    }
    None
}
