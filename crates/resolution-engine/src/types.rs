use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::path::PathBuf;
use uuid::Uuid;

// RequestId
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RequestId(Uuid);

impl RequestId {
    pub(crate) fn new() -> Self {
        RequestId(Uuid::new_v4())
    }
}

impl Deref for RequestId {
    type Target = Uuid;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of resource a platform link points to, derived from the shape of its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Song,
    Playlist,
    Station,
    User,
    Unsupported,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Song => "song",
            ContentKind::Playlist => "playlist",
            ContentKind::Station => "station",
            ContentKind::User => "user",
            ContentKind::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single downloadable stream candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    pub url: String,
    /// File extension, e.g. `mp3` or `opus`.
    pub extension: String,
    /// Subtype of the declared `audio/*` MIME type, e.g. `mpeg`.
    pub mime_subtype: String,
    /// Transport protocol, e.g. `progressive`, `hls` or `http`.
    pub protocol: String,
    pub score: u32,
}

impl Format {
    pub fn new(url: String, extension: String, mime_subtype: String, protocol: String) -> Self {
        Self {
            url,
            extension,
            mime_subtype,
            protocol,
            score: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub size_tag: String,
    pub url: String,
    /// Edge length in pixels, `0` for the original upload.
    pub pixel_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub id: u64,
    pub permalink: String,
    pub uploader_name: String,
    pub uploader_id: u64,
    pub uploader_url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub title: String,
    pub description: String,
    pub duration_seconds: f64,
    pub web_page_url: String,
    pub license: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub repost_count: u64,
    pub genre: String,
    /// Best first. Never empty for a successfully extracted track.
    pub formats: Vec<Format>,
    pub thumbnails: Vec<Artwork>,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub request_id: RequestId,
    pub path: PathBuf,
    pub metadata: TrackMetadata,
}
