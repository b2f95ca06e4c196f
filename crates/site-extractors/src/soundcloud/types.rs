use chrono::{DateTime, Utc};
use resolution_engine::{Artwork, Format, TrackMetadata};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) id: u64,
    pub(crate) username: String,
    #[serde(default)]
    pub(crate) permalink_url: String,
    #[serde(default)]
    pub(crate) avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiTranscodingFormat {
    pub(crate) protocol: String,
    pub(crate) mime_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiTranscoding {
    pub(crate) url: String,
    pub(crate) preset: String,
    pub(crate) format: ApiTranscodingFormat,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiMedia {
    #[serde(default)]
    pub(crate) transcodings: Vec<ApiTranscoding>,
}

/// Track object returned by the `/resolve` endpoint. Only the fields we
/// read are declared; nullable ones are optional.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiTrack {
    pub(crate) id: u64,
    pub(crate) permalink: String,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    /// Milliseconds.
    pub(crate) duration: u64,
    #[serde(default)]
    pub(crate) created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(crate) permalink_url: String,
    #[serde(default)]
    pub(crate) license: Option<String>,
    #[serde(default)]
    pub(crate) playback_count: Option<u64>,
    #[serde(default)]
    pub(crate) likes_count: Option<u64>,
    #[serde(default)]
    pub(crate) comment_count: Option<u64>,
    #[serde(default)]
    pub(crate) reposts_count: Option<u64>,
    #[serde(default)]
    pub(crate) genre: Option<String>,
    #[serde(default)]
    pub(crate) artwork_url: Option<String>,
    #[serde(default)]
    pub(crate) downloadable: bool,
    #[serde(default)]
    pub(crate) has_downloads_left: bool,
    #[serde(default)]
    pub(crate) download_url: Option<String>,
    #[serde(default)]
    pub(crate) media: ApiMedia,
    pub(crate) user: ApiUser,
}

impl ApiTrack {
    pub(crate) fn into_metadata(self, formats: Vec<Format>, thumbnails: Vec<Artwork>) -> TrackMetadata {
        TrackMetadata {
            id: self.id,
            permalink: self.permalink,
            uploader_name: self.user.username,
            uploader_id: self.user.id,
            uploader_url: self.user.permalink_url,
            created_at: self.created_at,
            title: self.title,
            description: self.description.unwrap_or_default(),
            duration_seconds: self.duration as f64 / 1000.0,
            web_page_url: self.permalink_url,
            license: self.license.unwrap_or_default(),
            view_count: self.playback_count.unwrap_or_default(),
            like_count: self.likes_count.unwrap_or_default(),
            comment_count: self.comment_count.unwrap_or_default(),
            repost_count: self.reposts_count.unwrap_or_default(),
            genre: self.genre.unwrap_or_default(),
            formats,
            thumbnails,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StreamLocation {
    pub(crate) url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DownloadLocation {
    pub(crate) redirect_uri: String,
}
