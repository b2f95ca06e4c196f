use crate::soundcloud::artwork::expand_artworks;
use crate::soundcloud::credentials::ClientIdStore;
use crate::soundcloud::parser::{
    classify_path, find_client_id, parse_extension, parse_mime_subtype, parse_script_sources,
    ParseError,
};
use crate::soundcloud::types::{ApiTrack, ApiTranscoding, DownloadLocation, StreamLocation};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use resolution_engine::{
    rank_formats, ContentKind, CredentialStorage, ExtractionError, Extractor, Format,
    TrackMetadata,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/85.0.4183.102 Safari/537.36";
const DEFAULT_API_BASE: &str = "https://api-v2.soundcloud.com";
const DEFAULT_SITE_BASE: &str = "https://soundcloud.com";
const DEFAULT_CLIENT_ID: &str = "psT32GLDMZ0TQKgfPkzrGIlco3PYA1kf";

const DEFAULT_SHORT_LINK_HOSTS: [&str; 2] = ["soundcloud.app.goo.gl", "on.soundcloud.com"];
const MAX_CREDENTIAL_REFRESHES: usize = 1;
const DOWNLOAD_FORMAT_SCORE: u32 = 100;
// Shorter bodies (usually `{}`), surrounding whitespace aside, mean the client
// id was silently rejected.
const MIN_PAYLOAD_LENGTH: usize = 3;

static COMPATIBLE_HOST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:www|m)\.)?soundcloud\.com$").expect("Host pattern must compile")
});

#[derive(Debug, thiserror::Error)]
pub(crate) enum ClientError {
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
    #[error(transparent)]
    UrlError(#[from] url::ParseError),
    #[error(transparent)]
    ParseError(#[from] ParseError),
    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(StatusCode),
}

impl From<ClientError> for ExtractionError {
    fn from(error: ClientError) -> Self {
        ExtractionError::CantFetchInfo(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct SoundCloudConfig {
    pub api_base: String,
    pub site_base: String,
    pub default_client_id: String,
    pub short_link_hosts: Vec<String>,
}

impl Default for SoundCloudConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            site_base: DEFAULT_SITE_BASE.to_string(),
            default_client_id: DEFAULT_CLIENT_ID.to_string(),
            short_link_hosts: DEFAULT_SHORT_LINK_HOSTS
                .iter()
                .map(|host| host.to_string())
                .collect(),
        }
    }
}

enum ApiReply {
    Payload(String),
    StaleCredential,
}

pub struct SoundCloudExtractor {
    client: Client,
    api_base: String,
    site_base: Url,
    short_link_hosts: Vec<String>,
    client_id: ClientIdStore,
}

impl SoundCloudExtractor {
    pub async fn create(
        config: SoundCloudConfig,
        storage: Arc<dyn CredentialStorage>,
    ) -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::limited(10))
            .build()
            .map_err(ClientError::from)?;

        let site_base = Url::parse(&format!("{}/", config.site_base.trim_end_matches('/')))
            .map_err(ClientError::from)?;

        let client_id = ClientIdStore::create(&config.default_client_id, storage).await;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            site_base,
            short_link_hosts: config.short_link_hosts,
            client_id,
        })
    }

    async fn expand_short_link(&self, url: &Url) -> Result<Url, ClientError> {
        if !self.is_short_link(url) {
            return Ok(url.clone());
        }

        let response = self.client.get(url.clone()).send().await?;
        let expanded = response.url().clone();

        debug!(from = %url, to = %expanded, "Short link expanded");

        Ok(expanded)
    }

    async fn get_text(&self, url: Url) -> Result<String, ClientError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus(status));
        }

        Ok(response.text().await?)
    }

    async fn get_with_client_id(
        &self,
        mut url: Url,
        client_id: &str,
    ) -> Result<ApiReply, ClientError> {
        url.query_pairs_mut().append_pair("client_id", client_id);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Ok(ApiReply::StaleCredential);
        }

        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus(status));
        }

        let body = response.text().await?;

        if body.trim().len() < MIN_PAYLOAD_LENGTH {
            return Ok(ApiReply::StaleCredential);
        }

        Ok(ApiReply::Payload(body))
    }

    pub(crate) async fn resolve_track(
        &self,
        canonical_url: &str,
    ) -> Result<ApiTrack, ExtractionError> {
        let mut resolve_url =
            Url::parse(&format!("{}/resolve", self.api_base)).map_err(ClientError::from)?;
        resolve_url.query_pairs_mut().append_pair("url", canonical_url);

        let mut refreshes = 0;

        loop {
            let client_id = self.client_id.current().await;

            let reply = self.get_with_client_id(resolve_url.clone(), &client_id).await?;

            match reply {
                ApiReply::Payload(body) => {
                    let track = serde_json::from_str::<ApiTrack>(&body).map_err(ClientError::from)?;

                    return Ok(track);
                }
                ApiReply::StaleCredential if refreshes >= MAX_CREDENTIAL_REFRESHES => {
                    return Err(ExtractionError::CantFetchInfo(
                        "client id was rejected after refresh".to_string(),
                    ));
                }
                ApiReply::StaleCredential => {
                    refreshes += 1;
                    warn!(canonical_url, "Client id is stale, refreshing");
                    self.client_id
                        .refresh(&client_id, || self.scrape_client_id())
                        .await?;
                }
            }
        }
    }

    /// Looks for a client id in the scripts referenced by the homepage.
    async fn scrape_client_id(&self) -> Option<String> {
        let homepage = match self.get_text(self.site_base.clone()).await {
            Ok(homepage) => homepage,
            Err(error) => {
                warn!(?error, "Unable to fetch homepage");
                return None;
            }
        };

        let scripts = match parse_script_sources(&homepage, &self.site_base) {
            Ok(scripts) => scripts,
            Err(error) => {
                warn!(?error, "Unable to parse homepage");
                return None;
            }
        };

        for script in scripts {
            match self.get_text(script.clone()).await {
                Ok(body) => {
                    if let Some(client_id) = find_client_id(&body) {
                        debug!(%script, "Found client id");
                        return Some(client_id);
                    }
                }
                Err(error) => {
                    debug!(?error, %script, "Unable to fetch script");
                }
            }
        }

        warn!("No script contains a client id");

        None
    }

    async fn get_download_format(&self, track: &ApiTrack) -> Result<Option<Format>, ClientError> {
        let url = match &track.download_url {
            Some(download_url) => Url::parse(download_url)?,
            None => Url::parse(&format!("{}/tracks/{}/download", self.api_base, track.id))?,
        };
        let client_id = self.client_id.current().await;

        let body = match self.get_with_client_id(url, &client_id).await? {
            ApiReply::Payload(body) => body,
            ApiReply::StaleCredential => {
                warn!(track_id = track.id, "Download endpoint rejected the client id");
                return Ok(None);
            }
        };

        let location = serde_json::from_str::<DownloadLocation>(&body)?;

        let mut format = Format::new(
            location.redirect_uri,
            "mp3".to_string(),
            "mpeg".to_string(),
            "http".to_string(),
        );
        format.score = DOWNLOAD_FORMAT_SCORE;

        Ok(Some(format))
    }

    async fn get_transcoding_format(
        &self,
        transcoding: &ApiTranscoding,
    ) -> Result<Option<Format>, ClientError> {
        let (extension, mime_subtype) = match (
            parse_extension(&transcoding.preset),
            parse_mime_subtype(&transcoding.format.mime_type),
        ) {
            (Some(extension), Some(mime_subtype)) => (extension, mime_subtype),
            _ => {
                debug!(
                    preset = %transcoding.preset,
                    mime_type = %transcoding.format.mime_type,
                    "Unrecognized transcoding"
                );
                return Ok(None);
            }
        };

        let url = Url::parse(&transcoding.url)?;
        let client_id = self.client_id.current().await;

        let body = match self.get_with_client_id(url, &client_id).await? {
            ApiReply::Payload(body) => body,
            ApiReply::StaleCredential => {
                warn!(preset = %transcoding.preset, "Stream endpoint rejected the client id");
                return Ok(None);
            }
        };

        let location = serde_json::from_str::<StreamLocation>(&body)?;

        Ok(Some(Format::new(
            location.url,
            extension.to_string(),
            mime_subtype.to_string(),
            transcoding.format.protocol.clone(),
        )))
    }

    /// The original upload wins outright when it is downloadable. Otherwise
    /// every transcoding that can be located is ranked.
    async fn collect_formats(&self, track: &ApiTrack) -> Vec<Format> {
        if track.downloadable && track.has_downloads_left {
            match self.get_download_format(track).await {
                Ok(Some(format)) => return vec![format],
                Ok(None) => debug!(track_id = track.id, "Download endpoint gave no location"),
                Err(error) => warn!(?error, track_id = track.id, "Unable to get download url"),
            }
        }

        let mut formats = vec![];

        for transcoding in &track.media.transcodings {
            match self.get_transcoding_format(transcoding).await {
                Ok(Some(format)) => formats.push(format),
                Ok(None) => (),
                Err(error) => {
                    warn!(?error, preset = %transcoding.preset, "Skipping transcoding");
                }
            }
        }

        rank_formats(formats)
    }

    fn is_short_link(&self, url: &Url) -> bool {
        url.host_str()
            .map(|host| self.short_link_hosts.iter().any(|short| short == host))
            .unwrap_or_default()
    }
}

#[async_trait]
impl Extractor for SoundCloudExtractor {
    fn name(&self) -> &'static str {
        "soundcloud"
    }

    fn compatible(&self, url: &Url) -> bool {
        self.is_short_link(url)
            || url
                .host_str()
                .map(|host| COMPATIBLE_HOST.is_match(host))
                .unwrap_or_default()
    }

    async fn extract(&self, url: &Url) -> Result<TrackMetadata, ExtractionError> {
        let url = self.expand_short_link(url).await?;
        let link = classify_path(url.path());

        if link.kind != ContentKind::Song {
            return Err(ExtractionError::UnsupportedContentKind(link.kind));
        }

        let track = self.resolve_track(&link.canonical_url).await?;

        let formats = self.collect_formats(&track).await;

        if formats.is_empty() {
            return Err(ExtractionError::CantFetchInfo(format!(
                "no playable formats for track {}",
                track.id
            )));
        }

        let thumbnails = match expand_artworks(
            track.artwork_url.as_deref(),
            track.user.avatar_url.as_deref(),
        ) {
            Ok(thumbnails) => thumbnails,
            Err(error) => {
                debug!(%error, "Track has no artworks");
                vec![]
            }
        };

        info!(
            track_id = track.id,
            permalink = %track.permalink,
            formats = formats.len(),
            "Track resolved"
        );

        Ok(track.into_metadata(formats, thumbnails))
    }
}
