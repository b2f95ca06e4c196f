use once_cell::sync::Lazy;
use regex::Regex;
use resolution_engine::ContentKind;
use scraper::error::SelectorErrorKind;
use scraper::{Html, Selector};
use url::Url;

const CANONICAL_HOST: &str = "https://soundcloud.com";

// First path segments that never name a user.
const RESERVED_SEGMENTS: [&str; 2] = ["stations", "sets"];

static STATION_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/stations/track/([\w-]+)/([\w-]+)(?:/([\w-]+))?/?$")
        .expect("Station pattern must compile")
});
static PLAYLIST_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/([\w-]+)/sets/([\w-]+)(?:/([\w-]+))?/?$").expect("Playlist pattern must compile")
});
static USER_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/([\w-]+)/?$").expect("User pattern must compile"));
static SONG_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/([\w-]+)/([\w-]+)(?:/([\w-]+))?/?$").expect("Song pattern must compile")
});

static MIME_SUBTYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"audio/([\w-]+);?").expect("MIME pattern must compile"));
static CLIENT_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"client_id\s*:\s*"([0-9a-zA-Z]{32})""#).expect("Client id pattern must compile")
});

#[derive(Debug, thiserror::Error)]
pub(crate) enum ParseError {
    #[error("Invalid selector: {0}")]
    SelectorError(String),
}

// Selector errors hold an `Rc` and must not cross an await point.
impl From<SelectorErrorKind<'_>> for ParseError {
    fn from(error: SelectorErrorKind<'_>) -> Self {
        ParseError::SelectorError(error.to_string())
    }
}

#[derive(Debug, PartialEq)]
pub(crate) struct ClassifiedLink {
    pub(crate) kind: ContentKind,
    pub(crate) user: String,
    pub(crate) title: String,
    pub(crate) secret: Option<String>,
    pub(crate) canonical_url: String,
}

impl ClassifiedLink {
    fn unsupported() -> Self {
        Self {
            kind: ContentKind::Unsupported,
            user: String::new(),
            title: String::new(),
            secret: None,
            canonical_url: String::new(),
        }
    }
}

fn capture(captures: &regex::Captures<'_>, index: usize) -> Option<String> {
    captures
        .get(index)
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
}

/// Classifies a link by the shape of its path. Templates are tried in order:
/// station, playlist, user, song.
pub(crate) fn classify_path(path: &str) -> ClassifiedLink {
    if let Some(captures) = STATION_PATH.captures(path) {
        let user = capture(&captures, 1).unwrap_or_default();
        let title = capture(&captures, 2).unwrap_or_default();
        let canonical_url = format!("{}/stations/track/{}/{}", CANONICAL_HOST, user, title);

        return ClassifiedLink {
            kind: ContentKind::Station,
            user,
            title,
            secret: capture(&captures, 3),
            canonical_url,
        };
    }

    if let Some(captures) = PLAYLIST_PATH.captures(path) {
        let user = capture(&captures, 1).unwrap_or_default();
        let title = capture(&captures, 2).unwrap_or_default();
        let canonical_url = format!("{}/{}/sets/{}", CANONICAL_HOST, user, title);

        return ClassifiedLink {
            kind: ContentKind::Playlist,
            user,
            title,
            secret: capture(&captures, 3),
            canonical_url,
        };
    }

    if let Some(captures) = USER_PATH.captures(path) {
        let user = capture(&captures, 1).unwrap_or_default();
        let canonical_url = format!("{}/{}", CANONICAL_HOST, user);

        return ClassifiedLink {
            kind: ContentKind::User,
            user,
            title: String::new(),
            secret: None,
            canonical_url,
        };
    }

    if let Some(captures) = SONG_PATH.captures(path) {
        let user = capture(&captures, 1).unwrap_or_default();
        let title = capture(&captures, 2).unwrap_or_default();

        if RESERVED_SEGMENTS.contains(&user.as_str()) || title == "sets" {
            return ClassifiedLink::unsupported();
        }

        let secret = capture(&captures, 3);
        let mut canonical_url = format!("{}/{}/{}", CANONICAL_HOST, user, title);
        if let Some(secret) = &secret {
            canonical_url.push('/');
            canonical_url.push_str(secret);
        }

        return ClassifiedLink {
            kind: ContentKind::Song,
            user,
            title,
            secret,
            canonical_url,
        };
    }

    ClassifiedLink::unsupported()
}

/// Extension is the preset text before the first `_`, e.g. `mp3_0_0` gives `mp3`.
pub(crate) fn parse_extension(preset: &str) -> Option<&str> {
    preset.split('_').next().filter(|ext| !ext.is_empty())
}

/// Subtype of an `audio/*` MIME type, e.g. `audio/ogg; codecs="opus"` gives `ogg`.
pub(crate) fn parse_mime_subtype(mime_type: &str) -> Option<&str> {
    MIME_SUBTYPE
        .captures(mime_type)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Collects `<script src>` targets of a page, resolved against `base`.
pub(crate) fn parse_script_sources(raw_html: &str, base: &Url) -> Result<Vec<Url>, ParseError> {
    let html = Html::parse_document(raw_html);

    let script_selector = Selector::parse(r#"script[src]"#)?;

    let sources = html
        .select(&script_selector)
        .filter_map(|el| el.value().attr("src"))
        .filter_map(|src| base.join(src).ok())
        .collect();

    Ok(sources)
}

pub(crate) fn find_client_id(script: &str) -> Option<String> {
    CLIENT_ID
        .captures(script)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}
