use once_cell::sync::Lazy;
use regex::Regex;
use resolution_engine::Artwork;

const ARTWORK_SIZES: [(&str, u32); 10] = [
    ("mini", 16),
    ("tiny", 20),
    ("small", 32),
    ("badge", 47),
    ("t67x67", 67),
    ("large", 100),
    ("t300x300", 300),
    ("crop", 400),
    ("t500x500", 500),
    ("original", 0),
];

static SIZE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-([0-9a-z]+)\.jpg").expect("Artwork pattern must compile"));

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("There are no artworks in '{0}'")]
pub(crate) struct NoArtworks(String);

/// Derives every known artwork size from one image url. The track artwork is
/// used when present, the uploader avatar otherwise.
pub(crate) fn expand_artworks(
    artwork_url: Option<&str>,
    avatar_url: Option<&str>,
) -> Result<Vec<Artwork>, NoArtworks> {
    let template = artwork_url
        .filter(|url| !url.is_empty())
        .or(avatar_url)
        .unwrap_or_default();

    let token = SIZE_TOKEN
        .find_iter(template)
        .last()
        .ok_or_else(|| NoArtworks(template.to_string()))?;

    let (prefix, suffix) = (&template[..token.start()], &template[token.end()..]);

    let artworks = ARTWORK_SIZES
        .iter()
        .map(|(size_tag, pixel_size)| Artwork {
            size_tag: size_tag.to_string(),
            url: format!("{}-{}.jpg{}", prefix, size_tag, suffix),
            pixel_size: *pixel_size,
        })
        .collect();

    Ok(artworks)
}
