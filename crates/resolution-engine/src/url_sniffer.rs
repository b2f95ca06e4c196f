use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

// [scheme://]host.tld[/path?query], where the tld is 2-13 lowercase letters.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"((?:[a-z]{3,6}://)|(?:^|\s))((?:[a-zA-Z0-9\-]+\.)+[a-z]{2,13})([\w.?=&%/\-]*\b)",
    )
    .expect("URL pattern must compile")
});

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("There is no valid url in the message")]
pub struct NotAUrl;

/// Finds the first url-shaped substring of `message` and parses it.
///
/// Only the first match is considered. A match without a scheme is treated as
/// `https`.
pub fn extract_url(message: &str) -> Result<Url, NotAUrl> {
    let raw_url = URL_PATTERN
        .find(message)
        .map(|m| m.as_str().trim())
        .ok_or(NotAUrl)?;

    let candidate = if raw_url.contains("://") {
        raw_url.to_string()
    } else {
        format!("https://{}", raw_url)
    };

    let url = match Url::parse(&candidate) {
        Ok(url) => url,
        Err(error) => {
            debug!(?error, candidate, "Matched text is not a valid url");
            return Err(NotAUrl);
        }
    };

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(NotAUrl),
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_url, NotAUrl};

    #[test]
    fn should_extract_url_surrounded_by_text() {
        let url = extract_url("check this out https://soundcloud.com/user/track-name").unwrap();

        assert_eq!(url.as_str(), "https://soundcloud.com/user/track-name");
        assert_eq!(url.host_str(), Some("soundcloud.com"));
        assert_eq!(url.path(), "/user/track-name");
    }

    #[test]
    fn should_keep_query_string() {
        let url = extract_url("https://soundcloud.com/user/track?in=foo&si=1 wow").unwrap();

        assert_eq!(url.query(), Some("in=foo&si=1"));
    }

    #[test]
    fn should_add_scheme_to_bare_host() {
        let url = extract_url("listen soundcloud.com/user/track please").unwrap();

        assert_eq!(url.as_str(), "https://soundcloud.com/user/track");
    }

    #[test]
    fn should_return_only_first_url() {
        let url =
            extract_url("https://soundcloud.com/a/b and https://soundcloud.com/c/d").unwrap();

        assert_eq!(url.path(), "/a/b");
    }

    #[test]
    fn should_fail_on_plain_text() {
        assert_eq!(extract_url("just some text"), Err(NotAUrl));
        assert_eq!(extract_url(""), Err(NotAUrl));
    }

    #[test]
    fn should_fail_on_scheme_without_host() {
        assert_eq!(extract_url("http:// and its all"), Err(NotAUrl));
    }

    #[test]
    fn should_fail_on_host_without_dot() {
        assert_eq!(extract_url("ping localhost:8080/status"), Err(NotAUrl));
    }
}
