use serde::Deserialize;

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30u64
}

fn default_output_directory() -> String {
    "out".to_string()
}

fn default_credential_cache_directory() -> String {
    std::env::temp_dir().to_string_lossy().to_string()
}

fn default_soundcloud_api_base() -> String {
    "https://api-v2.soundcloud.com".to_string()
}

fn default_soundcloud_site_base() -> String {
    "https://soundcloud.com".to_string()
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct SoundCloudSettings {
    #[serde(rename = "soundcloud_api_base", default = "default_soundcloud_api_base")]
    pub(crate) api_base: String,
    #[serde(rename = "soundcloud_site_base", default = "default_soundcloud_site_base")]
    pub(crate) site_base: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Config {
    #[serde(default = "default_bind_address")]
    pub(crate) bind_address: String,
    #[serde(default = "default_shutdown_timeout")]
    pub(crate) shutdown_timeout: u64,
    #[serde(default = "default_output_directory")]
    pub(crate) output_directory: String,
    #[serde(default = "default_credential_cache_directory")]
    pub(crate) credential_cache_directory: String,
    #[serde(default)]
    pub(crate) ffmpeg_path: Option<String>,
    #[serde(flatten)]
    pub(crate) soundcloud: SoundCloudSettings,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn should_fill_defaults_for_missing_variables() {
        let config = envy::from_iter::<_, Config>(vec![(
            "OUTPUT_DIRECTORY".to_string(),
            "/srv/audio".to_string(),
        )])
        .unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.shutdown_timeout, 30);
        assert_eq!(config.output_directory, "/srv/audio");
        assert_eq!(config.ffmpeg_path, None);
        assert_eq!(config.soundcloud.api_base, "https://api-v2.soundcloud.com");
        assert_eq!(config.soundcloud.site_base, "https://soundcloud.com");
    }

    #[test]
    fn should_read_platform_settings() {
        let config = envy::from_iter::<_, Config>(vec![
            ("SHUTDOWN_TIMEOUT".to_string(), "5".to_string()),
            ("FFMPEG_PATH".to_string(), "/usr/bin/ffmpeg".to_string()),
            (
                "SOUNDCLOUD_API_BASE".to_string(),
                "http://127.0.0.1:9000".to_string(),
            ),
        ])
        .unwrap();

        assert_eq!(config.shutdown_timeout, 5);
        assert_eq!(config.ffmpeg_path, Some("/usr/bin/ffmpeg".to_string()));
        assert_eq!(config.soundcloud.api_base, "http://127.0.0.1:9000");
    }
}
