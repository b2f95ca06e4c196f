use async_trait::async_trait;
use resolution_engine::{Format, Loader, LoaderError};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;
use url::Url;

const SUPPORTED_PROTOCOLS: [&str; 4] = ["http", "https", "hls", "progressive"];

/// Copies a remote stream into a local file with `ffmpeg -c copy`.
pub(crate) struct FfmpegLoader {
    ffmpeg_path: PathBuf,
}

impl FfmpegLoader {
    pub(crate) fn new(ffmpeg_path: PathBuf) -> Self {
        Self { ffmpeg_path }
    }

    /// Uses `explicit_path` when given, otherwise searches `PATH` for `ffmpeg`.
    pub(crate) fn locate(explicit_path: Option<&str>) -> Result<Self, which::Error> {
        let ffmpeg_path = which::which(explicit_path.unwrap_or("ffmpeg"))?;

        Ok(Self::new(ffmpeg_path))
    }

    pub(crate) fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }
}

#[async_trait]
impl Loader for FfmpegLoader {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    fn compatible(&self, format: &Format) -> bool {
        SUPPORTED_PROTOCOLS.contains(&format.protocol.as_str())
    }

    async fn get(&self, url: &Url, output_path: &Path) -> Result<(), LoaderError> {
        debug!(%url, output_path = %output_path.display(), "Running ffmpeg");

        let output = Command::new(&self.ffmpeg_path)
            .arg("-hide_banner")
            .arg("-y")
            .arg("-i")
            .arg(url.as_str())
            .arg("-c")
            .arg("copy")
            .arg(output_path)
            .output()
            .await?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));

            return Err(LoaderError::Downloading(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                combined.trim()
            )));
        }

        Ok(())
    }
}
