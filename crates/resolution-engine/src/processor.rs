use crate::errors::{LoaderError, ResolveError};
use crate::traits::Extractor;
use crate::types::{RequestId, Resolution, TrackMetadata};
use crate::url_sniffer::extract_url;
use crate::Session;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

const OUTPUT_EXTENSION: &str = "mp3";

#[derive(Default)]
pub(crate) struct ResolutionState {
    pub(crate) url: Option<Url>,
    pub(crate) extractor: Option<Arc<dyn Extractor>>,
    pub(crate) metadata: Option<TrackMetadata>,
    pub(crate) output_path: Option<PathBuf>,
    pub(crate) downloaded_path: Option<PathBuf>,
}

impl ResolutionState {
    pub(crate) fn get_step(&self) -> ResolutionStep {
        if self.url.is_none() {
            ResolutionStep::Sniffing
        } else if self.extractor.is_none() {
            ResolutionStep::ExtractorLookup
        } else if self.metadata.is_none() {
            ResolutionStep::Extracting
        } else if self.output_path.is_none() {
            ResolutionStep::PreparingOutput
        } else if self.downloaded_path.is_none() {
            ResolutionStep::Fetching
        } else {
            ResolutionStep::Done
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ResolutionStep {
    Sniffing,
    ExtractorLookup,
    Extracting,
    PreparingOutput,
    Fetching,
    Done,
}

impl ResolutionStep {
    pub fn is_done(&self) -> bool {
        matches!(self, ResolutionStep::Done)
    }
}

fn missing(field: &str) -> ResolveError {
    ResolveError::Undefined(format!("resolution step ran without {}", field))
}

impl Session {
    /// Runs the whole pipeline for one message: finds the link, extracts the
    /// track and downloads the first format some loader can handle.
    pub async fn resolve(&self, message: &str) -> Result<Resolution, ResolveError> {
        let request_id = RequestId::new();
        let mut state = ResolutionState::default();

        info!(%request_id, message, "Resolving message");

        while !state.get_step().is_done() {
            if let Err(error) = self.handle_next_step(&request_id, message, &mut state).await {
                warn!(%request_id, kind = error.kind(), %error, "Resolution failed");
                return Err(error);
            }
        }

        let path = state.downloaded_path.take().ok_or_else(|| missing("path"))?;
        let metadata = state.metadata.take().ok_or_else(|| missing("metadata"))?;

        info!(%request_id, path = %path.display(), "Resolution finished");

        Ok(Resolution {
            request_id,
            path,
            metadata,
        })
    }

    async fn handle_next_step(
        &self,
        request_id: &RequestId,
        message: &str,
        state: &mut ResolutionState,
    ) -> Result<(), ResolveError> {
        let step = state.get_step();

        debug!(%request_id, ?step, "Running next resolution step");

        match step {
            ResolutionStep::Sniffing => self.sniff_url(message, state),
            ResolutionStep::ExtractorLookup => self.lookup_extractor(request_id, state),
            ResolutionStep::Extracting => self.extract_metadata(request_id, state).await,
            ResolutionStep::PreparingOutput => self.prepare_output(request_id, state).await,
            ResolutionStep::Fetching => self.fetch_audio(request_id, state).await,
            ResolutionStep::Done => Ok(()),
        }
    }

    fn sniff_url(&self, message: &str, state: &mut ResolutionState) -> Result<(), ResolveError> {
        let url = extract_url(message).map_err(|_| ResolveError::NotUrl)?;

        state.url.replace(url);

        Ok(())
    }

    fn lookup_extractor(
        &self,
        request_id: &RequestId,
        state: &mut ResolutionState,
    ) -> Result<(), ResolveError> {
        let url = state.url.as_ref().ok_or_else(|| missing("url"))?;

        let extractor = self
            .extractors
            .find_compatible(|extractor| extractor.compatible(url))
            .cloned()
            .ok_or_else(|| ResolveError::UnsupportedService {
                host: url.host_str().unwrap_or_default().to_string(),
            })?;

        debug!(%request_id, extractor = extractor.name(), "Found compatible extractor");

        state.extractor.replace(extractor);

        Ok(())
    }

    async fn extract_metadata(
        &self,
        request_id: &RequestId,
        state: &mut ResolutionState,
    ) -> Result<(), ResolveError> {
        let url = state.url.as_ref().ok_or_else(|| missing("url"))?;
        let extractor = state.extractor.as_ref().ok_or_else(|| missing("extractor"))?;

        let metadata = extractor.extract(url).await?;

        info!(
            %request_id,
            id = metadata.id,
            title = %metadata.title,
            formats = metadata.formats.len(),
            "Track metadata extracted"
        );

        state.metadata.replace(metadata);

        Ok(())
    }

    async fn prepare_output(
        &self,
        request_id: &RequestId,
        state: &mut ResolutionState,
    ) -> Result<(), ResolveError> {
        let metadata = state.metadata.as_ref().ok_or_else(|| missing("metadata"))?;

        // A directory we can't create is not fatal: the file lands in the
        // working directory instead.
        let directory = match tokio::fs::create_dir_all(&self.output_directory).await {
            Ok(()) => self.output_directory.clone(),
            Err(error) => {
                warn!(
                    %request_id,
                    ?error,
                    directory = %self.output_directory.display(),
                    "Unable to create output directory, using the working directory"
                );
                PathBuf::new()
            }
        };

        let file_name = format!("{}.{}", metadata.permalink, OUTPUT_EXTENSION);

        state.output_path.replace(directory.join(file_name));

        Ok(())
    }

    async fn fetch_audio(
        &self,
        request_id: &RequestId,
        state: &mut ResolutionState,
    ) -> Result<(), ResolveError> {
        let metadata = state.metadata.as_ref().ok_or_else(|| missing("metadata"))?;
        let output_path = state.output_path.as_ref().ok_or_else(|| missing("output path"))?;

        let mut last_error: Option<LoaderError> = None;

        for format in &metadata.formats {
            let url = match Url::parse(&format.url) {
                Ok(url) => url,
                Err(error) => {
                    warn!(%request_id, ?error, url = %format.url, "Skipping format with invalid url");
                    continue;
                }
            };

            for loader in self.loaders.iter_compatible(|loader| loader.compatible(format)) {
                debug!(
                    %request_id,
                    loader = loader.name(),
                    extension = %format.extension,
                    protocol = %format.protocol,
                    "Trying to download format"
                );

                match loader.get(&url, output_path).await {
                    Ok(()) => {
                        info!(%request_id, loader = loader.name(), "Audio downloaded");
                        state.downloaded_path.replace(output_path.clone());
                        return Ok(());
                    }
                    Err(error) => {
                        warn!(%request_id, loader = loader.name(), ?error, "Loader failed");
                        last_error.replace(error);
                    }
                }
            }
        }

        match last_error {
            Some(error) => Err(error.into()),
            None => {
                let protocols = metadata
                    .formats
                    .iter()
                    .map(|format| format.protocol.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");

                Err(ResolveError::UnsupportedProtocol(protocols))
            }
        }
    }
}
