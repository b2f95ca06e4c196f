use crate::ContentKind;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Links of kind '{0}' are not supported")]
    UnsupportedContentKind(ContentKind),
    #[error("Unable to fetch track info: {0}")]
    CantFetchInfo(String),
    #[error("Unable to obtain an API client credential")]
    NoCredential,
    #[error("Unexpected extractor error: {0}")]
    Undefined(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("Download failed: {0}")]
    Downloading(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct CredentialStorageError(pub Box<dyn std::error::Error + Send + Sync>);

impl From<std::io::Error> for CredentialStorageError {
    fn from(error: std::io::Error) -> Self {
        CredentialStorageError(Box::new(error))
    }
}

/// The one error a caller of [`crate::Session::resolve`] receives.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("There is no valid url in the message")]
    NotUrl,
    #[error("Service {host} is not supported")]
    UnsupportedService { host: String },
    #[error("Links of kind '{kind}' are not supported")]
    UnsupportedContentKind { kind: ContentKind },
    #[error("Unable to fetch track info: {0}")]
    CantFetchInfo(String),
    #[error("Unable to obtain an API client credential")]
    NoCredential,
    #[error("Available loaders can't work with protocols: {0}")]
    UnsupportedProtocol(String),
    #[error("Unable to download: {detail}")]
    Downloading { detail: String },
    #[error("Undefined error: {0}")]
    Undefined(String),
}

impl ResolveError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::NotUrl => "not_url",
            ResolveError::UnsupportedService { .. } => "unsupported_service",
            ResolveError::UnsupportedContentKind { .. } => "unsupported_content_kind",
            ResolveError::CantFetchInfo(_) => "cant_fetch_info",
            ResolveError::NoCredential => "no_credential",
            ResolveError::UnsupportedProtocol(_) => "unsupported_protocol",
            ResolveError::Downloading { .. } => "downloading_error",
            ResolveError::Undefined(_) => "undefined",
        }
    }
}

impl From<ExtractionError> for ResolveError {
    fn from(error: ExtractionError) -> Self {
        match error {
            ExtractionError::UnsupportedContentKind(kind) => {
                ResolveError::UnsupportedContentKind { kind }
            }
            ExtractionError::CantFetchInfo(reason) => ResolveError::CantFetchInfo(reason),
            ExtractionError::NoCredential => ResolveError::NoCredential,
            ExtractionError::Undefined(reason) => ResolveError::Undefined(reason),
        }
    }
}

impl From<LoaderError> for ResolveError {
    fn from(error: LoaderError) -> Self {
        ResolveError::Downloading {
            detail: error.to_string(),
        }
    }
}
