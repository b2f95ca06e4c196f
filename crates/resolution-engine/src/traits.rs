use crate::errors::{CredentialStorageError, ExtractionError, LoaderError};
use crate::types::{Format, TrackMetadata};
use async_trait::async_trait;
use std::path::Path;
use url::Url;

/// Turns a platform link into track metadata with ranked format candidates.
#[async_trait]
pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the link belongs to the platform this extractor serves.
    fn compatible(&self, url: &Url) -> bool;

    async fn extract(&self, url: &Url) -> Result<TrackMetadata, ExtractionError>;
}

/// Materializes one format candidate as a local file.
#[async_trait]
pub trait Loader: Send + Sync {
    fn name(&self) -> &'static str;

    fn compatible(&self, format: &Format) -> bool;

    async fn get(&self, url: &Url, output_path: &Path) -> Result<(), LoaderError>;
}

#[async_trait]
pub trait CredentialStorage: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>, CredentialStorageError>;
    async fn save(&self, key: &str, value: &str) -> Result<(), CredentialStorageError>;
}
