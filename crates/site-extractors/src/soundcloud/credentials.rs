use async_lock::Mutex;
use resolution_engine::{CredentialStorage, ExtractionError};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage key of the cached client id.
pub const CLIENT_ID_KEY: &str = "soundcloud-client-id";

const CLIENT_ID_LENGTH: usize = 32;

/// The API client id shared by all requests of one extractor.
pub(crate) struct ClientIdStore {
    current: Mutex<String>,
    storage: Arc<dyn CredentialStorage>,
}

impl ClientIdStore {
    /// Starts from the cached client id when the cache holds a well-formed one,
    /// from `default_client_id` otherwise.
    pub(crate) async fn create(default_client_id: &str, storage: Arc<dyn CredentialStorage>) -> Self {
        let client_id = match storage.load(CLIENT_ID_KEY).await {
            Ok(Some(cached)) if cached.trim().len() == CLIENT_ID_LENGTH => {
                debug!("Using cached client id");
                cached.trim().to_string()
            }
            Ok(Some(cached)) => {
                warn!(length = cached.trim().len(), "Ignoring malformed cached client id");
                default_client_id.to_string()
            }
            Ok(None) => default_client_id.to_string(),
            Err(error) => {
                warn!(?error, "Unable to read cached client id");
                default_client_id.to_string()
            }
        };

        Self {
            current: Mutex::new(client_id),
            storage,
        }
    }

    pub(crate) async fn current(&self) -> String {
        self.current.lock().await.clone()
    }

    /// Replaces `stale` with a value produced by `scrape` and persists it.
    ///
    /// When another request has already replaced `stale`, its value is returned
    /// and `scrape` is not called.
    pub(crate) async fn refresh<F, Fut>(
        &self,
        stale: &str,
        scrape: F,
    ) -> Result<String, ExtractionError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<String>>,
    {
        let mut current = self.current.lock().await;

        if current.as_str() != stale {
            debug!("Client id was already refreshed");
            return Ok(current.clone());
        }

        let fresh = scrape().await.ok_or(ExtractionError::NoCredential)?;

        info!(length = fresh.len(), "Client id refreshed");

        if let Err(error) = self.storage.save(CLIENT_ID_KEY, &fresh).await {
            warn!(?error, "Unable to persist client id");
        }

        *current = fresh.clone();

        Ok(fresh)
    }
}
