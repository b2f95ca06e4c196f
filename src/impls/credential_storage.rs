use crate::storage::on_disk::OnDiskStorage;
use async_trait::async_trait;
use resolution_engine::{CredentialStorage, CredentialStorageError};

#[async_trait]
impl CredentialStorage for OnDiskStorage {
    async fn load(&self, key: &str) -> Result<Option<String>, CredentialStorageError> {
        self.get(key)
            .await
            .map_err(|error| CredentialStorageError(Box::new(error)))
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), CredentialStorageError> {
        OnDiskStorage::save(self, key, value)
            .await
            .map_err(|error| CredentialStorageError(Box::new(error)))
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::on_disk::OnDiskStorage;
    use resolution_engine::CredentialStorage;
    use site_extractors::CLIENT_ID_KEY;

    #[actix_rt::test]
    async fn should_keep_client_id_in_named_cache_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = OnDiskStorage::create(temp_dir.path());

        CredentialStorage::save(&storage, CLIENT_ID_KEY, "psT32GLDMZ0TQKgfPkzrGIlco3PYA1kf")
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("soundcloud-client-id.txt")).unwrap(),
            "psT32GLDMZ0TQKgfPkzrGIlco3PYA1kf"
        );
        assert_eq!(
            storage.load(CLIENT_ID_KEY).await.unwrap(),
            Some("psT32GLDMZ0TQKgfPkzrGIlco3PYA1kf".to_string())
        );
    }
}
