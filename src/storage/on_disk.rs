use std::path::PathBuf;
use tokio::fs::create_dir_all;
use tokio::io::AsyncWriteExt;

const VALUE_FILE_EXTENSION: &str = "txt";

/// Small key/value store keeping one text file per key.
pub(crate) struct OnDiskStorage {
    path: PathBuf,
}

impl OnDiskStorage {
    pub(crate) fn create(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.path.join(format!("{}.{}", key, VALUE_FILE_EXTENSION))
    }

    pub(crate) async fn get(&self, key: &str) -> Result<Option<String>, std::io::Error> {
        match tokio::fs::read_to_string(self.value_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(error) if matches!(error.kind(), std::io::ErrorKind::NotFound) => Ok(None),
            Err(error) => Err(error),
        }
    }

    pub(crate) async fn save(&self, key: &str, value: &str) -> Result<(), std::io::Error> {
        create_dir_all(&self.path).await?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.value_path(key))
            .await?;

        file.write_all(value.as_bytes()).await?;

        Ok(())
    }
}
