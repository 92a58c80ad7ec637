use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Writes beneath a base directory on the local disk.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full_path, data).await?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::BoardError;

    #[test]
    fn test_write_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        tokio_test::block_on(storage.write_file("nested/board.zip", b"PK")).unwrap();
        assert_eq!(std::fs::read(dir.path().join("nested/board.zip")).unwrap(), b"PK");
    }

    #[test]
    fn test_write_replaces_previous_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        tokio_test::block_on(async {
            storage.write_file("board.zip", b"first run").await.unwrap();
            storage.write_file("board.zip", b"PK").await.unwrap();
        });
        assert_eq!(std::fs::read(dir.path().join("board.zip")).unwrap(), b"PK");
    }

    #[test]
    fn test_write_below_a_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("taken"), b"").unwrap();
        let storage = LocalStorage::new(dir.path());

        let result = tokio_test::block_on(storage.write_file("taken/board.zip", b"PK"));
        assert!(matches!(result, Err(BoardError::IoError(_))));
    }
}
