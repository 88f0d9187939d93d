// src/storage.rs

use std::path::{Path, PathBuf};

use futures::future::try_join_all;

use crate::errors::AppError;
use crate::staging::StagedImage;

/// Writes staged image bytes into a fixed directory, one file per staged
/// image, named after the original upload. Same-name files silently
/// overwrite.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ImageStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the storage directory. Called once at startup so writes never
    /// race directory creation.
    pub async fn prepare(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Writes all staged images, concurrently with each other, and waits for
    /// every write before returning. The first failure fails the whole batch.
    pub async fn store_all(&self, images: &[StagedImage]) -> Result<Vec<PathBuf>, AppError> {
        let writes = images.iter().map(|image| self.store_one(image));
        let paths = try_join_all(writes).await?;
        tracing::info!(
            "Wrote {} image(s) to {}",
            paths.len(),
            self.root.display()
        );
        Ok(paths)
    }

    async fn store_one(&self, image: &StagedImage) -> Result<PathBuf, AppError> {
        // Target name derives from the original filename; any client-supplied
        // path components are stripped.
        let name = Path::new(&image.filename)
            .file_name()
            .ok_or_else(|| {
                AppError::UnprocessableEntity(format!(
                    "Unusable image filename: '{}'",
                    image.filename
                ))
            })?;
        let target = self.root.join(name);
        tokio::fs::write(&target, &image.bytes).await?;
        tracing::debug!("Stored image {}", target.display());
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    fn staged(preview_id: u64, filename: &str, bytes: &'static [u8]) -> StagedImage {
        StagedImage {
            preview_id,
            filename: filename.to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[tokio::test]
    async fn store_all_writes_every_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let paths = store
            .store_all(&[
                staged(1, "front.jpg", b"front-bytes"),
                staged(2, "side.jpg", b"side-bytes"),
            ])
            .await
            .unwrap();

        assert_eq!(paths.len(), 2);
        assert_eq!(std::fs::read(dir.path().join("front.jpg")).unwrap(), b"front-bytes");
        assert_eq!(std::fs::read(dir.path().join("side.jpg")).unwrap(), b"side-bytes");
    }

    #[tokio::test]
    async fn same_name_silently_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        store.store_all(&[staged(1, "unit.jpg", b"old")]).await.unwrap();
        store.store_all(&[staged(2, "unit.jpg", b"new")]).await.unwrap();

        assert_eq!(std::fs::read(dir.path().join("unit.jpg")).unwrap(), b"new");
    }

    #[tokio::test]
    async fn client_supplied_path_components_are_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        store
            .store_all(&[staged(1, "../../escape.jpg", b"bytes")])
            .await
            .unwrap();

        assert!(dir.path().join("escape.jpg").exists());
        assert!(!dir.path().parent().unwrap().join("escape.jpg").exists());
    }

    #[tokio::test]
    async fn prepare_creates_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().join("storage").join("units"));
        store.prepare().await.unwrap();
        assert!(store.root().is_dir());
    }
}
