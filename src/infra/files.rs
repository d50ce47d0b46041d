//! Local-disk file storage for uploads.
//!
//! Files are stored under `<upload_dir>/<folder>/` with a generated uuid
//! name; the returned path is relative to the working directory and uses
//! forward slashes, suitable for storing in the database.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// File storage rooted at the configured upload directory
#[derive(Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: upload_dir.into(),
        }
    }

    /// Persist an uploaded file and return its relative path.
    ///
    /// The extension is taken from the client-supplied file name but
    /// sanitized to alphanumeric characters.
    pub async fn save(
        &self,
        data: &[u8],
        folder: &str,
        original_name: &str,
    ) -> AppResult<String> {
        if data.is_empty() {
            return Err(AppError::validation("Invalid file."));
        }

        let dir = self.base_dir.join(folder);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}{}", Uuid::new_v4(), Self::extension_of(original_name));
        tokio::fs::write(dir.join(&file_name), data).await?;

        let relative = format!(
            "{}/{}/{}",
            self.base_dir.display(),
            folder,
            file_name
        );
        Ok(relative.replace('\\', "/"))
    }

    /// Delete a previously saved file by its relative path.
    ///
    /// A missing file is not an error; the metadata row is the source of
    /// truth and the file may already be gone.
    pub async fn delete(&self, relative_path: &str) -> AppResult<()> {
        match tokio::fs::remove_file(Path::new(relative_path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = relative_path, "File already removed from disk");
                Ok(())
            }
            Err(e) => Err(AppError::from(e)),
        }
    }

    /// Sanitized extension including the leading dot, or empty
    fn extension_of(original_name: &str) -> String {
        Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_sanitized() {
        assert_eq!(FileStore::extension_of("photo.JPG"), ".jpg");
        assert_eq!(FileStore::extension_of("archive.tar.gz"), ".gz");
        assert_eq!(FileStore::extension_of("noext"), "");
        assert_eq!(FileStore::extension_of("photo.123"), ".123");
        // Non-alphanumeric extensions are dropped entirely
        assert_eq!(FileStore::extension_of("shell.p;ng"), "");
    }

    #[tokio::test]
    async fn test_save_and_delete_roundtrip() {
        let dir = std::env::temp_dir().join(format!("uploads-test-{}", Uuid::new_v4()));
        let store = FileStore::new(&dir);

        let path = store.save(b"fake image bytes", "employees", "pic.png").await.unwrap();
        assert!(path.ends_with(".png"));
        assert!(path.contains("employees/"));
        assert!(Path::new(&path).exists());

        store.delete(&path).await.unwrap();
        assert!(!Path::new(&path).exists());

        // Deleting again is not an error
        store.delete(&path).await.unwrap();

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_empty_payload_rejected() {
        let store = FileStore::new("uploads");
        let result = store.save(b"", "employees", "pic.png").await;
        assert!(result.is_err());
    }
}
