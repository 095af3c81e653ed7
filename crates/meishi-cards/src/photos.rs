//! Profile photo storage
//!
//! Photos are written under `{root}/{user_id}/{millis}_{filename}` and
//! addressed publicly as `{base}/photos/{user_id}/{millis}_{filename}`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use meishi_core::{Error, Result};
use tracing::{debug, info};

/// Filesystem-backed blob store for card photos
#[derive(Debug, Clone)]
pub struct PhotoStore {
    root: PathBuf,
    public_base_url: String,
}

impl PhotoStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `bytes` for `user_id` and return the photo's public URL
    pub async fn upload(&self, user_id: &str, filename: &str, bytes: &[u8]) -> Result<String> {
        let user = sanitize_segment(user_id);
        if user.is_empty() {
            return Err(Error::ValidationFailed("photo owner is required".to_string()));
        }

        let name = sanitize_segment(filename);
        let name = if name.is_empty() { "photo".to_string() } else { name };
        let key = format!("{}/{}_{}", user, Utc::now().timestamp_millis(), name);

        let path = self.root.join(&key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        info!("Uploaded photo {}", key);
        Ok(self.url_for(&key))
    }

    /// Public URL for a stored key
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/photos/{}", self.public_base_url, key)
    }
}

/// Keep a single path segment: no separators, no parent references
fn sanitize_segment(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_writes_file_and_returns_url() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = PhotoStore::new(dir.path(), "https://meishi.example/");

        let url = store.upload("u1", "face.png", b"png-bytes").await?;
        assert!(url.starts_with("https://meishi.example/photos/u1/"));
        assert!(url.ends_with("_face.png"));

        let key = url.trim_start_matches("https://meishi.example/photos/");
        let written = tokio::fs::read(dir.path().join(key)).await?;
        assert_eq!(written, b"png-bytes");
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_cannot_escape_root() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = PhotoStore::new(dir.path(), "http://localhost");

        let url = store.upload("../other", "../../etc/passwd", b"x").await?;
        let key = url.trim_start_matches("http://localhost/photos/");
        assert_eq!(key.split('/').count(), 2);
        assert!(key.starts_with("_other/"));
        assert!(dir.path().join(key).exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_requires_owner() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = PhotoStore::new(dir.path(), "http://localhost");
        assert!(matches!(
            store.upload("  ", "a.png", b"x").await,
            Err(Error::ValidationFailed(_))
        ));
        Ok(())
    }

    #[test]
    fn test_sanitize_segment() {
        assert_eq!(sanitize_segment("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_segment("..hidden"), "hidden");
        assert_eq!(sanitize_segment(" me.jpg "), "me.jpg");
    }
}
