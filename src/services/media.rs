// src/services/media.rs
//! Media store for avatar images
//!
//! A directory-backed blob store exposing the three operations the rest of
//! the system relies on: upload-by-key, public-URL-by-key and delete-by-key.
//! Objects are served back through `GET /api/avatars/{key}`.

use std::path::PathBuf;
use thiserror::Error;
use tokio::fs as tokio_fs;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media object not found")]
    NotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Directory-backed avatar store
pub struct MediaService {
    root: PathBuf,
}

impl MediaService {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Strips path traversal sequences and whitelists safe characters.
    /// Applied to every key before it touches the filesystem.
    pub fn sanitize_key(key: &str) -> String {
        let cleaned = key
            .replace("..", "")
            .replace('/', "")
            .replace('\\', "")
            .replace('\0', "");

        let sanitized: String = cleaned
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '.' || *c == '-' || *c == '_')
            .collect();

        let max_length = 255;
        let truncated: String = if sanitized.len() > max_length {
            sanitized.chars().take(max_length).collect()
        } else {
            sanitized
        };

        if truncated.is_empty() {
            "sanitized_file".to_string()
        } else {
            truncated
        }
    }

    /// Derives the store key from a public URL's trailing path segment
    pub fn key_from_public_url(url: &str) -> Option<String> {
        url.rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .map(Self::sanitize_key)
    }

    pub async fn upload(&self, key: &str, data: &[u8]) -> Result<(), MediaError> {
        let file_path = self.root.join(Self::sanitize_key(key));

        tokio_fs::write(&file_path, data).await.map_err(|e| {
            error!(error = %e, file_path = %file_path.display(), "Failed to write media object");
            MediaError::Io(e)
        })?;

        info!(key = %key, "Media object stored");

        Ok(())
    }

    /// Public URL for a stored object - relative, the client prepends the
    /// API base
    pub fn public_url(&self, key: &str) -> String {
        format!("/api/avatars/{}", Self::sanitize_key(key))
    }

    pub async fn delete(&self, key: &str) -> Result<(), MediaError> {
        let file_path = self.root.join(Self::sanitize_key(key));

        if !file_path.exists() {
            return Err(MediaError::NotFound);
        }

        tokio_fs::remove_file(&file_path).await?;

        info!(key = %key, "Media object deleted");

        Ok(())
    }

    pub async fn read(&self, key: &str) -> Result<Vec<u8>, MediaError> {
        let file_path = self.root.join(Self::sanitize_key(key));

        if !file_path.exists() {
            return Err(MediaError::NotFound);
        }

        Ok(tokio_fs::read(&file_path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(tag: &str) -> MediaService {
        let root = std::env::temp_dir().join(format!("spotlist-media-test-{}", tag));
        std::fs::create_dir_all(&root).unwrap();
        MediaService::new(root)
    }

    #[test]
    fn sanitize_key_strips_traversal_sequences() {
        assert_eq!(
            MediaService::sanitize_key("../../etc/passwd"),
            "etcpasswd".to_string()
        );
        assert_eq!(MediaService::sanitize_key("u1-17000.png"), "u1-17000.png");
        assert_eq!(MediaService::sanitize_key(""), "sanitized_file");
    }

    #[test]
    fn key_from_public_url_takes_trailing_segment() {
        assert_eq!(
            MediaService::key_from_public_url("/api/avatars/u1-1700000000000.png"),
            Some("u1-1700000000000.png".to_string())
        );
        assert_eq!(
            MediaService::key_from_public_url("https://cdn.example.com/bucket/u1-2.jpg"),
            Some("u1-2.jpg".to_string())
        );
        assert_eq!(MediaService::key_from_public_url("trailing/"), None);
    }

    #[test]
    fn public_url_points_at_avatar_route() {
        let media = temp_store("url");
        assert_eq!(media.public_url("u1-1.png"), "/api/avatars/u1-1.png");
    }

    #[tokio::test]
    async fn upload_read_delete_roundtrip() {
        let media = temp_store("roundtrip");

        media.upload("u1-42.png", b"image-bytes").await.unwrap();
        assert_eq!(media.read("u1-42.png").await.unwrap(), b"image-bytes");

        media.delete("u1-42.png").await.unwrap();
        assert!(matches!(
            media.read("u1-42.png").await,
            Err(MediaError::NotFound)
        ));
    }

    #[tokio::test]
    async fn delete_missing_object_reports_not_found() {
        let media = temp_store("missing");
        assert!(matches!(
            media.delete("nope.png").await,
            Err(MediaError::NotFound)
        ));
    }
}
