//! Storage for uploaded product images.
//!
//! Images are addressed by a public URL path (`/uploads/images/<filename>`)
//! which is what gets persisted in `product_images.image_url`. The
//! [`ImageStore`] trait hides where the bytes live: [`DiskImageStore`] writes
//! under the configured upload directory (served statically by the API),
//! [`MemoryImageStore`] keeps them in a map for tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// URL path prefix under which stored images are published.
pub const IMAGE_URL_PREFIX: &str = "/uploads/images/";

/// Sub-directory of the upload root holding image files.
pub const IMAGE_SUBDIR: &str = "images";

/// Accepted image file extensions (lowercase).
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Message surfaced when a stored file cannot be removed.
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete image file.";

// ---------------------------------------------------------------------------
// Naming helpers
// ---------------------------------------------------------------------------

/// Extract and check the lowercase extension of an uploaded file name.
pub fn image_extension(original_name: &str) -> Result<String, CoreError> {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(CoreError::Validation(format!(
            "Unsupported image format '.{ext}'. Supported: {}",
            SUPPORTED_IMAGE_EXTENSIONS.join(", ")
        )))
    }
}

/// Generate a collision-free stored file name with the given extension.
pub fn unique_filename(ext: &str) -> String {
    format!(
        "{}-{}.{ext}",
        chrono::Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4().simple()
    )
}

/// Public URL path for a stored file name.
pub fn public_url(filename: &str) -> String {
    format!("{IMAGE_URL_PREFIX}{filename}")
}

/// Recover the stored file name from a public URL path.
///
/// Rejects anything outside [`IMAGE_URL_PREFIX`] or containing path
/// separators, so a tampered row can never address files elsewhere.
pub fn filename_from_url(image_url: &str) -> Result<&str, CoreError> {
    let name = image_url
        .strip_prefix(IMAGE_URL_PREFIX)
        .ok_or_else(|| CoreError::Storage(format!("Unrecognised image url '{image_url}'")))?;

    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(CoreError::Storage(format!(
            "Unrecognised image url '{image_url}'"
        )));
    }
    Ok(name)
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Result of storing an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// File name assigned by the store.
    pub filename: String,
    /// Public URL path persisted in the database.
    pub image_url: String,
}

/// Backend that persists uploaded image bytes.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `data` under a fresh unique name with extension `ext`.
    async fn save(&self, ext: &str, data: &[u8]) -> Result<StoredImage, CoreError>;

    /// Remove the file behind a public URL path.
    ///
    /// Fails with [`CoreError::Storage`] if the file cannot be removed.
    async fn remove(&self, image_url: &str) -> Result<(), CoreError>;

    /// Confirm the store can accept uploads.
    async fn check(&self) -> Result<(), CoreError>;
}

// ---------------------------------------------------------------------------
// Disk
// ---------------------------------------------------------------------------

/// Stores images as files under `<root>/images/`.
#[derive(Debug, Clone)]
pub struct DiskImageStore {
    root: PathBuf,
}

impl DiskImageStore {
    /// `root` is the upload directory; it is also what the API serves at `/uploads`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the image files.
    pub fn image_dir(&self) -> PathBuf {
        self.root.join(IMAGE_SUBDIR)
    }

    /// On-disk path of a stored file name.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.image_dir().join(filename)
    }
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn save(&self, ext: &str, data: &[u8]) -> Result<StoredImage, CoreError> {
        let dir = self.image_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to prepare upload dir: {e}")))?;

        let filename = unique_filename(ext);
        tokio::fs::write(dir.join(&filename), data)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to write image file: {e}")))?;

        Ok(StoredImage {
            image_url: public_url(&filename),
            filename,
        })
    }

    async fn remove(&self, image_url: &str) -> Result<(), CoreError> {
        let filename = filename_from_url(image_url)?;
        let path = self.path_for(filename);
        tokio::fs::remove_file(&path).await.map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Image file removal failed");
            CoreError::Storage(DELETE_FAILED_MESSAGE.to_string())
        })
    }

    async fn check(&self) -> Result<(), CoreError> {
        let dir = self.image_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to prepare upload dir: {e}")))?;
        let meta = tokio::fs::metadata(&dir)
            .await
            .map_err(|e| CoreError::Storage(format!("Upload dir unreadable: {e}")))?;
        if meta.permissions().readonly() {
            return Err(CoreError::Storage("Upload dir is read-only".to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Keeps image bytes in memory; used in place of the disk store by tests.
#[derive(Debug, Default)]
pub struct MemoryImageStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a file with this name is currently stored.
    pub fn contains(&self, filename: &str) -> bool {
        self.lock().contains_key(filename)
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop a file behind the store's back, as if it vanished from disk.
    pub fn evict(&self, filename: &str) -> bool {
        self.lock().remove(filename).is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A poisoned map is still structurally valid.
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn save(&self, ext: &str, data: &[u8]) -> Result<StoredImage, CoreError> {
        let filename = unique_filename(ext);
        self.lock().insert(filename.clone(), data.to_vec());
        Ok(StoredImage {
            image_url: public_url(&filename),
            filename,
        })
    }

    async fn remove(&self, image_url: &str) -> Result<(), CoreError> {
        let filename = filename_from_url(image_url)?;
        if self.lock().remove(filename).is_some() {
            Ok(())
        } else {
            Err(CoreError::Storage(DELETE_FAILED_MESSAGE.to_string()))
        }
    }

    async fn check(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
