//! Image upload adapter
//!
//! Profile photos are hosted on a third-party image service. The
//! [`ImageUploader`] trait is the seam; [`CloudinaryUploader`] is the
//! reqwest implementation.

pub mod cloudinary;

use crate::domain::Result;
use async_trait::async_trait;

pub use cloudinary::CloudinaryUploader;

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// HTTPS URL of the hosted image, becomes `photo.url` on the next save
    pub secure_url: String,
}

/// Uploads image bytes to an image host
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Upload one file
    ///
    /// # Errors
    ///
    /// `UploadError::EmptyFile` for an empty payload, `Rejected` when the host
    /// refuses the upload, `Network` on transport failure.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadedImage>;
}
