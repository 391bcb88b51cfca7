//! Cloudinary unsigned upload implementation
//!
//! Uploads are `multipart/form-data` POSTs with a `file` part and the
//! configured `upload_preset`; the response's `secure_url` is the hosted URL.

use super::{ImageUploader, UploadedImage};
use crate::config::UploadConfig;
use crate::domain::{AppError, Result, UploadError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

/// Message shown when the image host gives no reason
const GENERIC_UPLOAD_FAILURE: &str = "Image upload failed.";

/// Cloudinary uploader
pub struct CloudinaryUploader {
    endpoint: String,
    upload_preset: String,
    client: Client,
}

impl CloudinaryUploader {
    /// Create a new uploader from configuration
    pub fn new(config: &UploadConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            upload_preset: config.upload_preset.clone(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Extract `error.message` from a rejection body
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_UPLOAD_FAILURE.to_string())
}

#[async_trait]
impl ImageUploader for CloudinaryUploader {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadedImage> {
        if bytes.is_empty() {
            return Err(UploadError::EmptyFile.into());
        }

        let size = bytes.len();
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()))
            .text("upload_preset", self.upload_preset.clone());

        tracing::debug!(
            endpoint = %self.endpoint,
            file_name = %file_name,
            size_bytes = size,
            "Uploading image"
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&body),
            }
            .into());
        }

        let secure_url = serde_json::from_str::<UploadResponse>(&body)
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))?
            .secure_url
            .ok_or_else(|| UploadError::InvalidResponse("missing secure_url".to_string()))?;

        tracing::info!(url = %secure_url, "Uploaded image");

        Ok(UploadedImage { secure_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message_from_body() {
        let body = r#"{"error":{"message":"Upload preset not found"}}"#;
        assert_eq!(rejection_message(body), "Upload preset not found");
    }

    #[test]
    fn test_rejection_message_fallback() {
        assert_eq!(rejection_message("<html>bad gateway</html>"), GENERIC_UPLOAD_FAILURE);
        assert_eq!(rejection_message(r#"{"error":{}}"#), GENERIC_UPLOAD_FAILURE);
    }

    #[tokio::test]
    async fn test_empty_file_is_rejected_locally() {
        let uploader = CloudinaryUploader::new(&UploadConfig::default()).unwrap();
        let result = uploader.upload("photo.jpg", Vec::new()).await;
        assert!(matches!(result, Err(AppError::Upload(UploadError::EmptyFile))));
    }
}
