//! Upload command implementation
//!
//! Uploads an image to the configured host and prints its URL, which can then
//! be attached to a patient.

use super::{report_failure, setup, EXIT_FATAL, EXIT_OK};
use crate::config::AppConfig;
use crate::core::form::PatientForm;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the upload command
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Image file to upload
    pub file: PathBuf,
}

impl UploadArgs {
    /// Execute the upload command
    pub async fn execute(&self, config: &AppConfig) -> anyhow::Result<i32> {
        let bytes = match tokio::fs::read(&self.file).await {
            Ok(b) => b,
            Err(e) => {
                println!("❌ Could not read {}", self.file.display());
                println!("   Error: {e}");
                return Ok(EXIT_FATAL);
            }
        };
        let file_name = self
            .file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "photo".to_string());

        let controller = match setup(config) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        let mut form = PatientForm::new();
        match controller.upload_photo(&mut form, &file_name, bytes).await {
            Ok(url) => {
                println!("✅ Image uploaded");
                println!("   {url}");
                Ok(EXIT_OK)
            }
            Err(e) => Ok(report_failure("Image upload failed.", &e)),
        }
    }
}
