//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.
//! Every section has defaults, so an empty file (or no file) is a valid
//! configuration pointing at a local FHIR server.

use serde::{Deserialize, Serialize};

/// Main configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// FHIR resource server configuration
    #[serde(default)]
    pub fhir: FhirConfig,

    /// Image host configuration
    #[serde(default)]
    pub upload: UploadConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.fhir.validate()?;
        self.upload.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// FHIR resource server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FhirConfig {
    /// Base URL of the FHIR API, e.g. `http://localhost:3001/fhir`
    #[serde(default = "default_fhir_base_url")]
    pub base_url: String,

    /// Request timeout in seconds; the transport default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl FhirConfig {
    fn validate(&self) -> Result<(), String> {
        validate_http_url("fhir.base_url", &self.base_url)?;

        if self.timeout_seconds == Some(0) {
            return Err("fhir.timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for FhirConfig {
    fn default() -> Self {
        Self {
            base_url: default_fhir_base_url(),
            timeout_seconds: None,
        }
    }
}

/// Image host configuration (Cloudinary unsigned uploads)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Upload endpoint
    #[serde(default = "default_upload_endpoint")]
    pub endpoint: String,

    /// Unsigned upload preset identifier
    #[serde(default = "default_upload_preset")]
    pub upload_preset: String,

    /// MIME type recorded on the patient photo
    #[serde(default = "default_photo_content_type")]
    pub content_type: String,
}

impl UploadConfig {
    fn validate(&self) -> Result<(), String> {
        validate_http_url("upload.endpoint", &self.endpoint)?;

        if self.upload_preset.trim().is_empty() {
            return Err("upload.upload_preset cannot be empty".to_string());
        }

        if !self.content_type.starts_with("image/") {
            return Err(format!(
                "upload.content_type '{}' must be an image MIME type",
                self.content_type
            ));
        }
        Ok(())
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: default_upload_endpoint(),
            upload_preset: default_upload_preset(),
            content_type: default_photo_content_type(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{field} cannot be empty"));
    }

    let parsed = url::Url::parse(value).map_err(|e| format!("{field} is not a valid URL: {e}"))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(format!("{field} must start with http:// or https://"));
    }
    Ok(())
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_fhir_base_url() -> String {
    "http://localhost:3001/fhir".to_string()
}

fn default_upload_endpoint() -> String {
    "https://api.cloudinary.com/v1_1/dfvbzldhu/image/upload".to_string()
}

fn default_upload_preset() -> String {
    "unsigned_preset".to_string()
}

fn default_photo_content_type() -> String {
    "image/jpeg".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
