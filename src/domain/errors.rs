//! Domain error types
//!
//! This module defines the error hierarchy for the patient manager.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main application error type
///
/// This is the primary error type used throughout the library.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Local validation errors raised before any remote call
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Image upload errors
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// FHIR resource API errors
    #[error("FHIR error: {0}")]
    Fhir(#[from] FhirError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Form validation errors
///
/// Raised locally when a draft cannot be submitted. A validation failure
/// never results in a network request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Given name is empty
    #[error("Given name is required")]
    MissingGivenName,

    /// Family name is empty
    #[error("Family name is required")]
    MissingFamilyName,

    /// Gender left at the unselected sentinel
    #[error("Please select a gender")]
    GenderNotSelected,

    /// Birth date is not an ISO date of year, month or day precision
    #[error("Invalid birth date '{0}', expected YYYY, YYYY-MM or YYYY-MM-DD")]
    InvalidBirthDate(String),

    /// Patient identifier is malformed
    #[error("Invalid patient id: {0}")]
    InvalidId(String),
}

/// FHIR-specific errors
///
/// Errors that occur when talking to the FHIR resource repository.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum FhirError {
    /// Transport failure (connection refused, DNS, TLS, timeout)
    #[error("Failed to reach FHIR server: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("FHIR server returned {status}: {body}")]
    Remote { status: u16, body: String },

    /// No matching resource
    #[error("Patient not found: {0}")]
    NotFound(String),

    /// The call was rejected locally before any request was made
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Response body could not be understood
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

/// Image upload errors
#[derive(Debug, Error)]
pub enum UploadError {
    /// Nothing to upload
    #[error("Please select an image before uploading.")]
    EmptyFile,

    /// The image host rejected the upload
    #[error("{message} (status {status})")]
    Rejected { status: u16, message: String },

    /// Transport failure while uploading
    #[error("Image upload failed: {0}")]
    Network(String),

    /// The image host answered without a usable URL
    #[error("Invalid upload response: {0}")]
    InvalidResponse(String),
}

impl FhirError {
    /// Returns the HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            FhirError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl AppError {
    /// True when the error was raised by local validation
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    /// True when the FHIR server reported the patient as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Fhir(FhirError::NotFound(_)))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: AppError = ValidationError::GenderNotSelected.into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Validation error: Please select a gender");
    }

    #[test]
    fn test_fhir_error_conversion() {
        let err: AppError = FhirError::NotFound("abc".to_string()).into();
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_remote_error_status() {
        let err = FhirError::Remote {
            status: 422,
            body: "unprocessable".to_string(),
        };
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "FHIR server returned 422: unprocessable");
        assert_eq!(FhirError::Network("refused".to_string()).status(), None);
    }

    #[test]
    fn test_upload_error_conversion() {
        let err: AppError = UploadError::EmptyFile.into();
        assert!(matches!(err, AppError::Upload(UploadError::EmptyFile)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: AppError = io_err.into();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: AppError = json_err.into();
        assert!(matches!(err, AppError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: AppError = toml_err.into();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let _: &dyn std::error::Error = &AppError::Other("x".to_string());
        let _: &dyn std::error::Error = &FhirError::Network("x".to_string());
        let _: &dyn std::error::Error = &UploadError::EmptyFile;
    }
}
