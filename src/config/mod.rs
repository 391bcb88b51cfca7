//! Configuration management for the patient manager.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for every setting
//! - Environment overrides (`FHIR_BASE_URL`, `PATIENTS_<SECTION>_<KEY>`)
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use patient_manager::config::load_config_or_default;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_or_default("patient-manager.toml")?;
//! println!("FHIR server: {}", config.fhir.base_url);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`FhirConfig`] - FHIR resource server base URL and timeout
//! - [`UploadConfig`] - Image host endpoint and unsigned upload preset
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [fhir]
//! base_url = "${FHIR_SERVER_URL}"
//!
//! [upload]
//! endpoint = "https://api.cloudinary.com/v1_1/demo/image/upload"
//! upload_preset = "unsigned_preset"
//!
//! [logging]
//! local_enabled = true
//! local_path = "./logs"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default, FHIR_BASE_URL_ENV};
pub use schema::{AppConfig, ApplicationConfig, FhirConfig, LoggingConfig, UploadConfig};
