//! External system integrations.
//!
//! - [`fhir`] - FHIR resource repository (patient CRUD and search)
//! - [`upload`] - Image host for profile photos
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits ([`fhir::PatientApi`],
//! [`upload::ImageUploader`]) so the controller can be exercised with
//! in-memory implementations.
//!
//! ```rust,no_run
//! use patient_manager::adapters::fhir::{FhirClient, PatientApi};
//! use patient_manager::config::FhirConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FhirConfig {
//!     base_url: "https://fhir.example.com/r4".to_string(),
//!     timeout_seconds: Some(30),
//! };
//!
//! let client = FhirClient::new(&config)?;
//! let patients = client.list(None).await?;
//! # Ok(())
//! # }
//! ```

pub mod fhir;
pub mod upload;
