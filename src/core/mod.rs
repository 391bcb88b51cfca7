//! Core patient management logic.
//!
//! # Modules
//!
//! - [`store`] - Observable in-memory patient collection
//! - [`search`] - Client-side filtering and display ordering
//! - [`form`] - Form state, validation and draft building
//! - [`controller`] - Orchestration of list, save, delete and photo upload
//!
//! # Workflow
//!
//! 1. **Load**: fetch owned patients into the empty store
//! 2. **Search**: filter the store snapshot locally
//! 3. **Edit**: derive a form from the selected record, validate, submit
//! 4. **Reconcile**: apply the server's answer to the store
//!
//! # Example
//!
//! ```rust,no_run
//! use patient_manager::adapters::fhir::FhirClient;
//! use patient_manager::adapters::upload::CloudinaryUploader;
//! use patient_manager::config::AppConfig;
//! use patient_manager::core::controller::PatientController;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let api = FhirClient::new(&config.fhir)?;
//! let uploader = CloudinaryUploader::new(&config.upload)?;
//!
//! let mut controller = PatientController::new(api, uploader);
//! controller.load().await?;
//!
//! for patient in controller.search("doe") {
//!     println!("{}", patient.name.full_name());
//! }
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod form;
pub mod search;
pub mod store;
