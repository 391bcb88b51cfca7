//! # Patient Manager - FHIR patient record administration
//!
//! Patient Manager lists, creates, edits and deletes patient records held on a
//! FHIR server, including an optional profile photo stored on an image host.
//!
//! ## Overview
//!
//! - **Resource client**: stateless CRUD and search over `Patient` resources
//! - **Store**: observable in-memory collection, mutated only after the server
//!   confirmed a change
//! - **Controller**: validates form input, calls the client, reconciles the
//!   store
//!
//! Every record this tool writes carries an ownership tag, and every read asks
//! the server for tagged records only, so a shared FHIR server can hold
//! unrelated patients without them showing up here.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface (the view layer)
//! - [`core`] - Store, search, form and controller
//! - [`adapters`] - External integrations (FHIR server, image host)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use patient_manager::cli::commands::build_controller;
//! use patient_manager::config::load_config_or_default;
//! use patient_manager::core::form::{GenderSelection, PatientForm};
//! use patient_manager::domain::Gender;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("patient-manager.toml")?;
//!     let mut controller = build_controller(&config)?;
//!
//!     let mut form = PatientForm::new();
//!     form.given = "Jane".to_string();
//!     form.family = "Doe".to_string();
//!     form.gender = GenderSelection::Selected(Gender::Female);
//!
//!     let created = controller.save(&form).await?;
//!     println!("Created {:?}", created.id);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`], whose error type
//! [`domain::AppError`] wraps validation, FHIR and upload failures:
//!
//! ```rust,no_run
//! use patient_manager::domain::{AppError, FhirError};
//!
//! fn describe(err: &AppError) -> &'static str {
//!     match err {
//!         AppError::Validation(_) => "rejected before sending",
//!         AppError::Fhir(FhirError::NotFound(_)) => "no such patient",
//!         _ => "remote failure",
//!     }
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
