//! FHIR adapter implementation
//!
//! This module provides the integration with the FHIR resource repository:
//! the [`PatientApi`] trait, its reqwest implementation [`FhirClient`], and the
//! FHIR JSON wire models.

pub mod client;
pub mod models;

pub use client::{FhirClient, PatientApi};
pub use models::{Bundle, BundleEntry, PatientResource};
