//! Domain models and types for the patient manager.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Patient records** ([`PatientRecord`], [`HumanName`], [`Gender`], [`ContactPoint`], [`Photo`])
//! - **The ownership tag** ([`OwnershipTag`]) scoping every remote query
//! - **Strongly-typed identifiers** ([`PatientId`])
//! - **Error types** ([`AppError`], [`ValidationError`], [`FhirError`], [`UploadError`])
//! - **Result type alias** ([`Result`])
//!
//! # Builder Pattern
//!
//! ```rust
//! use patient_manager::domain::{Gender, PatientRecord};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let draft = PatientRecord::builder()
//!     .given(["Jane"])
//!     .family("Doe")
//!     .gender(Gender::Female)
//!     .phone("+234 555 0100")
//!     .build()?;
//!
//! assert!(draft.id.is_none());
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod patient;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{AppError, FhirError, UploadError, ValidationError};
pub use ids::PatientId;
pub use patient::{
    BirthDate, Coding, ContactPoint, ContactSystem, Gender, HumanName, OwnershipTag,
    PatientRecord, PatientRecordBuilder, Photo,
};
pub use result::Result;
