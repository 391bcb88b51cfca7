//! CLI command implementations
//!
//! Commands print human-readable results on stdout and return a process exit
//! code. Library errors are mapped to codes by [`exit_code`].

pub mod create;
pub mod delete;
pub mod init;
pub mod list;
pub mod show;
pub mod update;
pub mod upload;
pub mod validate;

use crate::adapters::fhir::FhirClient;
use crate::adapters::upload::CloudinaryUploader;
use crate::config::AppConfig;
use crate::core::controller::PatientController;
use crate::core::form::{GenderSelection, PatientForm};
use crate::domain::{AppError, Gender, PatientRecord};
use clap::Args;
use std::path::PathBuf;

/// Command completed
pub const EXIT_OK: i32 = 0;
/// A remote operation failed
pub const EXIT_FAILED: i32 = 1;
/// Configuration could not be loaded or is invalid
pub const EXIT_CONFIG: i32 = 2;
/// Input was rejected before any request was made
pub const EXIT_VALIDATION: i32 = 3;
/// Unexpected local failure
pub const EXIT_FATAL: i32 = 5;

/// Controller wired to the real FHIR server and image host
pub type CliController = PatientController<FhirClient, CloudinaryUploader>;

/// Build the controller from configuration
pub fn build_controller(config: &AppConfig) -> crate::domain::Result<CliController> {
    let api = FhirClient::new(&config.fhir)?;
    let uploader = CloudinaryUploader::new(&config.upload)?;
    Ok(PatientController::new(api, uploader).with_photo_content_type(&config.upload.content_type))
}

/// Build the controller, printing the failure and returning the exit code
pub(crate) fn setup(config: &AppConfig) -> Result<CliController, i32> {
    build_controller(config).map_err(|e| {
        println!("❌ Failed to set up clients");
        println!("   Error: {e}");
        EXIT_CONFIG
    })
}

/// Map a library error to a process exit code
pub fn exit_code(error: &AppError) -> i32 {
    match error {
        AppError::Validation(_) => EXIT_VALIDATION,
        AppError::Configuration(_) => EXIT_CONFIG,
        AppError::Fhir(_) | AppError::Upload(_) => EXIT_FAILED,
        AppError::Serialization(_) | AppError::Io(_) | AppError::Other(_) => EXIT_FATAL,
    }
}

/// Print the notice for a failed action and return its exit code
///
/// Validation failures show their own message; other failures show the
/// generic `notice` followed by the error.
pub fn report_failure(notice: &str, error: &AppError) -> i32 {
    match error {
        AppError::Validation(e) => println!("❌ {e}"),
        _ => {
            println!("❌ {notice}");
            println!("   Error: {error}");
        }
    }
    exit_code(error)
}

/// Placeholder for absent values in listings
pub const PLACEHOLDER: &str = "—";

/// Patient fields shared by `create` and `update`
///
/// Every flag that is present overrides the corresponding form field.
#[derive(Args, Debug, Default, Clone)]
pub struct PatientFields {
    /// Given names, separated by spaces
    #[arg(long)]
    pub given: Option<String>,

    /// Family name
    #[arg(long)]
    pub family: Option<String>,

    /// Gender (male, female, other, unknown)
    #[arg(long)]
    pub gender: Option<Gender>,

    /// Birth date (YYYY, YYYY-MM or YYYY-MM-DD)
    #[arg(long)]
    pub birth_date: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Address text
    #[arg(long)]
    pub address: Option<String>,

    /// Image file to upload as the profile photo
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

impl PatientFields {
    /// Write the given flags into `form`
    pub fn apply(&self, form: &mut PatientForm) {
        let overrides = [
            (&self.given, &mut form.given),
            (&self.family, &mut form.family),
            (&self.birth_date, &mut form.birth_date),
            (&self.phone, &mut form.phone),
            (&self.email, &mut form.email),
            (&self.address, &mut form.address),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }

        if let Some(gender) = self.gender {
            form.gender = GenderSelection::Selected(gender);
        }
    }
}

/// Validate the form, upload the photo if one was given, then save
///
/// Validation runs before the upload so a rejected form sends nothing.
pub(crate) async fn submit(
    controller: &mut CliController,
    form: &mut PatientForm,
    photo: Option<&PathBuf>,
) -> Result<PatientRecord, (String, AppError)> {
    const SAVE_FAILED: &str = "Failed to save patient. Please try again.";

    form.validate()
        .map_err(|e| (SAVE_FAILED.to_string(), AppError::from(e)))?;

    if let Some(path) = photo {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            (
                format!("Could not read {}", path.display()),
                AppError::from(e),
            )
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "photo".to_string());

        controller
            .upload_photo(form, &file_name, bytes)
            .await
            .map_err(|e| ("Image upload failed.".to_string(), e))?;
    }

    controller
        .save(form)
        .await
        .map_err(|e| (SAVE_FAILED.to_string(), e))
}

/// Print a record's fields
pub(crate) fn print_patient(record: &PatientRecord) {
    let id = record.id.as_ref().map(|i| i.to_string());
    println!("  Id:         {}", id.as_deref().unwrap_or(PLACEHOLDER));
    println!("  Name:       {}", record.name.full_name());
    println!(
        "  Gender:     {}",
        record.gender.map(|g| g.to_string()).as_deref().unwrap_or(PLACEHOLDER)
    );
    println!(
        "  Birth date: {}",
        record
            .birth_date
            .map(|d| d.to_string())
            .as_deref()
            .unwrap_or(PLACEHOLDER)
    );
    println!("  Phone:      {}", record.phone().unwrap_or(PLACEHOLDER));
    println!("  Email:      {}", record.email().unwrap_or(PLACEHOLDER));
    println!(
        "  Address:    {}",
        record.address.as_deref().unwrap_or(PLACEHOLDER)
    );
    println!(
        "  Photo:      {}",
        record.photo.as_ref().map(|p| p.url.as_str()).unwrap_or(PLACEHOLDER)
    );
}
