//! Update command implementation
//!
//! The form is derived from the stored record, then the given flags override
//! individual fields before the full record is sent back.

use super::{print_patient, report_failure, setup, submit, PatientFields, EXIT_OK, EXIT_VALIDATION};
use crate::config::AppConfig;
use crate::domain::PatientId;
use clap::Args;

/// Arguments for the update command
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Patient id
    pub id: String,

    #[command(flatten)]
    pub fields: PatientFields,
}

impl UpdateArgs {
    /// Execute the update command
    pub async fn execute(&self, config: &AppConfig) -> anyhow::Result<i32> {
        let id = match PatientId::new(&self.id) {
            Ok(id) => id,
            Err(e) => {
                println!("❌ {e}");
                return Ok(EXIT_VALIDATION);
            }
        };

        let mut controller = match setup(config) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        let mut form = match controller.open(&id).await {
            Ok(form) => form,
            Err(e) => return Ok(report_failure("Failed to load patient.", &e)),
        };
        self.fields.apply(&mut form);

        match submit(&mut controller, &mut form, self.fields.photo.as_ref()).await {
            Ok(record) => {
                println!("✅ Patient updated");
                print_patient(&record);
                Ok(EXIT_OK)
            }
            Err((notice, e)) => Ok(report_failure(&notice, &e)),
        }
    }
}
