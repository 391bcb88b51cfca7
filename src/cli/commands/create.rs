//! Create command implementation

use super::{print_patient, report_failure, setup, submit, PatientFields, EXIT_OK};
use crate::config::AppConfig;
use crate::core::form::PatientForm;
use clap::Args;

/// Arguments for the create command
///
/// Omitting `--gender` leaves the selection unset, which validation rejects.
#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub fields: PatientFields,
}

impl CreateArgs {
    /// Execute the create command
    pub async fn execute(&self, config: &AppConfig) -> anyhow::Result<i32> {
        let mut form = PatientForm::new();
        self.fields.apply(&mut form);

        let mut controller = match setup(config) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        match submit(&mut controller, &mut form, self.fields.photo.as_ref()).await {
            Ok(record) => {
                println!("✅ Patient created");
                print_patient(&record);
                Ok(EXIT_OK)
            }
            Err((notice, e)) => Ok(report_failure(&notice, &e)),
        }
    }
}
