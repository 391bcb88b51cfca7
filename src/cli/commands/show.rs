//! Show command implementation

use super::{print_patient, report_failure, setup, EXIT_OK, EXIT_VALIDATION};
use crate::adapters::fhir::PatientApi;
use crate::config::AppConfig;
use crate::domain::PatientId;
use clap::Args;

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Patient id
    pub id: String,
}

impl ShowArgs {
    /// Execute the show command
    pub async fn execute(&self, config: &AppConfig) -> anyhow::Result<i32> {
        let id = match PatientId::new(&self.id) {
            Ok(id) => id,
            Err(e) => {
                println!("❌ {e}");
                return Ok(EXIT_VALIDATION);
            }
        };

        let controller = match setup(config) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        match controller.api().get(&id).await {
            Ok(record) => {
                println!("Patient {id}");
                print_patient(&record);
                Ok(EXIT_OK)
            }
            Err(e) => Ok(report_failure("Failed to load patient.", &e)),
        }
    }
}
