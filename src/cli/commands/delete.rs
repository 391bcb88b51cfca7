//! Delete command implementation

use super::{report_failure, setup, EXIT_OK, EXIT_VALIDATION};
use crate::config::AppConfig;
use crate::domain::PatientId;
use clap::Args;

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Patient id
    pub id: String,

    /// Confirm the deletion; it cannot be undone
    #[arg(short, long)]
    pub yes: bool,
}

impl DeleteArgs {
    /// Execute the delete command
    pub async fn execute(&self, config: &AppConfig) -> anyhow::Result<i32> {
        let id = match PatientId::new(&self.id) {
            Ok(id) => id,
            Err(e) => {
                println!("❌ {e}");
                return Ok(EXIT_VALIDATION);
            }
        };

        if !self.yes {
            println!("⚠️  This will permanently delete patient {id}.");
            println!("   Re-run with --yes to confirm");
            return Ok(EXIT_VALIDATION);
        }

        let mut controller = match setup(config) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        match controller.delete(&id).await {
            Ok(()) => {
                println!("✅ Patient {id} deleted");
                Ok(EXIT_OK)
            }
            Err(e) => Ok(report_failure("Failed to delete patient. Please try again.", &e)),
        }
    }
}
