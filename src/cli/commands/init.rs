//! Init command implementation
//!
//! Writes a commented sample configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "patient-manager.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        match fs::write(&self.output, sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Point [fhir].base_url at your FHIR server (or set FHIR_BASE_URL)");
                println!("  2. Set [upload].endpoint to your image host upload URL");
                println!("  3. Validate configuration: patient-manager validate-config");
                println!("  4. List patients: patient-manager list");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }
}

fn sample_config() -> &'static str {
    r#"# Patient Manager configuration

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

[fhir]
# Base URL of the FHIR server; FHIR_BASE_URL overrides it
base_url = "http://localhost:3001/fhir"
# Request timeout in seconds (omit for the transport default)
# timeout_seconds = 30

[upload]
# Unsigned image upload endpoint
endpoint = "https://api.cloudinary.com/v1_1/dfvbzldhu/image/upload"
upload_preset = "unsigned_preset"
# MIME type recorded on patient photos
content_type = "image/jpeg"

[logging]
# JSON file logging
local_enabled = false
local_path = "./logs"
# daily | hourly | never
local_rotation = "daily"
"#
}
