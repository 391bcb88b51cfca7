//! Validate config command implementation
//!
//! Loads the configuration file (with substitution and overrides applied),
//! validates it and prints a summary.

use super::{EXIT_CONFIG, EXIT_OK};
use crate::config::{load_config, AppConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        match load_config(config_path) {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!();
                print_summary(&config);
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(EXIT_CONFIG)
            }
        }
    }
}

fn print_summary(config: &AppConfig) {
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  FHIR Server: {}", config.fhir.base_url);
    match config.fhir.timeout_seconds {
        Some(secs) => println!("  Request Timeout: {secs}s"),
        None => println!("  Request Timeout: transport default"),
    }
    println!("  Upload Endpoint: {}", config.upload.endpoint);
    println!("  Upload Preset: {}", config.upload.upload_preset);
    if config.logging.local_enabled {
        println!(
            "  File Logging: {} ({})",
            config.logging.local_path, config.logging.local_rotation
        );
    } else {
        println!("  File Logging: disabled");
    }
    println!();
}
