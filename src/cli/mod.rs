//! CLI interface and argument parsing
//!
//! The command line is the view layer: each subcommand drives the patient
//! controller and renders its result.

pub mod commands;

use clap::{Parser, Subcommand};

/// Patient Manager - FHIR patient record administration
#[derive(Parser, Debug)]
#[command(name = "patient-manager")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "patient-manager.toml",
        env = "PATIENTS_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PATIENTS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List patients managed by this application
    List(commands::list::ListArgs),

    /// Show a single patient
    Show(commands::show::ShowArgs),

    /// Create a patient
    Create(commands::create::CreateArgs),

    /// Update a patient; omitted fields keep their current value
    Update(commands::update::UpdateArgs),

    /// Delete a patient
    Delete(commands::delete::DeleteArgs),

    /// Upload a profile image and print its URL
    Upload(commands::upload::UploadArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Commands {
    /// True for commands that run without a loaded configuration
    pub fn is_standalone(&self) -> bool {
        matches!(self, Commands::ValidateConfig(_) | Commands::Init(_))
    }
}
