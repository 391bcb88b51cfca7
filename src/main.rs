use patient_manager::cli::commands::{EXIT_CONFIG, EXIT_FATAL};
use patient_manager::cli::{Cli, Commands};
use patient_manager::config::{load_config_or_default, AppConfig, LoggingConfig};
use patient_manager::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = load_config_or_default(&cli.config);

    // Logging comes up even with a broken config so the failure gets reported
    let (log_level, logging_config) = match &config {
        Ok(c) => (
            cli.log_level
                .clone()
                .unwrap_or_else(|| c.application.log_level.clone()),
            c.logging.clone(),
        ),
        Err(_) => (
            cli.log_level.clone().unwrap_or_else(|| "info".to_string()),
            LoggingConfig::default(),
        ),
    };
    let _guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Patient Manager");

    let exit_code = if cli.command.is_standalone() {
        execute_command(&cli, None).await
    } else {
        match config {
            Ok(config) => execute_command(&cli, Some(&config)).await,
            Err(e) => {
                tracing::error!(error = %e, config_path = %cli.config, "Configuration failed");
                eprintln!("Error: {e}");
                Ok(EXIT_CONFIG)
            }
        }
    };

    let exit_code = exit_code.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Command execution failed");
        eprintln!("Error: {e}");
        EXIT_FATAL
    });

    // Flush the file writer before exiting
    drop(_guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, config: Option<&AppConfig>) -> anyhow::Result<i32> {
    let require_config = || config.ok_or_else(|| anyhow::anyhow!("configuration not loaded"));

    match &cli.command {
        Commands::List(args) => args.execute(require_config()?).await,
        Commands::Show(args) => args.execute(require_config()?).await,
        Commands::Create(args) => args.execute(require_config()?).await,
        Commands::Update(args) => args.execute(require_config()?).await,
        Commands::Delete(args) => args.execute(require_config()?).await,
        Commands::Upload(args) => args.execute(require_config()?).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
