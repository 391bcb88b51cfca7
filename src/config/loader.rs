//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::AppConfig;
use crate::domain::errors::AppError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Environment variable holding the FHIR base URL, as the deployment sets it
pub const FHIR_BASE_URL_ENV: &str = "FHIR_BASE_URL";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into AppConfig
/// 4. Applies environment variable overrides (PATIENTS_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use patient_manager::config::loader::load_config;
///
/// let config = load_config("patient-manager.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AppError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        AppError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: AppConfig = toml::from_str(&contents)
        .map_err(|e| AppError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        AppError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Loads configuration from a TOML file if it exists, otherwise from defaults
///
/// Environment overrides and validation apply in both cases, so a bare
/// `FHIR_BASE_URL` is enough to point the tool at a server.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(
        path = %path.display(),
        "Configuration file not found, using defaults"
    );

    let mut config = AppConfig::default();
    apply_env_overrides(&mut config);
    config.validate().map_err(|e| {
        AppError::Configuration(format!("Configuration validation failed: {e}"))
    })?;
    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| AppError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(AppError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides
///
/// `FHIR_BASE_URL` is honoured first; the prefixed variables follow the
/// pattern PATIENTS_<SECTION>_<KEY> and take precedence.
fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(val) = std::env::var(FHIR_BASE_URL_ENV) {
        if !val.is_empty() {
            config.fhir.base_url = val;
        }
    }

    // Application overrides
    if let Ok(val) = std::env::var("PATIENTS_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // FHIR overrides
    if let Ok(val) = std::env::var("PATIENTS_FHIR_BASE_URL") {
        config.fhir.base_url = val;
    }
    if let Ok(val) = std::env::var("PATIENTS_FHIR_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.fhir.timeout_seconds = Some(secs);
        }
    }

    // Upload overrides
    if let Ok(val) = std::env::var("PATIENTS_UPLOAD_ENDPOINT") {
        config.upload.endpoint = val;
    }
    if let Ok(val) = std::env::var("PATIENTS_UPLOAD_PRESET") {
        config.upload.upload_preset = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("PATIENTS_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PATIENTS_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("PM_LOADER_TEST_PRESET", "clinic_preset");
        let input = "upload_preset = \"${PM_LOADER_TEST_PRESET}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "upload_preset = \"clinic_preset\"");
        std::env::remove_var("PM_LOADER_TEST_PRESET");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("PM_LOADER_MISSING_VAR");
        let input = "base_url = \"${PM_LOADER_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("PM_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("PM_LOADER_COMMENTED_VAR");
        let input = "# base_url = \"${PM_LOADER_COMMENTED_VAR}\"\n[fhir]";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-patient-manager.toml");
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[fhir]
base_url = "https://fhir.example.com/r4"
timeout_seconds = 20

[upload]
upload_preset = "clinic"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.fhir.timeout_seconds, Some(20));
        assert_eq!(config.upload.upload_preset, "clinic");
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[fhir\nbase_url = 1").unwrap();
        temp_file.flush().unwrap();

        let result = load_config(temp_file.path());
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
