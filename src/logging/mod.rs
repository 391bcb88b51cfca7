//! Logging and observability
//!
//! Structured logging through `tracing`: console output on stderr at the
//! configured level, plus an optional rolling JSON file.
//!
//! # Example
//!
//! ```no_run
//! use patient_manager::config::LoggingConfig;
//! use patient_manager::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log a failed remote call
///
/// # Example
///
/// ```no_run
/// use patient_manager::domain::{AppError, FhirError};
/// use patient_manager::log_remote_failure;
///
/// let error: AppError = FhirError::Network("connection refused".to_string()).into();
/// log_remote_failure!("list", &error);
/// ```
#[macro_export]
macro_rules! log_remote_failure {
    ($operation:expr, $error:expr) => {
        tracing::error!(
            operation = $operation,
            error = %$error,
            "Remote call failed"
        );
    };
}

/// Log a patient change that has been applied to the store
///
/// # Example
///
/// ```no_run
/// use patient_manager::domain::PatientId;
/// use patient_manager::log_patient_change;
///
/// let id = PatientId::new("123").unwrap();
/// log_patient_change!("deleted", &id);
/// ```
#[macro_export]
macro_rules! log_patient_change {
    ($action:expr, $patient_id:expr) => {
        tracing::info!(
            action = $action,
            patient_id = %$patient_id,
            "Patient changed"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::{AppError, FhirError, PatientId};

    #[test]
    fn test_macros_expand() {
        let error: AppError = FhirError::NotFound("1".to_string()).into();
        log_remote_failure!("get", &error);

        let id = PatientId::new("1").unwrap();
        log_patient_change!("created", &id);
    }
}
