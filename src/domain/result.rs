//! Result type alias for the patient manager
//!
//! This module provides a convenient Result type alias that uses AppError
//! as the error type.

use super::errors::AppError;

/// Result type alias for patient manager operations
///
/// # Examples
///
/// ```
/// use patient_manager::domain::result::Result;
/// use patient_manager::domain::errors::{AppError, ValidationError};
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(AppError::Validation(ValidationError::MissingFamilyName))
/// }
/// ```
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{AppError, ValidationError};

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(AppError::Validation(ValidationError::MissingGivenName));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
