//! Domain identifier types with validation
//!
//! Patient identifiers are assigned by the FHIR repository. The newtype keeps
//! them from being mixed up with other strings and checks the FHIR `id`
//! format so they can be placed in a request path as-is.

use super::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a FHIR resource id
const MAX_ID_LEN: usize = 64;

/// Patient identifier newtype wrapper
///
/// # Examples
///
/// ```
/// use patient_manager::domain::ids::PatientId;
/// use std::str::FromStr;
///
/// let id = PatientId::from_str("a1b2-c3.d4").unwrap();
/// assert_eq!(id.as_str(), "a1b2-c3.d4");
/// assert!(PatientId::new("has/slash").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new PatientId, checking the FHIR id charset `[A-Za-z0-9-.]{1,64}`
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::InvalidId(
                "patient id cannot be empty".to_string(),
            ));
        }
        if id.len() > MAX_ID_LEN {
            return Err(ValidationError::InvalidId(format!(
                "patient id exceeds {MAX_ID_LEN} characters"
            )));
        }
        if let Some(c) = id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
        {
            return Err(ValidationError::InvalidId(format!(
                "invalid character '{c}' in '{id}'"
            )));
        }
        Ok(Self(id))
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PatientId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PatientId> for String {
    fn from(id: PatientId) -> Self {
        id.0
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_id_valid() {
        assert!(PatientId::new("1").is_ok());
        assert!(PatientId::new("example-patient.01").is_ok());
        assert!(PatientId::new("a".repeat(64)).is_ok());
    }

    #[test]
    fn test_patient_id_invalid() {
        assert!(PatientId::new("").is_err());
        assert!(PatientId::new("a".repeat(65)).is_err());
        assert!(PatientId::new("../etc").is_err());
        assert!(PatientId::new("with space").is_err());
        assert!(PatientId::new("q?x=1").is_err());
    }

    #[test]
    fn test_patient_id_serde() {
        let id: PatientId = serde_json::from_str("\"abc-123\"").unwrap();
        assert_eq!(id.as_str(), "abc-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");

        let bad = serde_json::from_str::<PatientId>("\"a b\"");
        assert!(bad.is_err());
    }
}
