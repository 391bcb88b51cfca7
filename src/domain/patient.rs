//! Patient domain model
//!
//! This module defines `PatientRecord`, the demographic record managed by the
//! application, together with its parts and the ownership tag that scopes
//! every remote query to records this application created.

use super::ids::PatientId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ownership marker attached to every record this application creates
///
/// List and read queries are filtered by this tag so the application never
/// sees or affects resources it did not create.
pub struct OwnershipTag;

impl OwnershipTag {
    /// Tag code system
    pub const SYSTEM: &'static str = "http://tmf.health/apps";

    /// Tag code
    pub const CODE: &'static str = "patient-listing-app";

    /// Human readable display text
    pub const DISPLAY: &'static str = "Patient Listing App";

    /// The tag as a coding
    pub fn coding() -> Coding {
        Coding {
            system: Some(Self::SYSTEM.to_string()),
            code: Some(Self::CODE.to_string()),
            display: Some(Self::DISPLAY.to_string()),
        }
    }

    /// Token form used in `_tag` search parameters (`system|code`)
    pub fn search_token() -> String {
        format!("{}|{}", Self::SYSTEM, Self::CODE)
    }

    /// True when the coding identifies this application
    pub fn matches(coding: &Coding) -> bool {
        coding.system.as_deref() == Some(Self::SYSTEM) && coding.code.as_deref() == Some(Self::CODE)
    }
}

/// A FHIR coding (system + code + optional display)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// Administrative gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
    Unknown,
}

impl Gender {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            "unknown" => Ok(Gender::Unknown),
            other => Err(format!(
                "Invalid gender '{other}'. Must be one of: male, female, other, unknown"
            )),
        }
    }
}

/// Date of birth at the precision the server recorded it
///
/// FHIR dates may be a year (`1975`), a year and month (`1975-06`) or a full
/// day (`1975-06-14`). The precision is preserved so a record written back
/// carries the same value it was read with.
///
/// # Examples
///
/// ```
/// use patient_manager::domain::patient::BirthDate;
///
/// let date: BirthDate = "1975-06".parse().unwrap();
/// assert_eq!(date, BirthDate::YearMonth(1975, 6));
/// assert_eq!(date.to_string(), "1975-06");
/// assert!("12/04/1990".parse::<BirthDate>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BirthDate {
    Year(i32),
    YearMonth(i32, u32),
    Date(NaiveDate),
}

impl BirthDate {
    /// The full calendar date, when day precision is known
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            BirthDate::Date(date) => Some(*date),
            _ => None,
        }
    }
}

impl From<NaiveDate> for BirthDate {
    fn from(date: NaiveDate) -> Self {
        BirthDate::Date(date)
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BirthDate::Year(year) => write!(f, "{year:04}"),
            BirthDate::YearMonth(year, month) => write!(f, "{year:04}-{month:02}"),
            BirthDate::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl FromStr for BirthDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || format!("Invalid birth date '{raw}'. Use YYYY, YYYY-MM or YYYY-MM-DD");

        let parts: Vec<&str> = raw.split('-').collect();
        let digits = |part: &str, len: usize| {
            part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
        };

        match parts[..] {
            [year] if digits(year, 4) => year.parse().map(BirthDate::Year).map_err(|_| invalid()),
            [year, month] if digits(year, 4) && digits(month, 2) => {
                let year: i32 = year.parse().map_err(|_| invalid())?;
                let month: u32 = month.parse().map_err(|_| invalid())?;
                if (1..=12).contains(&month) {
                    Ok(BirthDate::YearMonth(year, month))
                } else {
                    Err(invalid())
                }
            }
            [year, month, day] if digits(year, 4) && digits(month, 2) && digits(day, 2) => {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map(BirthDate::Date)
                    .map_err(|_| invalid())
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for BirthDate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BirthDate> for String {
    fn from(date: BirthDate) -> Self {
        date.to_string()
    }
}

/// Structured person name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HumanName {
    /// Given names, in order
    #[serde(default)]
    pub given: Vec<String>,

    /// Family name
    #[serde(default)]
    pub family: String,
}

impl HumanName {
    pub fn new(given: Vec<String>, family: impl Into<String>) -> Self {
        Self {
            given,
            family: family.into(),
        }
    }

    /// Given names joined by a single space
    pub fn given_joined(&self) -> String {
        self.given.join(" ")
    }

    /// "Given Family", trimmed
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_joined(), self.family)
            .trim()
            .to_string()
    }

    /// At least one of given/family is present
    pub fn is_present(&self) -> bool {
        !self.family.trim().is_empty() || self.given.iter().any(|g| !g.trim().is_empty())
    }
}

/// Telecom system
///
/// Only phone and email are meaningful to this application. Any other system
/// the server returns (`fax`, `sms`, `url`...) is kept verbatim so it is
/// written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContactSystem {
    Phone,
    Email,
    Other(String),
}

impl ContactSystem {
    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            ContactSystem::Phone => "phone",
            ContactSystem::Email => "email",
            ContactSystem::Other(raw) => raw,
        }
    }
}

impl From<String> for ContactSystem {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "phone" => ContactSystem::Phone,
            "email" => ContactSystem::Email,
            _ => ContactSystem::Other(raw),
        }
    }
}

impl From<ContactSystem> for String {
    fn from(system: ContactSystem) -> Self {
        match system {
            ContactSystem::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// A telecom entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPoint {
    pub system: ContactSystem,
    pub value: String,
}

impl ContactPoint {
    pub fn phone(value: impl Into<String>) -> Self {
        Self {
            system: ContactSystem::Phone,
            value: value.into(),
        }
    }

    pub fn email(value: impl Into<String>) -> Self {
        Self {
            system: ContactSystem::Email,
            value: value.into(),
        }
    }
}

/// Externally hosted profile photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// MIME type, e.g. `image/jpeg`, when the server recorded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Hosted image URL
    pub url: String,
}

/// A patient demographic record
///
/// Drafts built from the form have no `id`; records returned by the FHIR
/// server always carry the server-assigned one.
///
/// # Examples
///
/// ```
/// use patient_manager::domain::patient::{Gender, PatientRecord};
///
/// let record = PatientRecord::builder()
///     .id("1")
///     .unwrap()
///     .given(["Jane"])
///     .family("Doe")
///     .gender(Gender::Female)
///     .build()
///     .unwrap();
///
/// assert_eq!(record.name.full_name(), "Jane Doe");
/// assert!(record.is_owned());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Server-assigned identifier, absent for drafts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PatientId>,

    pub name: HumanName,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<BirthDate>,

    #[serde(default)]
    pub telecom: Vec<ContactPoint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,

    /// Ownership tag, `None` for foreign records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Coding>,
}

impl PatientRecord {
    /// Creates a new builder for constructing a PatientRecord
    pub fn builder() -> PatientRecordBuilder {
        PatientRecordBuilder::default()
    }

    /// True when the record carries this application's ownership tag
    pub fn is_owned(&self) -> bool {
        self.tag.as_ref().map(OwnershipTag::matches).unwrap_or(false)
    }

    /// First phone entry
    pub fn phone(&self) -> Option<&str> {
        self.first_contact(ContactSystem::Phone)
    }

    /// First email entry
    pub fn email(&self) -> Option<&str> {
        self.first_contact(ContactSystem::Email)
    }

    fn first_contact(&self, system: ContactSystem) -> Option<&str> {
        self.telecom
            .iter()
            .find(|c| c.system == system)
            .map(|c| c.value.as_str())
    }

    /// Returns a copy carrying the given id
    pub fn with_id(mut self, id: PatientId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Builder for constructing PatientRecord instances
///
/// The built record always carries the ownership tag.
#[derive(Debug, Default)]
pub struct PatientRecordBuilder {
    id: Option<PatientId>,
    given: Vec<String>,
    family: String,
    gender: Option<Gender>,
    birth_date: Option<BirthDate>,
    telecom: Vec<ContactPoint>,
    address: Option<String>,
    photo: Option<Photo>,
}

impl PatientRecordBuilder {
    /// Sets the id, validating its format
    pub fn id(mut self, id: impl Into<String>) -> Result<Self, super::ValidationError> {
        self.id = Some(PatientId::new(id)?);
        Ok(self)
    }

    pub fn given<I, S>(mut self, given: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.given = given.into_iter().map(Into::into).collect();
        self
    }

    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn birth_date(mut self, birth_date: impl Into<BirthDate>) -> Self {
        self.birth_date = Some(birth_date.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.telecom.push(ContactPoint::phone(phone));
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.telecom.push(ContactPoint::email(email));
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn photo(mut self, content_type: impl Into<String>, url: impl Into<String>) -> Self {
        self.photo = Some(Photo {
            content_type: Some(content_type.into()).filter(|ct: &String| !ct.is_empty()),
            url: url.into(),
        });
        self
    }

    /// Builds the PatientRecord
    ///
    /// # Errors
    ///
    /// Returns an error if neither a given nor a family name was supplied
    pub fn build(self) -> Result<PatientRecord, String> {
        let name = HumanName::new(self.given, self.family);
        if !name.is_present() {
            return Err("at least one of given or family name is required".to_string());
        }

        Ok(PatientRecord {
            id: self.id,
            name,
            gender: self.gender,
            birth_date: self.birth_date,
            telecom: self.telecom,
            address: self.address,
            photo: self.photo,
            tag: Some(OwnershipTag::coding()),
        })
    }
}
