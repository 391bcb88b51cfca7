//! Patient form state and validation
//!
//! The form holds raw field values while a record is being created or edited.
//! Its state is derived one way from the selected record: selecting another
//! record (or none) re-derives every field, nothing is written back until a
//! validated draft is submitted.

use crate::domain::{
    BirthDate, ContactPoint, Gender, HumanName, OwnershipTag, PatientId, PatientRecord, Photo,
    Result, ValidationError,
};

/// MIME type recorded for uploaded photos unless configured otherwise
pub const DEFAULT_PHOTO_CONTENT_TYPE: &str = "image/jpeg";

/// Gender picker state
///
/// `Unselected` is the transient "undefined" state of a blank form. It can
/// never reach a record: [`PatientForm::to_draft`] rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenderSelection {
    #[default]
    Unselected,
    Selected(Gender),
}

impl GenderSelection {
    /// Re-derive the selection from an externally supplied value
    pub fn derive(external: Option<Gender>) -> Self {
        match external {
            Some(gender) => GenderSelection::Selected(gender),
            None => GenderSelection::Unselected,
        }
    }

    /// The selected gender, if any
    pub fn gender(&self) -> Option<Gender> {
        match self {
            GenderSelection::Selected(gender) => Some(*gender),
            GenderSelection::Unselected => None,
        }
    }
}

/// Form field values for creating or editing a patient
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientForm {
    /// Id of the record being edited, `None` for a new patient
    pub selected: Option<PatientId>,
    /// Given names separated by spaces
    pub given: String,
    pub family: String,
    pub gender: GenderSelection,
    /// `YYYY`, `YYYY-MM`, `YYYY-MM-DD` or empty
    pub birth_date: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    /// Hosted photo to attach on the next save
    pub photo: Option<Photo>,
}

impl PatientForm {
    /// A blank form for a new patient
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the form from the selected record, or a blank form for `None`
    pub fn from_record(selected: Option<&PatientRecord>) -> Self {
        let Some(record) = selected else {
            return Self::new();
        };

        Self {
            selected: record.id.clone(),
            given: record.name.given_joined(),
            family: record.name.family.clone(),
            gender: GenderSelection::derive(record.gender),
            birth_date: record
                .birth_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            phone: record.phone().unwrap_or_default().to_string(),
            email: record.email().unwrap_or_default().to_string(),
            address: record.address.clone().unwrap_or_default(),
            photo: record.photo.clone(),
        }
    }

    /// True when editing an existing record
    pub fn is_edit(&self) -> bool {
        self.selected.is_some()
    }

    /// Attach a freshly uploaded photo
    pub fn set_uploaded_photo(&mut self, url: impl Into<String>, content_type: impl Into<String>) {
        self.photo = Some(Photo {
            content_type: Some(content_type.into()),
            url: url.into(),
        });
    }

    /// Check the fields without building a record
    ///
    /// Given and family names are required; the gender must be selected; a
    /// non-empty birth date must be an ISO date of year, month or day
    /// precision.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.given.trim().is_empty() {
            return Err(ValidationError::MissingGivenName);
        }
        if self.family.trim().is_empty() {
            return Err(ValidationError::MissingFamilyName);
        }
        if self.gender == GenderSelection::Unselected {
            return Err(ValidationError::GenderNotSelected);
        }
        self.parsed_birth_date()?;
        Ok(())
    }

    fn parsed_birth_date(&self) -> std::result::Result<Option<BirthDate>, ValidationError> {
        let raw = self.birth_date.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<BirthDate>()
            .map(Some)
            .map_err(|_| ValidationError::InvalidBirthDate(raw.to_string()))
    }

    /// Build the record to submit
    ///
    /// The draft carries the ownership tag and the selected id (if editing).
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn to_draft(&self) -> Result<PatientRecord> {
        self.validate()?;

        let mut telecom = Vec::new();
        let phone = self.phone.trim();
        if !phone.is_empty() {
            telecom.push(ContactPoint::phone(phone));
        }
        let email = self.email.trim();
        if !email.is_empty() {
            telecom.push(ContactPoint::email(email));
        }

        let address = self.address.trim();

        Ok(PatientRecord {
            id: self.selected.clone(),
            name: HumanName::new(
                self.given.split_whitespace().map(str::to_string).collect(),
                self.family.trim(),
            ),
            gender: self.gender.gender(),
            birth_date: self.parsed_birth_date()?,
            telecom,
            address: (!address.is_empty()).then(|| address.to_string()),
            photo: self.photo.clone(),
            tag: Some(OwnershipTag::coding()),
        })
    }
}
