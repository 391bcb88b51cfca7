//! FHIR API models
//!
//! This module defines the wire structures of the FHIR R4 REST API used by the
//! resource client. These models are separate from domain models and handle
//! the serialization/deserialization of the FHIR JSON format; only the first
//! name, address and photo are meaningful to the application.

use crate::domain::{
    BirthDate, Coding, ContactPoint, ContactSystem, FhirError, Gender, HumanName, OwnershipTag,
    PatientId, PatientRecord, Photo, Result,
};
use serde::{Deserialize, Serialize};

/// FHIR resource type of patient resources
pub const PATIENT_RESOURCE_TYPE: &str = "Patient";

/// Media type of FHIR JSON bodies
pub const FHIR_JSON: &str = "application/fhir+json";

/// Search result envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    #[serde(default)]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    /// Matched resources; servers omit the field when nothing matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<Vec<BundleEntry>>,
}

impl Bundle {
    /// Consumes the bundle and returns the contained patient resources
    ///
    /// Entries without a resource or with another resource type (for example
    /// an `OperationOutcome` attached by the server) are skipped.
    pub fn into_patients(self) -> Vec<PatientResource> {
        self.entry
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| entry.resource)
            .filter(|resource| resource.resource_type == PATIENT_RESOURCE_TYPE)
            .collect()
    }
}

/// A single bundle entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<PatientResource>,
}

/// Resource metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<Coding>,
}

/// FHIR HumanName
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
}

/// FHIR ContactPoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelecomElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<ContactSystem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// FHIR Address, text form only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// FHIR Attachment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// FHIR Patient resource as exchanged with the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResource {
    #[serde(default)]
    pub resource_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<NameElement>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<TelecomElement>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<AddressElement>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photo: Vec<AttachmentElement>,
}

impl PatientResource {
    /// Builds the wire resource for a record
    ///
    /// The ownership tag is always present in `meta.tag`, whatever the record
    /// carries.
    pub fn from_record(record: &PatientRecord) -> Self {
        let mut tags: Vec<Coding> = record.tag.iter().cloned().collect();
        if !tags.iter().any(OwnershipTag::matches) {
            tags.push(OwnershipTag::coding());
        }

        Self {
            resource_type: PATIENT_RESOURCE_TYPE.to_string(),
            id: record.id.as_ref().map(|id| id.to_string()),
            meta: Some(Meta {
                tag: tags,
                ..Default::default()
            }),
            name: vec![NameElement {
                family: Some(record.name.family.clone()).filter(|f| !f.is_empty()),
                given: record.name.given.clone(),
            }],
            gender: record.gender,
            birth_date: record.birth_date.map(|d| d.to_string()),
            telecom: record
                .telecom
                .iter()
                .map(|cp| TelecomElement {
                    system: Some(cp.system.clone()),
                    value: Some(cp.value.clone()),
                })
                .collect(),
            address: record
                .address
                .iter()
                .map(|text| AddressElement {
                    text: Some(text.clone()),
                })
                .collect(),
            photo: record
                .photo
                .iter()
                .map(|p| AttachmentElement {
                    content_type: p.content_type.clone().filter(|ct| !ct.is_empty()),
                    url: Some(p.url.clone()),
                })
                .collect(),
        }
    }

    /// True when `meta.tag` carries the ownership tag
    pub fn is_owned(&self) -> bool {
        self.meta
            .as_ref()
            .map(|m| m.tag.iter().any(OwnershipTag::matches))
            .unwrap_or(false)
    }

    /// Convert to domain PatientRecord
    ///
    /// # Errors
    ///
    /// Returns `InvalidResponse` if the resource is not a Patient or its id is
    /// malformed.
    pub fn into_record(self) -> Result<PatientRecord> {
        if self.resource_type != PATIENT_RESOURCE_TYPE {
            return Err(FhirError::InvalidResponse(format!(
                "expected a Patient resource, got '{}'",
                self.resource_type
            ))
            .into());
        }

        let id = self
            .id
            .map(PatientId::new)
            .transpose()
            .map_err(|e| FhirError::InvalidResponse(e.to_string()))?;

        let tag = self
            .meta
            .and_then(|m| m.tag.into_iter().find(OwnershipTag::matches));

        let name = self
            .name
            .into_iter()
            .next()
            .map(|n| HumanName::new(n.given, n.family.unwrap_or_default()))
            .unwrap_or_default();

        let birth_date = match self.birth_date {
            Some(raw) => match raw.parse::<BirthDate>() {
                Ok(date) => Some(date),
                Err(e) => {
                    tracing::warn!(birth_date = %raw, error = %e, "Ignoring malformed birth date");
                    None
                }
            },
            None => None,
        };

        let telecom = self
            .telecom
            .into_iter()
            .filter_map(|t| match (t.system, t.value) {
                (Some(system), Some(value)) => Some(ContactPoint { system, value }),
                _ => None,
            })
            .collect();

        let address = self
            .address
            .into_iter()
            .next()
            .and_then(|a| a.text)
            .filter(|t| !t.is_empty());

        let photo = self
            .photo
            .into_iter()
            .next()
            .and_then(|p| match p.url {
                Some(url) => Some(Photo {
                    content_type: p.content_type.filter(|ct| !ct.is_empty()),
                    url,
                }),
                None => None,
            });

        Ok(PatientRecord {
            id,
            name,
            gender: self.gender,
            birth_date,
            telecom,
            address,
            photo,
            tag,
        })
    }
}
