//! FHIR resource client
//!
//! Stateless translation between patient record operations and the FHIR REST
//! API. Every read is scoped to the ownership tag; every write carries it.
//! The client does not retry and does not cache.

use super::models::{Bundle, PatientResource, FHIR_JSON};
use crate::config::FhirConfig;
use crate::domain::{AppError, FhirError, OwnershipTag, PatientId, PatientRecord, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use std::time::Duration;

/// Patient operations against the remote resource repository
///
/// Implemented by [`FhirClient`]; the controller is generic over this trait
/// so it can be driven by an in-memory implementation in tests.
#[async_trait]
pub trait PatientApi: Send + Sync {
    /// List owned patients, optionally narrowed by name on the server
    ///
    /// Returns an empty vector when nothing matched.
    async fn list(&self, name_filter: Option<&str>) -> Result<Vec<PatientRecord>>;

    /// Fetch one owned patient
    ///
    /// # Errors
    ///
    /// `FhirError::NotFound` when the server has no such patient or it is not
    /// owned by this application.
    async fn get(&self, id: &PatientId) -> Result<PatientRecord>;

    /// Create a patient; `record.id` must be absent
    async fn create(&self, record: &PatientRecord) -> Result<PatientRecord>;

    /// Replace a patient; `record.id` must be present
    ///
    /// # Errors
    ///
    /// `FhirError::InvalidArgument` without any request when `record.id` is
    /// absent.
    async fn update(&self, record: &PatientRecord) -> Result<PatientRecord>;

    /// Delete a patient; deleting an already deleted patient succeeds
    async fn delete(&self, id: &PatientId) -> Result<()>;

    /// Base URL of the FHIR server
    fn base_url(&self) -> &str;
}

/// reqwest-backed FHIR client
///
/// # Example
///
/// ```no_run
/// use patient_manager::adapters::fhir::{FhirClient, PatientApi};
/// use patient_manager::config::FhirConfig;
///
/// # async fn example() -> patient_manager::domain::Result<()> {
/// let client = FhirClient::new(&FhirConfig::default())?;
/// let patients = client.list(Some("doe")).await?;
/// println!("{} patients", patients.len());
/// # Ok(())
/// # }
/// ```
pub struct FhirClient {
    /// Base URL without trailing slash
    base_url: String,

    /// HTTP client for making requests
    client: Client,
}

impl FhirClient {
    /// Create a new FHIR client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &FhirConfig) -> Result<Self> {
        let mut client_builder = ClientBuilder::new();
        if let Some(secs) = config.timeout_seconds {
            client_builder = client_builder.timeout(Duration::from_secs(secs));
        }

        let client = client_builder
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn type_url(&self) -> String {
        format!("{}/Patient", self.base_url)
    }

    fn instance_url(&self, id: &PatientId) -> String {
        format!("{}/Patient/{}", self.base_url, id)
    }

    /// Send a request, mapping transport failures to `FhirError::Network`
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request
            .header(ACCEPT, FHIR_JSON)
            .send()
            .await
            .map_err(|e| FhirError::Network(e.to_string()).into())
    }

    /// Parse a successful response body into a record
    async fn read_record(resp: Response) -> Result<PatientRecord> {
        let resource = resp
            .json::<PatientResource>()
            .await
            .map_err(|e| FhirError::InvalidResponse(e.to_string()))?;
        resource.into_record()
    }

    /// Write a record (POST to the type or PUT to the instance)
    async fn write(&self, request: RequestBuilder, record: &PatientRecord) -> Result<PatientRecord> {
        let body = serde_json::to_vec(&PatientResource::from_record(record))?;

        let resp = self
            .send(
                request
                    .header(CONTENT_TYPE, FHIR_JSON)
                    .header("Prefer", "return=representation")
                    .body(body),
            )
            .await?;

        if !resp.status().is_success() {
            return Err(remote_error(resp).await);
        }

        Self::read_record(resp).await
    }
}

/// Build a `Remote` error from a non-success response
async fn remote_error(resp: Response) -> AppError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    FhirError::Remote { status, body }.into()
}

#[async_trait]
impl PatientApi for FhirClient {
    async fn list(&self, name_filter: Option<&str>) -> Result<Vec<PatientRecord>> {
        let mut query = vec![("_tag", OwnershipTag::search_token())];
        if let Some(name) = name_filter.map(str::trim).filter(|n| !n.is_empty()) {
            query.push(("name", name.to_string()));
        }

        tracing::debug!(
            url = %self.type_url(),
            name_filter = ?name_filter,
            "Listing patients"
        );

        let resp = self
            .send(self.client.get(self.type_url()).query(&query))
            .await?;

        if !resp.status().is_success() {
            return Err(remote_error(resp).await);
        }

        let bundle = resp
            .json::<Bundle>()
            .await
            .map_err(|e| FhirError::InvalidResponse(e.to_string()))?;

        let mut records = Vec::new();
        for resource in bundle.into_patients() {
            if !resource.is_owned() {
                tracing::warn!(
                    patient_id = ?resource.id,
                    "Skipping patient without ownership tag"
                );
                continue;
            }

            match resource.into_record() {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping invalid patient resource");
                }
            }
        }

        tracing::info!(count = records.len(), "Listed patients");

        Ok(records)
    }

    async fn get(&self, id: &PatientId) -> Result<PatientRecord> {
        tracing::debug!(patient_id = %id, "Fetching patient");

        let resp = self
            .send(
                self.client
                    .get(self.instance_url(id))
                    .query(&[("_tag", OwnershipTag::search_token())]),
            )
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND | StatusCode::GONE => {
                Err(FhirError::NotFound(id.to_string()).into())
            }
            status if status.is_success() => {
                let resource = resp
                    .json::<PatientResource>()
                    .await
                    .map_err(|e| FhirError::InvalidResponse(e.to_string()))?;

                if !resource.is_owned() {
                    tracing::warn!(patient_id = %id, "Patient is not owned by this application");
                    return Err(FhirError::NotFound(id.to_string()).into());
                }

                resource.into_record()
            }
            _ => Err(remote_error(resp).await),
        }
    }

    async fn create(&self, record: &PatientRecord) -> Result<PatientRecord> {
        if let Some(id) = &record.id {
            return Err(FhirError::InvalidArgument(format!(
                "a new patient must not carry an id (got {id})"
            ))
            .into());
        }

        tracing::debug!(name = %record.name.full_name(), "Creating patient");

        let created = self
            .write(self.client.post(self.type_url()), record)
            .await?;

        tracing::info!(patient_id = ?created.id, "Created patient");

        Ok(created)
    }

    async fn update(&self, record: &PatientRecord) -> Result<PatientRecord> {
        let id = record.id.as_ref().ok_or_else(|| {
            FhirError::InvalidArgument("patient id is required for update".to_string())
        })?;

        tracing::debug!(patient_id = %id, "Updating patient");

        let updated = self
            .write(self.client.put(self.instance_url(id)), record)
            .await?;

        tracing::info!(patient_id = %id, "Updated patient");

        Ok(updated)
    }

    async fn delete(&self, id: &PatientId) -> Result<()> {
        tracing::debug!(patient_id = %id, "Deleting patient");

        let resp = self.send(self.client.delete(self.instance_url(id))).await?;

        match resp.status() {
            StatusCode::NOT_FOUND | StatusCode::GONE => {
                tracing::debug!(patient_id = %id, "Patient already deleted");
                Ok(())
            }
            status if status.is_success() => {
                tracing::info!(patient_id = %id, "Deleted patient");
                Ok(())
            }
            _ => Err(remote_error(resp).await),
        }
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
