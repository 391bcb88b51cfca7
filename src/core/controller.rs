//! Patient controller - orchestrates user actions
//!
//! Every action follows the same flow: validate locally, call the resource
//! API, and only after it succeeded reconcile the result into the store.
//! Remote failures are logged here and returned to the caller, which shows a
//! notice; nothing is retried, queued or rolled back.
//!
//! All actions take `&mut self`, so actions on one controller are sequenced:
//! an edit is reconciled before a following delete is issued.

use crate::adapters::fhir::PatientApi;
use crate::adapters::upload::ImageUploader;
use crate::core::form::{PatientForm, DEFAULT_PHOTO_CONTENT_TYPE};
use crate::core::search;
use crate::core::store::PatientStore;
use crate::domain::{PatientId, PatientRecord, Result};
use crate::{log_patient_change, log_remote_failure};

/// Patient controller
pub struct PatientController<A, U> {
    api: A,
    uploader: U,
    store: PatientStore,
    photo_content_type: String,
}

impl<A, U> PatientController<A, U>
where
    A: PatientApi,
    U: ImageUploader,
{
    /// Create a controller with an empty store
    pub fn new(api: A, uploader: U) -> Self {
        Self {
            api,
            uploader,
            store: PatientStore::new(),
            photo_content_type: DEFAULT_PHOTO_CONTENT_TYPE.to_string(),
        }
    }

    /// Set the MIME type recorded for uploaded photos
    pub fn with_photo_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.photo_content_type = content_type.into();
        self
    }

    pub fn store(&self) -> &PatientStore {
        &self.store
    }

    /// Mutable store access, for subscribing views
    pub fn store_mut(&mut self) -> &mut PatientStore {
        &mut self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Initial load: fetch every owned patient if the store is still empty
    ///
    /// Returns the number of records added.
    pub async fn load(&mut self) -> Result<usize> {
        if !self.store.is_empty() {
            tracing::debug!(count = self.store.len(), "Store already loaded");
            return Ok(0);
        }
        self.refresh(None).await
    }

    /// Fetch patients (optionally narrowed by name on the server) and add them
    ///
    /// Records already in the store are kept as they are.
    pub async fn refresh(&mut self, name_filter: Option<&str>) -> Result<usize> {
        let records = self.api.list(name_filter).await.map_err(|e| {
            log_remote_failure!("list", &e);
            e
        })?;

        let added = records
            .into_iter()
            .map(|record| self.store.add(record))
            .filter(|inserted| *inserted)
            .count();

        tracing::info!(added, total = self.store.len(), "Patients loaded");
        Ok(added)
    }

    /// Records matching `query`, in display order
    pub fn search(&self, query: &str) -> Vec<&PatientRecord> {
        search::filter_patients(self.store.list(), query)
    }

    /// Select a patient for editing
    ///
    /// Uses the store's copy when present, otherwise fetches it and adds it to
    /// the store. Returns the form derived from the record.
    pub async fn open(&mut self, id: &PatientId) -> Result<PatientForm> {
        if let Some(record) = self.store.get(id) {
            return Ok(PatientForm::from_record(Some(record)));
        }

        let record = self.api.get(id).await.map_err(|e| {
            log_remote_failure!("get", &e);
            e
        })?;

        let form = PatientForm::from_record(Some(&record));
        self.store.add(record);
        Ok(form)
    }

    /// Submit the form: create a new patient or replace the selected one
    ///
    /// Validation failures are returned before any request is made. A server
    /// response without the ownership tag is returned to the caller but kept
    /// out of the store.
    pub async fn save(&mut self, form: &PatientForm) -> Result<PatientRecord> {
        let draft = form.to_draft().map_err(|e| {
            tracing::warn!(error = %e, "Patient form rejected");
            e
        })?;

        if form.is_edit() {
            let updated = self.api.update(&draft).await.map_err(|e| {
                log_remote_failure!("update", &e);
                e
            })?;
            if Self::accept_saved("updated", &updated) {
                self.store.update_record(updated.clone());
            }
            Ok(updated)
        } else {
            let created = self.api.create(&draft).await.map_err(|e| {
                log_remote_failure!("create", &e);
                e
            })?;
            if Self::accept_saved("created", &created) {
                self.store.add(created.clone());
            }
            Ok(created)
        }
    }

    /// Whether a saved record may enter the store
    fn accept_saved(action: &str, record: &PatientRecord) -> bool {
        if !record.is_owned() {
            tracing::warn!(
                action,
                patient_id = ?record.id,
                "Saved patient returned without ownership tag; store not updated"
            );
            return false;
        }
        if let Some(id) = &record.id {
            log_patient_change!(action, id);
        }
        true
    }

    /// Delete a patient, removing it from the store once the server confirmed
    pub async fn delete(&mut self, id: &PatientId) -> Result<()> {
        self.api.delete(id).await.map_err(|e| {
            log_remote_failure!("delete", &e);
            e
        })?;

        log_patient_change!("deleted", id);
        self.store.remove_record(id);
        Ok(())
    }

    /// Upload a photo and attach its hosted URL to the form
    ///
    /// The record itself is unchanged until the form is saved.
    pub async fn upload_photo(
        &self,
        form: &mut PatientForm,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String> {
        let uploaded = self.uploader.upload(file_name, bytes).await.map_err(|e| {
            log_remote_failure!("upload", &e);
            e
        })?;

        form.set_uploaded_photo(uploaded.secure_url.clone(), self.photo_content_type.clone());
        Ok(uploaded.secure_url)
    }
}
