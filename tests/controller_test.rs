//! End-to-end controller tests over the real clients and mock HTTP servers

use mockito::{Matcher, Server, ServerGuard};
use patient_manager::adapters::fhir::{FhirClient, PatientApi, PatientResource};
use patient_manager::adapters::upload::CloudinaryUploader;
use patient_manager::config::{FhirConfig, UploadConfig};
use patient_manager::core::controller::PatientController;
use patient_manager::core::form::{GenderSelection, PatientForm};
use patient_manager::domain::{
    AppError, BirthDate, Gender, OwnershipTag, PatientId, PatientRecord, ValidationError,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type Controller = PatientController<FhirClient, CloudinaryUploader>;

fn controller_for(server: &ServerGuard) -> Controller {
    let api = FhirClient::new(&FhirConfig {
        base_url: format!("{}/fhir", server.url()),
        timeout_seconds: Some(5),
    })
    .unwrap();
    let uploader = CloudinaryUploader::new(&UploadConfig {
        endpoint: format!("{}/upload", server.url()),
        ..Default::default()
    })
    .unwrap();
    PatientController::new(api, uploader)
}

fn patient(id: &str, given: &str, family: &str, gender: Gender) -> PatientRecord {
    PatientRecord::builder()
        .id(id)
        .unwrap()
        .given([given])
        .family(family)
        .gender(gender)
        .build()
        .unwrap()
}

/// Serialize records the way the server would return them
fn resource_json(record: &PatientRecord) -> serde_json::Value {
    serde_json::to_value(PatientResource::from_record(record)).unwrap()
}

fn bundle(records: &[PatientRecord]) -> String {
    let entry: Vec<_> = records
        .iter()
        .map(|r| json!({ "resource": resource_json(r) }))
        .collect();
    json!({ "resourceType": "Bundle", "entry": entry }).to_string()
}

async fn mock_list(server: &mut ServerGuard, records: &[PatientRecord]) -> mockito::Mock {
    server
        .mock("GET", "/fhir/Patient")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(bundle(records))
        .create_async()
        .await
}

fn jane_form() -> PatientForm {
    PatientForm {
        given: "Jane".to_string(),
        family: "Doe".to_string(),
        gender: GenderSelection::Selected(Gender::Female),
        birth_date: "1990-04-12".to_string(),
        phone: "0800".to_string(),
        email: "jane@example.com".to_string(),
        address: "1 Main St".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_load_only_when_store_is_empty() {
    let mut server = Server::new_async().await;
    let mock = mock_list(
        &mut server,
        &[
            patient("1", "Jane", "Doe", Gender::Female),
            patient("2", "Jan", "Smith", Gender::Male),
        ],
    )
    .await;

    let mut controller = controller_for(&server);
    assert_eq!(controller.load().await.unwrap(), 2);
    assert_eq!(controller.load().await.unwrap(), 0);

    mock.assert_async().await;
    assert_eq!(controller.store().len(), 2);
}

#[tokio::test]
async fn test_search_after_load() {
    let mut server = Server::new_async().await;
    let _mock = mock_list(
        &mut server,
        &[
            patient("1", "Jane", "Doe", Gender::Female),
            patient("2", "Jan", "Smith", Gender::Male),
        ],
    )
    .await;

    let mut controller = controller_for(&server);
    controller.load().await.unwrap();

    let hits = controller.search("doe");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, Some(PatientId::new("1").unwrap()));
    assert_eq!(controller.search("").len(), 2);
}

#[tokio::test]
async fn test_refresh_keeps_existing_entries() {
    let mut server = Server::new_async().await;
    let _mock = mock_list(&mut server, &[patient("1", "Jane", "Smith", Gender::Female)]).await;

    let mut controller = controller_for(&server);
    controller
        .store_mut()
        .add(patient("1", "Jane", "Doe", Gender::Female));

    assert_eq!(controller.refresh(None).await.unwrap(), 0);
    assert_eq!(controller.store().list()[0].name.family, "Doe");
}

#[tokio::test]
async fn test_unselected_gender_makes_no_request() {
    let mut server = Server::new_async().await;
    let mut guards = Vec::new();
    for method in ["GET", "POST", "PUT", "DELETE"] {
        guards.push(
            server
                .mock(method, Matcher::Any)
                .expect(0)
                .create_async()
                .await,
        );
    }

    let mut controller = controller_for(&server);
    let mut form = jane_form();
    form.gender = GenderSelection::Unselected;

    let err = controller.save(&form).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::GenderNotSelected)
    ));
    assert!(err.to_string().ends_with("Please select a gender"));
    for guard in &guards {
        guard.assert_async().await;
    }
    assert!(controller.store().is_empty());
}

#[tokio::test]
async fn test_save_new_patient_adds_to_store_and_notifies() {
    let mut server = Server::new_async().await;
    let created = jane_form()
        .to_draft()
        .unwrap()
        .with_id(PatientId::new("new-1").unwrap());
    let mock = server
        .mock("POST", "/fhir/Patient")
        .match_body(Matcher::PartialJson(json!({
            "name": [{ "given": ["Jane"], "family": "Doe" }],
            "gender": "female",
            "birthDate": "1990-04-12",
            "address": [{ "text": "1 Main St" }]
        })))
        .with_status(201)
        .with_body(resource_json(&created).to_string())
        .create_async()
        .await;

    let mut controller = controller_for(&server);
    let notifications = Arc::new(AtomicUsize::new(0));
    let seen = notifications.clone();
    controller.store_mut().subscribe(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    let saved = controller.save(&jane_form()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(saved, created);
    assert_eq!(controller.store().list(), &[created]);
    assert_eq!(notifications.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_save_leaves_store_untouched() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/fhir/Patient")
        .with_status(500)
        .create_async()
        .await;

    let mut controller = controller_for(&server);
    let err = controller.save(&jane_form()).await.unwrap_err();

    assert!(!err.is_validation());
    assert!(controller.store().is_empty());
}

#[tokio::test]
async fn test_edit_replaces_store_entry() {
    let mut server = Server::new_async().await;
    let original = patient("1", "Jane", "Doe", Gender::Female);
    let mut renamed = original.clone();
    renamed.name.family = "Dough".to_string();

    let mock = server
        .mock("PUT", "/fhir/Patient/1")
        .match_body(Matcher::PartialJson(json!({
            "id": "1",
            "name": [{ "family": "Dough" }]
        })))
        .with_status(200)
        .with_body(resource_json(&renamed).to_string())
        .create_async()
        .await;

    let mut controller = controller_for(&server);
    controller.store_mut().add(original);
    controller
        .store_mut()
        .add(patient("2", "Jan", "Smith", Gender::Male));

    let id = PatientId::new("1").unwrap();
    let mut form = controller.open(&id).await.unwrap();
    assert!(form.is_edit());
    form.family = "Dough".to_string();

    controller.save(&form).await.unwrap();

    mock.assert_async().await;
    assert_eq!(controller.store().len(), 2);
    assert_eq!(controller.store().get(&id).unwrap().name.family, "Dough");
}

#[tokio::test]
async fn test_open_fetches_unknown_patient() {
    let mut server = Server::new_async().await;
    let record = patient("7", "Ada", "Obi", Gender::Other);
    let _mock = server
        .mock("GET", "/fhir/Patient/7")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(resource_json(&record).to_string())
        .create_async()
        .await;

    let mut controller = controller_for(&server);
    let form = controller.open(&PatientId::new("7").unwrap()).await.unwrap();

    assert_eq!(form.family, "Obi");
    assert_eq!(form.gender, GenderSelection::Selected(Gender::Other));
    assert_eq!(controller.store().list(), &[record]);
}

#[tokio::test]
async fn test_delete_removes_after_server_confirms() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("DELETE", "/fhir/Patient/1")
        .with_status(204)
        .create_async()
        .await;
    let _mock = server
        .mock("DELETE", "/fhir/Patient/2")
        .with_status(500)
        .create_async()
        .await;

    let mut controller = controller_for(&server);
    controller
        .store_mut()
        .add(patient("1", "Jane", "Doe", Gender::Female));
    controller
        .store_mut()
        .add(patient("2", "Jan", "Smith", Gender::Male));

    controller
        .delete(&PatientId::new("1").unwrap())
        .await
        .unwrap();
    assert!(controller
        .delete(&PatientId::new("2").unwrap())
        .await
        .is_err());

    let ids: Vec<_> = controller
        .store()
        .list()
        .iter()
        .filter_map(|r| r.id.clone())
        .collect();
    assert_eq!(ids, vec![PatientId::new("2").unwrap()]);
}

#[tokio::test]
async fn test_uploaded_photo_is_saved_with_patient() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/upload")
        .with_status(200)
        .with_body(r#"{"secure_url":"https://res.example.com/jane.jpg"}"#)
        .create_async()
        .await;
    let save = server
        .mock("POST", "/fhir/Patient")
        .match_body(Matcher::PartialJson(json!({
            "photo": [{ "contentType": "image/jpeg", "url": "https://res.example.com/jane.jpg" }]
        })))
        .with_status(201)
        .with_body(
            resource_json(
                &jane_form()
                    .to_draft()
                    .unwrap()
                    .with_id(PatientId::new("9").unwrap()),
            )
            .to_string(),
        )
        .create_async()
        .await;

    let mut controller = controller_for(&server);
    let mut form = jane_form();
    let url = controller
        .upload_photo(&mut form, "jane.jpg", b"jpeg".to_vec())
        .await
        .unwrap();
    assert_eq!(url, "https://res.example.com/jane.jpg");

    controller.save(&form).await.unwrap();
    save.assert_async().await;
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let mut server = Server::new_async().await;
    let draft = jane_form().to_draft().unwrap();
    let persisted = draft.clone().with_id(PatientId::new("rt-1").unwrap());

    let _mock = server
        .mock("POST", "/fhir/Patient")
        .with_status(201)
        .with_body(resource_json(&persisted).to_string())
        .create_async()
        .await;
    let _mock = server
        .mock("GET", "/fhir/Patient/rt-1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(resource_json(&persisted).to_string())
        .create_async()
        .await;

    let controller = controller_for(&server);
    let created = controller.api().create(&draft).await.unwrap();
    let id = created.id.clone().unwrap();
    let fetched = controller.api().get(&id).await.unwrap();

    assert_eq!(fetched.name, draft.name);
    assert_eq!(fetched.gender, draft.gender);
    assert_eq!(fetched.birth_date, draft.birth_date);
    assert_eq!(fetched.telecom, draft.telecom);
    assert_eq!(fetched.address, draft.address);
}

#[tokio::test]
async fn test_partial_birth_date_is_kept_on_edit() {
    let mut server = Server::new_async().await;
    let _get = server
        .mock("GET", "/fhir/Patient/5")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "resourceType": "Patient",
                "id": "5",
                "meta": { "tag": [{
                    "system": OwnershipTag::SYSTEM,
                    "code": OwnershipTag::CODE
                }] },
                "name": [{ "given": ["Ada"], "family": "Obi" }],
                "gender": "female",
                "birthDate": "1975",
                "telecom": [{ "system": "phone", "value": "0800" }]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/fhir/Patient/5")
        .match_body(Matcher::PartialJson(json!({
            "id": "5",
            "birthDate": "1975",
            "telecom": [{ "system": "phone", "value": "0900" }]
        })))
        .with_status(200)
        .with_body(
            json!({
                "resourceType": "Patient",
                "id": "5",
                "meta": { "tag": [{
                    "system": OwnershipTag::SYSTEM,
                    "code": OwnershipTag::CODE
                }] },
                "name": [{ "given": ["Ada"], "family": "Obi" }],
                "gender": "female",
                "birthDate": "1975",
                "telecom": [{ "system": "phone", "value": "0900" }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut controller = controller_for(&server);
    let id = PatientId::new("5").unwrap();
    let mut form = controller.open(&id).await.unwrap();
    assert_eq!(form.birth_date, "1975");

    form.phone = "0900".to_string();
    let saved = controller.save(&form).await.unwrap();

    put.assert_async().await;
    assert_eq!(saved.birth_date, Some(BirthDate::Year(1975)));
    assert_eq!(
        controller.store().get(&id).unwrap().birth_date,
        Some(BirthDate::Year(1975))
    );
}
