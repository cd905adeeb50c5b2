use axum::http::StatusCode;
use chrono::Utc;
use clinic_api::middleware::error_handling::ErrorBody;
use clinic_core::{
    errors::{ClinicError, ErrorKind},
    models::patient::{CreatePatientResponse, NewPatient, Patient},
};
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{TestContext, patient};

#[tokio::test]
async fn test_create_patient_normalizes_input() {
    let mut ctx = TestContext::new();
    ctx.patient_repo
        .expect_create_patient()
        .withf(|p: &NewPatient| p.name == "Ana Souza" && p.email == "ana@example.com")
        .times(1)
        .returning(|p| {
            Ok(Patient {
                id: 7,
                name: p.name.clone(),
                email: p.email.clone(),
                created_at: Utc::now(),
            })
        });
    let server = ctx.server();

    let response = server
        .post("/api/patients")
        .json(&json!({ "name": "  Ana Souza ", "email": " Ana@Example.COM" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<CreatePatientResponse>();
    assert_eq!(body.id, 7);
    assert_eq!(body.email, "ana@example.com");
}

#[tokio::test]
async fn test_create_patient_rejects_bad_email_before_storage() {
    let mut ctx = TestContext::new();
    ctx.patient_repo.expect_create_patient().times(0);
    let server = ctx.server();

    let response = server
        .post("/api/patients")
        .json(&json!({ "name": "Ana Souza", "email": "not-an-email" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<ErrorBody>().kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_create_patient_storage_failure() {
    let mut ctx = TestContext::new();
    ctx.patient_repo
        .expect_create_patient()
        .returning(|_| Err(eyre::eyre!("duplicate key value violates unique constraint")));
    let server = ctx.server();

    let response = server
        .post("/api/patients")
        .json(&json!({ "name": "Ana Souza", "email": "ana@example.com" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<ErrorBody>().kind,
        ErrorKind::PersistenceFailure
    );
}

#[tokio::test]
async fn test_get_patient() {
    let mut ctx = TestContext::new();
    ctx.patient_repo
        .expect_get_patient()
        .with(predicate::eq(3))
        .returning(|id| Ok(Some(patient(id))));
    let server = ctx.server();

    let response = server.get("/api/patients/3").await;

    response.assert_status(StatusCode::OK);
    let body = response.json::<Patient>();
    assert_eq!(body.id, 3);
    assert_eq!(body.name, "Ana Souza");
}

#[tokio::test]
async fn test_get_unknown_patient_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.patient_repo.expect_get_patient().returning(|_| Ok(None));
    let server = ctx.server();

    let response = server.get("/api/patients/99").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<ErrorBody>().kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_list_patients() {
    let mut ctx = TestContext::new();
    ctx.patient_repo
        .expect_list_patients()
        .returning(|| Ok(vec![patient(1), patient(2)]));
    let server = ctx.server();

    let body = server.get("/api/patients").await.json::<Vec<Patient>>();

    let ids: Vec<_> = body.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_list_patients_query_failure() {
    let mut ctx = TestContext::new();
    ctx.patient_repo
        .expect_list_patients()
        .returning(|| Err(eyre::eyre!("connection reset")));
    let server = ctx.server();

    let response = server.get("/api/patients").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<ErrorBody>().kind, ErrorKind::QueryFailure);
}

#[tokio::test]
async fn test_update_patient_revalidates_and_normalizes() {
    let mut ctx = TestContext::new();
    ctx.patient_repo
        .expect_update_patient()
        .withf(|id, p: &NewPatient| *id == 3 && p.name == "Ana Lima" && p.email == "ana.lima@example.com")
        .times(1)
        .returning(|id, p| {
            Ok(Some(Patient {
                id,
                name: p.name.clone(),
                email: p.email.clone(),
                created_at: Utc::now(),
            }))
        });
    let server = ctx.server();

    let response = server
        .put("/api/patients/3")
        .json(&json!({ "name": " Ana Lima", "email": "ANA.LIMA@example.com " }))
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Patient>().email, "ana.lima@example.com");
}

#[tokio::test]
async fn test_update_patient_rejects_short_name_before_storage() {
    let mut ctx = TestContext::new();
    ctx.patient_repo.expect_update_patient().times(0);
    let server = ctx.server();

    let response = server
        .put("/api/patients/3")
        .json(&json!({ "name": "A", "email": "ana@example.com" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<ErrorBody>().kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_update_unknown_patient_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.patient_repo
        .expect_update_patient()
        .returning(|_, _| Ok(None));
    let server = ctx.server();

    let response = server
        .put("/api/patients/99")
        .json(&json!({ "name": "Ana Souza", "email": "ana@example.com" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_patient() {
    let mut ctx = TestContext::new();
    ctx.patient_repo
        .expect_delete_patient()
        .with(predicate::eq(3))
        .times(1)
        .returning(|_| Ok(true));
    let server = ctx.server();

    server
        .delete("/api/patients/3")
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_delete_unknown_patient_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.patient_repo.expect_delete_patient().returning(|_| Ok(false));
    let server = ctx.server();

    let response = server.delete("/api/patients/99").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<ErrorBody>().kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_patient_with_appointments_is_refused() {
    let mut ctx = TestContext::new();
    ctx.patient_repo.expect_delete_patient().returning(|id| {
        Err(ClinicError::Validation(format!("Patient {} still has appointments", id)).into())
    });
    let server = ctx.server();

    let response = server.delete("/api/patients/3").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<ErrorBody>();
    assert_eq!(body.kind, ErrorKind::Validation);
    assert_eq!(body.message, "Validation error: Patient 3 still has appointments");
}
