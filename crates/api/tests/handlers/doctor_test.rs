use axum::http::StatusCode;
use chrono::Utc;
use clinic_api::middleware::error_handling::ErrorBody;
use clinic_core::{
    errors::{ClinicError, ErrorKind},
    models::doctor::{CreateDoctorResponse, Doctor, NewDoctor},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use crate::test_utils::{TestContext, doctor};

#[tokio::test]
async fn test_create_doctor_uppercases_crm() {
    let mut ctx = TestContext::new();
    ctx.doctor_repo
        .expect_create_doctor()
        .withf(|d: &NewDoctor| d.crm == "CRM12345")
        .times(1)
        .returning(|d| {
            Ok(Doctor {
                id: 4,
                name: d.name.clone(),
                crm: d.crm.clone(),
                created_at: Utc::now(),
            })
        });
    let server = ctx.server();

    let response = server
        .post("/api/doctors")
        .json(&json!({ "name": "Dr. Paulo Lima", "crm": "crm12345" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<CreateDoctorResponse>();
    assert_eq!(body.id, 4);
    assert_eq!(body.crm, "CRM12345");
}

#[rstest]
#[case::missing_prefix("12345")]
#[case::too_few_digits("CRM12")]
#[case::too_many_digits("CRM1234567")]
#[tokio::test]
async fn test_create_doctor_rejects_malformed_crm(#[case] crm: &str) {
    let mut ctx = TestContext::new();
    ctx.doctor_repo.expect_create_doctor().times(0);
    let server = ctx.server();

    let response = server
        .post("/api/doctors")
        .json(&json!({ "name": "Dr. Paulo Lima", "crm": crm }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<ErrorBody>().kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_get_doctor() {
    let mut ctx = TestContext::new();
    ctx.doctor_repo
        .expect_get_doctor()
        .returning(|id| Ok(Some(doctor(id))));
    let server = ctx.server();

    let body = server.get("/api/doctors/5").await.json::<Doctor>();

    assert_eq!(body.id, 5);
    assert_eq!(body.crm, "CRM12345");
}

#[tokio::test]
async fn test_get_unknown_doctor_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.doctor_repo.expect_get_doctor().returning(|_| Ok(None));
    let server = ctx.server();

    let response = server.get("/api/doctors/5").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_doctors() {
    let mut ctx = TestContext::new();
    ctx.doctor_repo
        .expect_list_doctors()
        .returning(|| Ok(vec![doctor(1)]));
    let server = ctx.server();

    let body = server.get("/api/doctors").await.json::<Vec<Doctor>>();

    assert_eq!(body.len(), 1);
    assert_eq!(body[0].name, "Dr. Paulo Lima");
}

#[tokio::test]
async fn test_update_doctor() {
    let mut ctx = TestContext::new();
    ctx.doctor_repo
        .expect_update_doctor()
        .withf(|id, d: &NewDoctor| *id == 5 && d.crm == "CRM654321")
        .times(1)
        .returning(|id, d| {
            Ok(Some(Doctor {
                id,
                name: d.name.clone(),
                crm: d.crm.clone(),
                created_at: Utc::now(),
            }))
        });
    let server = ctx.server();

    let response = server
        .put("/api/doctors/5")
        .json(&json!({ "name": "Dr. Paulo Lima", "crm": " crm654321 " }))
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Doctor>().crm, "CRM654321");
}

#[tokio::test]
async fn test_update_doctor_rejects_malformed_crm() {
    let mut ctx = TestContext::new();
    ctx.doctor_repo.expect_update_doctor().times(0);
    let server = ctx.server();

    let response = server
        .put("/api/doctors/5")
        .json(&json!({ "name": "Dr. Paulo Lima", "crm": "12345" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_unknown_doctor_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.doctor_repo
        .expect_update_doctor()
        .returning(|_, _| Ok(None));
    let server = ctx.server();

    let response = server
        .put("/api/doctors/5")
        .json(&json!({ "name": "Dr. Paulo Lima", "crm": "CRM12345" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_doctor() {
    let mut ctx = TestContext::new();
    ctx.doctor_repo
        .expect_delete_doctor()
        .times(1)
        .returning(|_| Ok(true));
    let server = ctx.server();

    server
        .delete("/api/doctors/5")
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_delete_doctor_with_appointments_is_refused() {
    let mut ctx = TestContext::new();
    ctx.doctor_repo.expect_delete_doctor().returning(|id| {
        Err(ClinicError::Validation(format!("Doctor {} still has appointments", id)).into())
    });
    let server = ctx.server();

    let response = server.delete("/api/doctors/5").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<ErrorBody>().kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_delete_doctor_storage_failure() {
    let mut ctx = TestContext::new();
    ctx.doctor_repo
        .expect_delete_doctor()
        .returning(|_| Err(eyre::eyre!("connection reset")));
    let server = ctx.server();

    let response = server.delete("/api/doctors/5").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<ErrorBody>().kind,
        ErrorKind::PersistenceFailure
    );
}
