use axum::{body::to_bytes, http::StatusCode};
use chrono::NaiveDate;
use clinic_api::middleware::error_handling::{ErrorBody, map_error, status_for};
use clinic_core::{
    errors::{ClinicError, ErrorKind},
    models::appointment::Appointment,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case(ErrorKind::InvalidInterval, StatusCode::UNPROCESSABLE_ENTITY)]
#[case(ErrorKind::MissingReference, StatusCode::UNPROCESSABLE_ENTITY)]
#[case(ErrorKind::DurationTooShort, StatusCode::UNPROCESSABLE_ENTITY)]
#[case(ErrorKind::OutsideBusinessHours, StatusCode::UNPROCESSABLE_ENTITY)]
#[case(ErrorKind::InsufficientLeadTime, StatusCode::UNPROCESSABLE_ENTITY)]
#[case(ErrorKind::DoctorDoubleBooked, StatusCode::CONFLICT)]
#[case(ErrorKind::Validation, StatusCode::BAD_REQUEST)]
#[case(ErrorKind::NotFound, StatusCode::NOT_FOUND)]
#[case(ErrorKind::QueryFailure, StatusCode::INTERNAL_SERVER_ERROR)]
#[case(ErrorKind::PersistenceFailure, StatusCode::INTERNAL_SERVER_ERROR)]
fn test_status_for(#[case] kind: ErrorKind, #[case] expected: StatusCode) {
    assert_eq!(status_for(kind), expected);
}

async fn body_of(response: axum::response::Response) -> ErrorBody {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_error_handling_not_found() {
    let response = map_error(ClinicError::NotFound("Patient with ID 3 not found".to_string()));

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_of(response).await;
    assert_eq!(body.kind, ErrorKind::NotFound);
    assert_eq!(body.message, "Resource not found: Patient with ID 3 not found");
    assert!(body.conflicting.is_none());
}

#[tokio::test]
async fn test_error_handling_double_booking_carries_conflict() {
    let day = NaiveDate::from_ymd_opt(2030, 3, 4).unwrap();
    let booked = Appointment::new(
        1,
        2,
        day.and_hms_opt(10, 0, 0).unwrap(),
        day.and_hms_opt(10, 30, 0).unwrap(),
    )
    .unwrap()
    .with_id(11);

    let response = map_error(ClinicError::DoctorDoubleBooked {
        doctor_id: 2,
        conflicting: Some(Box::new(booked)),
    });

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_of(response).await;
    assert_eq!(body.kind, ErrorKind::DoctorDoubleBooked);
    let conflicting = body.conflicting.unwrap();
    assert_eq!(conflicting.id, Some(11));
    assert_eq!(conflicting.doctor_id, 2);
    assert_eq!(conflicting.duration_minutes, 30);
}

#[tokio::test]
async fn test_error_handling_persistence_failure() {
    let response = map_error(ClinicError::PersistenceFailure(eyre::eyre!("disk full")));

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_of(response).await.kind, ErrorKind::PersistenceFailure);
}
