use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use clinic_core::{
    errors::ClinicError,
    models::{
        appointment::PatientId,
        patient::{
            CreatePatientRequest, CreatePatientResponse, NewPatient, Patient, UpdatePatientRequest,
        },
    },
};
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<CreatePatientResponse>), AppError> {
    let new_patient = NewPatient::new(&payload.name, &payload.email)?;

    let patient = state
        .patients
        .create_patient(&new_patient)
        .await
        .map_err(ClinicError::PersistenceFailure)?;

    tracing::info!("Patient registered: id={}", patient.id);

    let response = CreatePatientResponse {
        id: patient.id,
        name: patient.name,
        email: patient.email,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Patient>>, AppError> {
    let patients = state
        .patients
        .list_patients()
        .await
        .map_err(ClinicError::QueryFailure)?;

    Ok(Json(patients))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<PatientId>,
) -> Result<Json<Patient>, AppError> {
    let patient = state
        .patients
        .get_patient(id)
        .await
        .map_err(ClinicError::QueryFailure)?
        .ok_or_else(|| ClinicError::NotFound(format!("Patient with ID {} not found", id)))?;

    Ok(Json(patient))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<PatientId>,
    Json(payload): Json<UpdatePatientRequest>,
) -> Result<Json<Patient>, AppError> {
    let changes = NewPatient::new(&payload.name, &payload.email)?;

    let patient = state
        .patients
        .update_patient(id, &changes)
        .await
        .map_err(|err| ClinicError::from_report(err, ClinicError::PersistenceFailure))?
        .ok_or_else(|| ClinicError::NotFound(format!("Patient with ID {} not found", id)))?;

    tracing::info!("Patient updated: id={}", id);
    Ok(Json(patient))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<PatientId>,
) -> Result<StatusCode, AppError> {
    let deleted = state
        .patients
        .delete_patient(id)
        .await
        .map_err(|err| ClinicError::from_report(err, ClinicError::PersistenceFailure))?;

    if !deleted {
        return Err(ClinicError::NotFound(format!("Patient with ID {} not found", id)).into());
    }

    tracing::info!("Patient removed: id={}", id);
    Ok(StatusCode::NO_CONTENT)
}
