use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use clinic_core::{
    errors::ClinicError,
    models::{
        appointment::DoctorId,
        doctor::{
            CreateDoctorRequest, CreateDoctorResponse, Doctor, NewDoctor, UpdateDoctorRequest,
        },
    },
};
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<CreateDoctorResponse>), AppError> {
    let new_doctor = NewDoctor::new(&payload.name, &payload.crm)?;

    let doctor = state
        .doctors
        .create_doctor(&new_doctor)
        .await
        .map_err(ClinicError::PersistenceFailure)?;

    tracing::info!("Doctor registered: id={}, crm={}", doctor.id, doctor.crm);

    let response = CreateDoctorResponse {
        id: doctor.id,
        name: doctor.name,
        crm: doctor.crm,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    let doctors = state
        .doctors
        .list_doctors()
        .await
        .map_err(ClinicError::QueryFailure)?;

    Ok(Json(doctors))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<DoctorId>,
) -> Result<Json<Doctor>, AppError> {
    let doctor = find_doctor(&state, id).await?;
    Ok(Json(doctor))
}

pub(crate) async fn find_doctor(state: &ApiState, id: DoctorId) -> Result<Doctor, ClinicError> {
    state
        .doctors
        .get_doctor(id)
        .await
        .map_err(ClinicError::QueryFailure)?
        .ok_or_else(|| ClinicError::NotFound(format!("Doctor with ID {} not found", id)))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<DoctorId>,
    Json(payload): Json<UpdateDoctorRequest>,
) -> Result<Json<Doctor>, AppError> {
    let changes = NewDoctor::new(&payload.name, &payload.crm)?;

    let doctor = state
        .doctors
        .update_doctor(id, &changes)
        .await
        .map_err(|err| ClinicError::from_report(err, ClinicError::PersistenceFailure))?
        .ok_or_else(|| ClinicError::NotFound(format!("Doctor with ID {} not found", id)))?;

    tracing::info!("Doctor updated: id={}", id);
    Ok(Json(doctor))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<DoctorId>,
) -> Result<StatusCode, AppError> {
    let deleted = state
        .doctors
        .delete_doctor(id)
        .await
        .map_err(|err| ClinicError::from_report(err, ClinicError::PersistenceFailure))?;

    if !deleted {
        return Err(ClinicError::NotFound(format!("Doctor with ID {} not found", id)).into());
    }

    tracing::info!("Doctor removed: id={}", id);
    Ok(StatusCode::NO_CONTENT)
}
