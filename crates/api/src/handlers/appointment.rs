//! Booking endpoints. All booking decisions are made by the engine; the
//! handlers only translate between JSON and engine calls.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use clinic_core::{
    errors::ClinicError,
    models::appointment::{
        AppointmentResponse, BookAppointmentRequest, BookAppointmentResponse, DoctorId,
    },
};
use std::sync::Arc;

use crate::{ApiState, handlers::doctor::find_doctor, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<BookAppointmentResponse>), AppError> {
    let end = payload.resolve_end()?;

    let id = state
        .booking
        .book(payload.patient_id, payload.doctor_id, payload.start, end)
        .await?;

    Ok((StatusCode::CREATED, Json(BookAppointmentResponse { id })))
}

#[axum::debug_handler]
pub async fn list_doctor_appointments(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<DoctorId>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    find_doctor(&state, doctor_id).await?;

    let appointments = state
        .ledger
        .appointments_for_doctor(doctor_id)
        .await
        .map_err(ClinicError::QueryFailure)?;

    Ok(Json(
        appointments.iter().map(AppointmentResponse::from).collect(),
    ))
}
