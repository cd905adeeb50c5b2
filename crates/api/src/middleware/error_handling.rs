//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and a JSON body of the form
//! `{"kind": "...", "message": "..."}`. A double-booking rejection also
//! carries the conflicting appointment under `"conflicting"`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clinic_core::{
    errors::{ClinicError, ErrorKind},
    models::appointment::AppointmentResponse,
};
use serde::{Deserialize, Serialize};

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use clinic_api::middleware::error_handling::AppError;
/// use clinic_core::errors::ClinicError;
///
/// async fn handler(id: i64) -> Result<Json<i64>, AppError> {
///     if id <= 0 {
///         return Err(ClinicError::NotFound(format!("Patient {} not found", id)).into());
///     }
///     Ok(Json(id))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub ClinicError);

/// JSON payload of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflicting: Option<AppointmentResponse>,
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidInterval
        | ErrorKind::MissingReference
        | ErrorKind::DurationTooShort
        | ErrorKind::OutsideBusinessHours
        | ErrorKind::InsufficientLeadTime => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::DoctorDoubleBooked => StatusCode::CONFLICT,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::QueryFailure | ErrorKind::PersistenceFailure => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);
        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self.0);
        }

        let body = ErrorBody {
            kind,
            message: self.0.to_string(),
            conflicting: self.0.conflicting().map(AppointmentResponse::from),
        };

        (status, Json(body)).into_response()
    }
}

/// Automatic conversion from ClinicError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, ClinicError>` in handler functions that return `Result<T, AppError>`.
impl From<ClinicError> for AppError {
    fn from(err: ClinicError) -> Self {
        AppError(err)
    }
}

/// Maps a ClinicError to an HTTP response
pub fn map_error(err: ClinicError) -> Response {
    AppError(err).into_response()
}
