use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::appointment::Appointment;

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Missing reference: {0}")]
    MissingReference(String),

    #[error("Appointment too short: {actual} minutes, minimum is {minimum}")]
    DurationTooShort { actual: i64, minimum: i64 },

    #[error("Outside business hours: {0}")]
    OutsideBusinessHours(String),

    #[error("Insufficient lead time: {actual} minutes, minimum is {minimum}")]
    InsufficientLeadTime { actual: i64, minimum: i64 },

    #[error("Doctor {doctor_id} already has an appointment in this time range")]
    DoctorDoubleBooked {
        doctor_id: i64,
        conflicting: Option<Box<Appointment>>,
    },

    #[error("Schedule query failed: {0}")]
    QueryFailure(eyre::Report),

    #[error("Persistence failed: {0}")]
    PersistenceFailure(eyre::Report),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

/// Stable, serializable classification of a [`ClinicError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidInterval,
    MissingReference,
    DurationTooShort,
    OutsideBusinessHours,
    InsufficientLeadTime,
    DoctorDoubleBooked,
    QueryFailure,
    PersistenceFailure,
    Validation,
    NotFound,
}

impl ClinicError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClinicError::InvalidInterval(_) => ErrorKind::InvalidInterval,
            ClinicError::MissingReference(_) => ErrorKind::MissingReference,
            ClinicError::DurationTooShort { .. } => ErrorKind::DurationTooShort,
            ClinicError::OutsideBusinessHours(_) => ErrorKind::OutsideBusinessHours,
            ClinicError::InsufficientLeadTime { .. } => ErrorKind::InsufficientLeadTime,
            ClinicError::DoctorDoubleBooked { .. } => ErrorKind::DoctorDoubleBooked,
            ClinicError::QueryFailure(_) => ErrorKind::QueryFailure,
            ClinicError::PersistenceFailure(_) => ErrorKind::PersistenceFailure,
            ClinicError::Validation(_) => ErrorKind::Validation,
            ClinicError::NotFound(_) => ErrorKind::NotFound,
        }
    }

    /// True for the rejections produced by the booking rules themselves,
    /// as opposed to collaborator failures or registry errors.
    pub fn is_rule_violation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidInterval
                | ErrorKind::MissingReference
                | ErrorKind::DurationTooShort
                | ErrorKind::OutsideBusinessHours
                | ErrorKind::InsufficientLeadTime
                | ErrorKind::DoctorDoubleBooked
        )
    }

    /// Recovers a `ClinicError` that a collaborator converted into `err`;
    /// any other report is wrapped with `fallback`.
    pub fn from_report(err: eyre::Report, fallback: fn(eyre::Report) -> ClinicError) -> Self {
        match err.downcast::<ClinicError>() {
            Ok(classified) => classified,
            Err(err) => fallback(err),
        }
    }

    /// The existing appointment that caused a `DoctorDoubleBooked` rejection, if known.
    pub fn conflicting(&self) -> Option<&Appointment> {
        match self {
            ClinicError::DoctorDoubleBooked { conflicting, .. } => conflicting.as_deref(),
            _ => None,
        }
    }
}

pub type ClinicResult<T> = Result<T, ClinicError>;
