use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{ClinicError, ClinicResult};
use crate::models::appointment::PatientId;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 120;
pub const EMAIL_MAX_LEN: usize = 120;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A validated, normalized patient registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    pub name: String,
    pub email: String,
}

impl NewPatient {
    pub fn new(name: &str, email: &str) -> ClinicResult<Self> {
        let name = validate_person_name(name, "patient")?;

        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(ClinicError::Validation("Email is required".to_string()));
        }
        if !EMAIL_PATTERN.is_match(&email) {
            return Err(ClinicError::Validation(
                "Email must be a valid address (e.g. user@domain.com)".to_string(),
            ));
        }
        if email.chars().count() > EMAIL_MAX_LEN {
            return Err(ClinicError::Validation(format!(
                "Email cannot exceed {} characters",
                EMAIL_MAX_LEN
            )));
        }

        Ok(Self { name, email })
    }
}

/// Shared name rule for patients and doctors. Returns the trimmed name.
pub(crate) fn validate_person_name(name: &str, role: &str) -> ClinicResult<String> {
    let name = name.trim();
    let len = name.chars().count();
    if len == 0 {
        return Err(ClinicError::Validation(format!("The {} name is required", role)));
    }
    if len < NAME_MIN_LEN {
        return Err(ClinicError::Validation(format!(
            "The {} name must have at least {} characters",
            role, NAME_MIN_LEN
        )));
    }
    if len > NAME_MAX_LEN {
        return Err(ClinicError::Validation(format!(
            "The {} name cannot exceed {} characters",
            role, NAME_MAX_LEN
        )));
    }
    Ok(name.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub email: String,
}

/// Full replacement of a patient's editable fields; validated like a registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientResponse {
    pub id: PatientId,
    pub name: String,
    pub email: String,
}
