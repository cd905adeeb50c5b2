use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{ClinicError, ClinicResult};
use crate::models::appointment::DoctorId;
use crate::models::patient::validate_person_name;

// Medical council registration: "CRM" followed by 4 to 6 digits.
static CRM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^CRM\d{4,6}$").expect("Invalid CRM regex"));

pub const CRM_MAX_LEN: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub crm: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDoctor {
    pub name: String,
    pub crm: String,
}

impl NewDoctor {
    pub fn new(name: &str, crm: &str) -> ClinicResult<Self> {
        let name = validate_person_name(name, "doctor")?;

        let crm = crm.trim().to_uppercase();
        if crm.is_empty() {
            return Err(ClinicError::Validation("CRM is required".to_string()));
        }
        if !CRM_PATTERN.is_match(&crm) {
            return Err(ClinicError::Validation(
                "CRM must be CRM followed by 4 to 6 digits (e.g. CRM12345)".to_string(),
            ));
        }
        if crm.len() > CRM_MAX_LEN {
            return Err(ClinicError::Validation(format!(
                "CRM cannot exceed {} characters",
                CRM_MAX_LEN
            )));
        }

        Ok(Self { name, crm })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub crm: String,
}

/// Full replacement of a doctor's editable fields; validated like a registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: String,
    pub crm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorResponse {
    pub id: DoctorId,
    pub name: String,
    pub crm: String,
}
