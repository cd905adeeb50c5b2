use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::errors::{ClinicError, ClinicResult};

pub type AppointmentId = i64;
pub type PatientId = i64;
pub type DoctorId = i64;

/// A booked or candidate time slot linking one patient and one doctor.
///
/// Fields are private so that every value in existence has identified
/// participants and an interval where `end > start`. The interval is
/// half-open: `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appointment {
    id: Option<AppointmentId>,
    patient_id: PatientId,
    doctor_id: DoctorId,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl Appointment {
    /// Builds a candidate appointment (no id yet).
    pub fn new(
        patient_id: PatientId,
        doctor_id: DoctorId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ClinicResult<Self> {
        if patient_id <= 0 {
            return Err(ClinicError::MissingReference(format!(
                "patient id must be a positive identifier, got {}",
                patient_id
            )));
        }
        if doctor_id <= 0 {
            return Err(ClinicError::MissingReference(format!(
                "doctor id must be a positive identifier, got {}",
                doctor_id
            )));
        }
        if end <= start {
            return Err(ClinicError::InvalidInterval(format!(
                "end {} must be after start {}",
                end, start
            )));
        }

        Ok(Self {
            id: None,
            patient_id,
            doctor_id,
            start,
            end,
        })
    }

    /// Returns the persisted form of this appointment.
    pub fn with_id(self, id: AppointmentId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    pub fn id(&self) -> Option<AppointmentId> {
        self.id
    }

    pub fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    pub fn doctor_id(&self) -> DoctorId {
        self.doctor_id
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Half-open interval intersection. Back-to-back slots do not overlap.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && start < self.end
    }

    pub fn conflicts_with(&self, other: &Appointment) -> bool {
        self.doctor_id == other.doctor_id && self.overlaps(other.start, other.end)
    }

    pub(crate) fn start_hour(&self) -> u32 {
        self.start.hour()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    #[serde(default)]
    pub patient_id: PatientId,
    #[serde(default)]
    pub doctor_id: DoctorId,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub duration_minutes: Option<i64>,
}

impl BookAppointmentRequest {
    /// Resolves the end of the slot from either an explicit `end` or a duration.
    pub fn resolve_end(&self) -> ClinicResult<NaiveDateTime> {
        match (self.end, self.duration_minutes) {
            (Some(end), None) => Ok(end),
            (None, Some(minutes)) => chrono::Duration::try_minutes(minutes)
                .and_then(|duration| self.start.checked_add_signed(duration))
                .ok_or_else(|| {
                    ClinicError::Validation(format!("duration_minutes {} is out of range", minutes))
                }),
            (Some(_), Some(_)) => Err(ClinicError::Validation(
                "Provide either end or duration_minutes, not both".to_string(),
            )),
            (None, None) => Err(ClinicError::Validation(
                "Either end or duration_minutes is required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentResponse {
    pub id: AppointmentId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub id: Option<AppointmentId>,
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_minutes: i64,
}

impl From<&Appointment> for AppointmentResponse {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id(),
            patient_id: appointment.patient_id(),
            doctor_id: appointment.doctor_id(),
            start: appointment.start(),
            end: appointment.end(),
            duration_minutes: appointment.duration_minutes(),
        }
    }
}
