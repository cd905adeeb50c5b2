use chrono::{DateTime, NaiveDateTime, Utc};
use clinic_core::models::{appointment::Appointment, doctor::Doctor, patient::Patient};
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPatient {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbPatient> for Patient {
    fn from(row: DbPatient) -> Self {
        Patient {
            id: row.id,
            name: row.name,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDoctor {
    pub id: i64,
    pub name: String,
    pub crm: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbDoctor> for Doctor {
    fn from(row: DbDoctor) -> Self {
        Doctor {
            id: row.id,
            name: row.name,
            crm: row.crm,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub created_at: DateTime<Utc>,
}

impl DbAppointment {
    pub fn into_appointment(self) -> Result<Appointment> {
        let appointment =
            Appointment::new(self.patient_id, self.doctor_id, self.start_time, self.end_time)
                .map_err(|e| eyre!("Stored appointment {} is invalid: {}", self.id, e))?;
        Ok(appointment.with_id(self.id))
    }
}
