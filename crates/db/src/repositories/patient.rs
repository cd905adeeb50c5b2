use async_trait::async_trait;
use clinic_core::{
    errors::ClinicError,
    models::{
        appointment::PatientId,
        patient::{NewPatient, Patient},
    },
    ports::PatientRegistry,
};
use eyre::Result;
use sqlx::{Pool, Postgres};

use super::violates_foreign_key;
use crate::models::DbPatient;

pub async fn create_patient(pool: &Pool<Postgres>, patient: &NewPatient) -> Result<DbPatient> {
    tracing::debug!("Creating patient: name={}, email={}", patient.name, patient.email);

    let row = sqlx::query_as::<_, DbPatient>(
        r#"
        INSERT INTO patients (name, email)
        VALUES ($1, $2)
        RETURNING id, name, email, created_at
        "#,
    )
    .bind(&patient.name)
    .bind(&patient.email)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Patient created successfully: id={}", row.id);
    Ok(row)
}

pub async fn list_patients(pool: &Pool<Postgres>) -> Result<Vec<DbPatient>> {
    let rows = sqlx::query_as::<_, DbPatient>(
        r#"
        SELECT id, name, email, created_at
        FROM patients
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_patient_by_id(pool: &Pool<Postgres>, id: PatientId) -> Result<Option<DbPatient>> {
    let row = sqlx::query_as::<_, DbPatient>(
        r#"
        SELECT id, name, email, created_at
        FROM patients
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn update_patient(
    pool: &Pool<Postgres>,
    id: PatientId,
    patient: &NewPatient,
) -> Result<Option<DbPatient>> {
    let row = sqlx::query_as::<_, DbPatient>(
        r#"
        UPDATE patients
        SET name = $2, email = $3
        WHERE id = $1
        RETURNING id, name, email, created_at
        "#,
    )
    .bind(id)
    .bind(&patient.name)
    .bind(&patient.email)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_patient(pool: &Pool<Postgres>, id: PatientId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM patients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    tracing::debug!("Deleted patient: id={}, rows={}", id, result.rows_affected());
    Ok(result.rows_affected() > 0)
}

/// [`PatientRegistry`] backed by the `patients` table.
#[derive(Debug, Clone)]
pub struct PgPatientRegistry {
    pool: Pool<Postgres>,
}

impl PgPatientRegistry {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatientRegistry for PgPatientRegistry {
    async fn create_patient(&self, patient: &NewPatient) -> Result<Patient> {
        Ok(create_patient(&self.pool, patient).await?.into())
    }

    async fn list_patients(&self) -> Result<Vec<Patient>> {
        Ok(list_patients(&self.pool)
            .await?
            .into_iter()
            .map(Patient::from)
            .collect())
    }

    async fn get_patient(&self, id: PatientId) -> Result<Option<Patient>> {
        Ok(get_patient_by_id(&self.pool, id).await?.map(Patient::from))
    }

    async fn update_patient(&self, id: PatientId, patient: &NewPatient) -> Result<Option<Patient>> {
        Ok(update_patient(&self.pool, id, patient).await?.map(Patient::from))
    }

    async fn delete_patient(&self, id: PatientId) -> Result<bool> {
        delete_patient(&self.pool, id).await.map_err(|err| {
            if violates_foreign_key(&err) {
                ClinicError::Validation(format!("Patient {} still has appointments", id)).into()
            } else {
                err
            }
        })
    }
}
