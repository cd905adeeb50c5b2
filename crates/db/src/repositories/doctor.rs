use async_trait::async_trait;
use clinic_core::{
    errors::ClinicError,
    models::{
        appointment::DoctorId,
        doctor::{Doctor, NewDoctor},
    },
    ports::DoctorRegistry,
};
use eyre::Result;
use sqlx::{Pool, Postgres};

use super::violates_foreign_key;
use crate::models::DbDoctor;

pub async fn create_doctor(pool: &Pool<Postgres>, doctor: &NewDoctor) -> Result<DbDoctor> {
    tracing::debug!("Creating doctor: name={}, crm={}", doctor.name, doctor.crm);

    let row = sqlx::query_as::<_, DbDoctor>(
        r#"
        INSERT INTO doctors (name, crm)
        VALUES ($1, $2)
        RETURNING id, name, crm, created_at
        "#,
    )
    .bind(&doctor.name)
    .bind(&doctor.crm)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Doctor created successfully: id={}", row.id);
    Ok(row)
}

pub async fn list_doctors(pool: &Pool<Postgres>) -> Result<Vec<DbDoctor>> {
    let rows = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, crm, created_at
        FROM doctors
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_doctor_by_id(pool: &Pool<Postgres>, id: DoctorId) -> Result<Option<DbDoctor>> {
    let row = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, name, crm, created_at
        FROM doctors
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn update_doctor(
    pool: &Pool<Postgres>,
    id: DoctorId,
    doctor: &NewDoctor,
) -> Result<Option<DbDoctor>> {
    let row = sqlx::query_as::<_, DbDoctor>(
        r#"
        UPDATE doctors
        SET name = $2, crm = $3
        WHERE id = $1
        RETURNING id, name, crm, created_at
        "#,
    )
    .bind(id)
    .bind(&doctor.name)
    .bind(&doctor.crm)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_doctor(pool: &Pool<Postgres>, id: DoctorId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM doctors WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    tracing::debug!("Deleted doctor: id={}, rows={}", id, result.rows_affected());
    Ok(result.rows_affected() > 0)
}

#[derive(Debug, Clone)]
pub struct PgDoctorRegistry {
    pool: Pool<Postgres>,
}

impl PgDoctorRegistry {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DoctorRegistry for PgDoctorRegistry {
    async fn create_doctor(&self, doctor: &NewDoctor) -> Result<Doctor> {
        Ok(create_doctor(&self.pool, doctor).await?.into())
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        Ok(list_doctors(&self.pool)
            .await?
            .into_iter()
            .map(Doctor::from)
            .collect())
    }

    async fn get_doctor(&self, id: DoctorId) -> Result<Option<Doctor>> {
        Ok(get_doctor_by_id(&self.pool, id).await?.map(Doctor::from))
    }

    async fn update_doctor(&self, id: DoctorId, doctor: &NewDoctor) -> Result<Option<Doctor>> {
        Ok(update_doctor(&self.pool, id, doctor).await?.map(Doctor::from))
    }

    async fn delete_doctor(&self, id: DoctorId) -> Result<bool> {
        delete_doctor(&self.pool, id).await.map_err(|err| {
            if violates_foreign_key(&err) {
                ClinicError::Validation(format!("Doctor {} still has appointments", id)).into()
            } else {
                err
            }
        })
    }
}
