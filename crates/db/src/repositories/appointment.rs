//! Appointment persistence on PostgreSQL.
//!
//! A booking scope is a transaction holding `pg_advisory_xact_lock(doctor_id)`.
//! Concurrent scopes for the same doctor queue on that lock, so the overlap
//! query and the insert of one booking cannot interleave with another's.
//! Postgres releases the lock when the transaction commits or rolls back,
//! including when the scope is dropped and the connection returns to the pool.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use clinic_core::{
    errors::ClinicError,
    models::appointment::{Appointment, AppointmentId, DoctorId},
    ports::{AppointmentLedger, AppointmentStore, BookingScope, ScheduleQuery, SchedulingBackend},
};
use eyre::{Result, WrapErr, eyre};
use sqlx::{PgConnection, Pool, Postgres, Transaction};

use super::violates_foreign_key;
use crate::models::DbAppointment;

pub async fn list_appointments_by_doctor(
    pool: &Pool<Postgres>,
    doctor_id: DoctorId,
) -> Result<Vec<DbAppointment>> {
    let rows = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, patient_id, doctor_id, start_time, end_time, created_at
        FROM appointments
        WHERE doctor_id = $1
        ORDER BY start_time ASC
        "#,
    )
    .bind(doctor_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn find_overlapping(
    conn: &mut PgConnection,
    doctor_id: DoctorId,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<DbAppointment>> {
    let rows = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, patient_id, doctor_id, start_time, end_time, created_at
        FROM appointments
        WHERE doctor_id = $1
          AND start_time < $3
          AND end_time > $2
        "#,
    )
    .bind(doctor_id)
    .bind(start)
    .bind(end)
    .fetch_all(conn)
    .await?;

    Ok(rows)
}

pub async fn insert_appointment(
    conn: &mut PgConnection,
    appointment: &Appointment,
) -> Result<AppointmentId> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO appointments (patient_id, doctor_id, start_time, end_time)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(appointment.patient_id())
    .bind(appointment.doctor_id())
    .bind(appointment.start())
    .bind(appointment.end())
    .fetch_one(conn)
    .await?;

    Ok(id)
}

#[derive(Debug, Clone)]
pub struct PgSchedulingBackend {
    pool: Pool<Postgres>,
    lock_timeout: Duration,
}

impl PgSchedulingBackend {
    pub fn new(pool: Pool<Postgres>, lock_timeout: Duration) -> Self {
        Self { pool, lock_timeout }
    }
}

#[async_trait]
impl SchedulingBackend for PgSchedulingBackend {
    async fn open_scope(&self, doctor_id: DoctorId) -> Result<Box<dyn BookingScope>> {
        let mut tx = self.pool.begin().await?;

        // Bounds the wait on the advisory lock below.
        sqlx::query("SELECT set_config('lock_timeout', $1, true)")
            .bind(format!("{}ms", self.lock_timeout.as_millis()))
            .execute(&mut *tx)
            .await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(doctor_id)
            .execute(&mut *tx)
            .await
            .wrap_err_with(|| format!("Failed to lock schedule of doctor {}", doctor_id))?;

        tracing::debug!("Opened booking scope for doctor {}", doctor_id);
        Ok(Box::new(PgBookingScope { tx: Some(tx) }))
    }
}

#[async_trait]
impl AppointmentLedger for PgSchedulingBackend {
    async fn appointments_for_doctor(&self, doctor_id: DoctorId) -> Result<Vec<Appointment>> {
        list_appointments_by_doctor(&self.pool, doctor_id)
            .await?
            .into_iter()
            .map(DbAppointment::into_appointment)
            .collect()
    }
}

pub struct PgBookingScope {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgBookingScope {
    fn conn(&mut self) -> Result<&mut PgConnection> {
        match self.tx.as_mut() {
            Some(tx) => Ok(&mut **tx),
            None => Err(eyre!("Booking scope already committed")),
        }
    }
}

#[async_trait]
impl ScheduleQuery for PgBookingScope {
    async fn query_overlapping(
        &mut self,
        doctor_id: DoctorId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Appointment>> {
        find_overlapping(self.conn()?, doctor_id, start, end)
            .await?
            .into_iter()
            .map(DbAppointment::into_appointment)
            .collect()
    }
}

#[async_trait]
impl AppointmentStore for PgBookingScope {
    async fn save(&mut self, candidate: &Appointment) -> Result<AppointmentId> {
        insert_appointment(self.conn()?, candidate)
            .await
            .map_err(|err| {
                if violates_foreign_key(&err) {
                    ClinicError::MissingReference(format!(
                        "patient {} or doctor {} does not exist",
                        candidate.patient_id(),
                        candidate.doctor_id()
                    ))
                    .into()
                } else {
                    err
                }
            })
    }
}

#[async_trait]
impl BookingScope for PgBookingScope {
    async fn commit(&mut self) -> Result<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| eyre!("Booking scope already committed"))?;
        tx.commit().await?;
        Ok(())
    }
}
