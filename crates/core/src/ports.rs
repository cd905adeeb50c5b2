//! Storage capabilities the booking engine depends on.
//!
//! The engine never talks to a database directly. A [`SchedulingBackend`]
//! hands out a [`BookingScope`] for one doctor; while the scope is alive no
//! other scope for the same doctor can read or write that doctor's
//! appointments. The overlap query and the save therefore happen against a
//! consistent view of the doctor's schedule.
//!
//! Dropping a scope without calling [`BookingScope::commit`] discards any
//! staged write and releases the doctor.
//!
//! The patient and doctor registries are plain CRUD collaborators; the
//! engine never consults them. Deleting a patient or doctor who still has
//! appointments may be refused with a converted [`ClinicError::Validation`].
//!
//! [`ClinicError::Validation`]: crate::errors::ClinicError::Validation

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::models::{
    appointment::{Appointment, AppointmentId, DoctorId, PatientId},
    doctor::{Doctor, NewDoctor},
    patient::{NewPatient, Patient},
};

/// Answers "which appointments of this doctor intersect `[start, end)`".
#[async_trait]
pub trait ScheduleQuery: Send {
    /// Every persisted appointment of `doctor_id` whose interval intersects
    /// `[start, end)`, in no particular order.
    async fn query_overlapping(
        &mut self,
        doctor_id: DoctorId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> eyre::Result<Vec<Appointment>>;
}

/// Persists a candidate appointment and returns its new identifier.
///
/// A save rejected because the patient or doctor does not exist may be
/// reported as a [`ClinicError::MissingReference`] converted into the report;
/// the engine passes it through unchanged.
///
/// [`ClinicError::MissingReference`]: crate::errors::ClinicError::MissingReference
#[async_trait]
pub trait AppointmentStore: Send {
    async fn save(&mut self, candidate: &Appointment) -> eyre::Result<AppointmentId>;
}

/// Per-doctor unit of work covering the conflict check and the save.
#[async_trait]
pub trait BookingScope: ScheduleQuery + AppointmentStore {
    /// Makes the saved appointment visible to other scopes and releases the doctor.
    async fn commit(&mut self) -> eyre::Result<()>;
}

#[async_trait]
pub trait SchedulingBackend: Send + Sync {
    /// Waits for exclusive access to `doctor_id`'s schedule.
    async fn open_scope(&self, doctor_id: DoctorId) -> eyre::Result<Box<dyn BookingScope>>;
}

/// Read access to a doctor's booked appointments outside of a booking scope.
#[async_trait]
pub trait AppointmentLedger: Send + Sync {
    /// All appointments of `doctor_id`, earliest first.
    async fn appointments_for_doctor(&self, doctor_id: DoctorId) -> eyre::Result<Vec<Appointment>>;
}

#[async_trait]
pub trait PatientRegistry: Send + Sync {
    async fn create_patient(&self, patient: &NewPatient) -> eyre::Result<Patient>;

    async fn list_patients(&self) -> eyre::Result<Vec<Patient>>;

    async fn get_patient(&self, id: PatientId) -> eyre::Result<Option<Patient>>;

    /// Replaces name and email. `None` when no patient has `id`.
    async fn update_patient(&self, id: PatientId, patient: &NewPatient) -> eyre::Result<Option<Patient>>;

    /// `false` when no patient has `id`.
    async fn delete_patient(&self, id: PatientId) -> eyre::Result<bool>;
}

#[async_trait]
pub trait DoctorRegistry: Send + Sync {
    async fn create_doctor(&self, doctor: &NewDoctor) -> eyre::Result<Doctor>;

    async fn list_doctors(&self) -> eyre::Result<Vec<Doctor>>;

    async fn get_doctor(&self, id: DoctorId) -> eyre::Result<Option<Doctor>>;

    async fn update_doctor(&self, id: DoctorId, doctor: &NewDoctor) -> eyre::Result<Option<Doctor>>;

    async fn delete_doctor(&self, id: DoctorId) -> eyre::Result<bool>;
}
