//! # Booking Engine
//!
//! Decides whether a candidate appointment may be booked and, if so, stores it.
//!
//! An attempt runs the pure [`rules`] in order (duration, business hours,
//! lead time), then opens a per-doctor [`BookingScope`] to look for
//! overlapping appointments and save the candidate. The first failing step
//! ends the attempt. Nothing is written unless every step passes, and the
//! doctor's scope is released on every exit path.

pub mod conflict;
pub mod policy;
pub mod rules;

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::errors::{ClinicError, ClinicResult};
use crate::models::appointment::{Appointment, AppointmentId, DoctorId, PatientId};
use crate::ports::{BookingScope, SchedulingBackend};

pub use conflict::find_conflict;
pub use policy::BookingPolicy;
pub use rules::{BookingRule, default_rules};

/// Stateless between calls; safe to share behind an `Arc` across requests.
pub struct BookingEngine {
    backend: Arc<dyn SchedulingBackend>,
    clock: Arc<dyn Clock>,
    rules: Vec<Box<dyn BookingRule>>,
}

impl BookingEngine {
    pub fn new(
        backend: Arc<dyn SchedulingBackend>,
        clock: Arc<dyn Clock>,
        policy: &BookingPolicy,
    ) -> Self {
        Self {
            backend,
            clock,
            rules: default_rules(policy),
        }
    }

    /// Replaces the pre-I/O rule list. The conflict check always runs last.
    pub fn with_rules(mut self, rules: Vec<Box<dyn BookingRule>>) -> Self {
        self.rules = rules;
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Builds a candidate from raw fields and books it.
    pub async fn book(
        &self,
        patient_id: PatientId,
        doctor_id: DoctorId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ClinicResult<AppointmentId> {
        let candidate = Appointment::new(patient_id, doctor_id, start, end)?;
        self.book_candidate(&candidate).await
    }

    /// Runs the rules without touching storage.
    pub fn validate(&self, candidate: &Appointment) -> ClinicResult<()> {
        self.validate_at(candidate, self.clock.now())
    }

    fn validate_at(&self, candidate: &Appointment, now: NaiveDateTime) -> ClinicResult<()> {
        for rule in &self.rules {
            if let Err(err) = rule.check(candidate, now) {
                debug!("Rule {} rejected candidate: {}", rule.name(), err);
                return Err(err);
            }
        }
        Ok(())
    }

    pub async fn book_candidate(&self, candidate: &Appointment) -> ClinicResult<AppointmentId> {
        if let Some(id) = candidate.id() {
            return Err(ClinicError::Validation(format!(
                "Appointment {} is already booked",
                id
            )));
        }

        debug!(
            "Booking attempt: patient={}, doctor={}, start={}, end={}",
            candidate.patient_id(),
            candidate.doctor_id(),
            candidate.start(),
            candidate.end()
        );

        let result = self.run_pipeline(candidate).await;
        match &result {
            Ok(id) => info!(
                "Appointment booked: id={}, doctor={}, start={}",
                id,
                candidate.doctor_id(),
                candidate.start()
            ),
            Err(err) if err.is_rule_violation() => info!(
                "Booking rejected: doctor={}, start={}, kind={:?}",
                candidate.doctor_id(),
                candidate.start(),
                err.kind()
            ),
            Err(err) => warn!(
                "Booking failed: doctor={}, start={}, error={}",
                candidate.doctor_id(),
                candidate.start(),
                err
            ),
        }
        result
    }

    async fn run_pipeline(&self, candidate: &Appointment) -> ClinicResult<AppointmentId> {
        self.validate_at(candidate, self.clock.now())?;

        let mut scope = self
            .backend
            .open_scope(candidate.doctor_id())
            .await
            .map_err(ClinicError::QueryFailure)?;

        check_conflicts(scope.as_mut(), candidate).await?;

        let id = scope
            .save(candidate)
            .await
            .map_err(|err| ClinicError::from_report(err, ClinicError::PersistenceFailure))?;
        scope
            .commit()
            .await
            .map_err(ClinicError::PersistenceFailure)?;

        Ok(id)
    }
}

async fn check_conflicts(scope: &mut dyn BookingScope, candidate: &Appointment) -> ClinicResult<()> {
    let existing = scope
        .query_overlapping(candidate.doctor_id(), candidate.start(), candidate.end())
        .await
        .map_err(ClinicError::QueryFailure)?;

    match find_conflict(candidate, &existing) {
        Some(booked) => Err(ClinicError::DoctorDoubleBooked {
            doctor_id: candidate.doctor_id(),
            conflicting: Some(Box::new(booked.clone())),
        }),
        None => Ok(()),
    }
}
