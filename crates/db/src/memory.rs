//! In-process scheduling backend.
//!
//! Each doctor has its own async mutex; a booking scope owns that doctor's
//! guard until it is committed or dropped. Saves are staged inside the scope
//! and only become visible on commit.
//!
//! Lock entries are created on first use and never removed, so memory grows
//! with the number of distinct doctor ids seen. Meant for tests and local runs.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use clinic_core::{
    models::appointment::{Appointment, AppointmentId, DoctorId},
    ports::{AppointmentLedger, AppointmentStore, BookingScope, ScheduleQuery, SchedulingBackend},
};
use eyre::{Result, eyre};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

#[derive(Default)]
struct Inner {
    appointments: RwLock<Vec<Appointment>>,
    doctor_locks: Mutex<HashMap<DoctorId, Arc<Mutex<()>>>>,
    last_id: AtomicI64,
}

#[derive(Clone)]
pub struct InMemorySchedule {
    inner: Arc<Inner>,
    lock_timeout: Duration,
}

impl Default for InMemorySchedule {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl InMemorySchedule {
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Inner::default()),
            lock_timeout,
        }
    }

    /// Number of committed appointments across all doctors.
    pub async fn len(&self) -> usize {
        self.inner.appointments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // Entries are never evicted.
    async fn doctor_lock(&self, doctor_id: DoctorId) -> Arc<Mutex<()>> {
        self.inner
            .doctor_locks
            .lock()
            .await
            .entry(doctor_id)
            .or_default()
            .clone()
    }
}

#[async_trait]
impl SchedulingBackend for InMemorySchedule {
    async fn open_scope(&self, doctor_id: DoctorId) -> Result<Box<dyn BookingScope>> {
        let lock = self.doctor_lock(doctor_id).await;
        let guard = tokio::time::timeout(self.lock_timeout, lock.lock_owned())
            .await
            .map_err(|_| {
                eyre!(
                    "Timed out after {:?} waiting for schedule of doctor {}",
                    self.lock_timeout,
                    doctor_id
                )
            })?;

        Ok(Box::new(InMemoryScope {
            inner: self.inner.clone(),
            _guard: guard,
            staged: Vec::new(),
        }))
    }
}

#[async_trait]
impl AppointmentLedger for InMemorySchedule {
    async fn appointments_for_doctor(&self, doctor_id: DoctorId) -> Result<Vec<Appointment>> {
        let mut appointments: Vec<_> = self
            .inner
            .appointments
            .read()
            .await
            .iter()
            .filter(|a| a.doctor_id() == doctor_id)
            .cloned()
            .collect();
        appointments.sort_by_key(|a| a.start());
        Ok(appointments)
    }
}

struct InMemoryScope {
    inner: Arc<Inner>,
    _guard: OwnedMutexGuard<()>,
    staged: Vec<Appointment>,
}

#[async_trait]
impl ScheduleQuery for InMemoryScope {
    async fn query_overlapping(
        &mut self,
        doctor_id: DoctorId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Appointment>> {
        let committed = self.inner.appointments.read().await;
        Ok(committed
            .iter()
            .chain(self.staged.iter())
            .filter(|a| a.doctor_id() == doctor_id && a.overlaps(start, end))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AppointmentStore for InMemoryScope {
    async fn save(&mut self, candidate: &Appointment) -> Result<AppointmentId> {
        let id = self.inner.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.staged.push(candidate.clone().with_id(id));
        Ok(id)
    }
}

#[async_trait]
impl BookingScope for InMemoryScope {
    async fn commit(&mut self) -> Result<()> {
        let mut committed = self.inner.appointments.write().await;
        committed.append(&mut self.staged);
        Ok(())
    }
}
