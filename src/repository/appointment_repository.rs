// repository/appointment_repository.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::repository::store::{BookingStore, IdempotencyRecord};

// Half-open interval overlap. Empty intervals ([start, start)) never overlap
// anything, and back-to-back appointments (end == start) do not overlap.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    if a_start >= a_end || b_start >= b_end {
        return false;
    }
    a_start < b_end && a_end > b_start
}

// A candidate window conflicts when the same staff member already holds a
// non-cancelled appointment overlapping it.
pub fn has_conflict(
    appointments: &[Appointment],
    staff_id: &str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    exclude_id: Option<&str>,
) -> bool {
    appointments.iter().any(|apt| {
        apt.staff_id == staff_id
            && apt.status != AppointmentStatus::Cancelled
            && exclude_id != Some(apt.id.as_str())
            && intervals_overlap(start_time, end_time, apt.start_time, apt.end_time)
    })
}

pub enum CreateOutcome {
    Created(Appointment),
    // Verbatim response stored by an earlier request with the same key.
    Replayed(serde_json::Value),
}

#[derive(Debug, PartialEq, Eq)]
pub enum CreateError {
    SlotConflict,
    IdempotencyMismatch,
}

#[derive(Debug, PartialEq, Eq)]
pub enum UpdateError {
    NotFound,
    SlotConflict,
}

#[derive(Default)]
pub struct AppointmentUpdate {
    pub service_id: Option<String>,
    pub staff_id: Option<String>,
    pub customer_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub status: Option<AppointmentStatus>,
}

#[derive(Default)]
pub struct AppointmentQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub staff_id: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub upcoming: bool,
    pub limit: Option<usize>,
    pub q: Option<String>,
}

pub struct AppointmentRepository {
    store: Arc<BookingStore>,
}

impl AppointmentRepository {
    pub fn new(store: &Arc<BookingStore>) -> Self {
        AppointmentRepository {
            store: Arc::clone(store),
        }
    }

    pub fn list(&self, salon_id: &str) -> Vec<Appointment> {
        self.store
            .lock()
            .appointments
            .get(salon_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn list_filtered(&self, salon_id: &str, query: &AppointmentQuery) -> Vec<Appointment> {
        let mut appointments = self.list(salon_id);

        if let Some(from) = query.from {
            appointments.retain(|a| a.start_time >= from);
        }
        if let Some(to) = query.to {
            appointments.retain(|a| a.end_time <= to);
        }
        if let Some(staff_id) = &query.staff_id {
            appointments.retain(|a| &a.staff_id == staff_id);
        }
        if let Some(status) = query.status {
            appointments.retain(|a| a.status == status);
        }
        if query.upcoming {
            let now = Utc::now();
            appointments.retain(|a| a.start_time >= now);
            appointments.sort_by_key(|a| a.start_time);
        }
        if let Some(q) = &query.q {
            let needle = q.to_lowercase();
            appointments.retain(|a| {
                a.notes
                    .as_ref()
                    .is_some_and(|notes| notes.to_lowercase().contains(&needle))
            });
        }
        if let Some(limit) = query.limit {
            appointments.truncate(limit);
        }

        appointments
    }

    pub fn lookup_idempotency(&self, idempotency_key: &str) -> Option<IdempotencyRecord> {
        self.store.lock().idempotency.get(idempotency_key).cloned()
    }

    // Idempotency lookup, conflict check, insert and response recording all
    // happen under one lock acquisition: a retried request racing the
    // original cannot book the slot twice.
    pub fn create_idempotent(
        &self,
        salon_id: &str,
        idempotency_key: &str,
        request_hash: &str,
        appointment: Appointment,
    ) -> Result<CreateOutcome, CreateError> {
        let mut inner = self.store.lock();

        if let Some(record) = inner.idempotency.get(idempotency_key) {
            if record.request_hash == request_hash {
                return Ok(CreateOutcome::Replayed(record.response.clone()));
            }
            return Err(CreateError::IdempotencyMismatch);
        }

        let appointments = inner.appointments.entry(salon_id.to_string()).or_default();
        if has_conflict(
            appointments,
            &appointment.staff_id,
            appointment.start_time,
            appointment.end_time,
            None,
        ) {
            return Err(CreateError::SlotConflict);
        }
        appointments.push(appointment.clone());

        let response = serde_json::to_value(&appointment).unwrap_or_default();
        inner.idempotency.insert(
            idempotency_key.to_string(),
            IdempotencyRecord {
                request_hash: request_hash.to_string(),
                response,
            },
        );

        Ok(CreateOutcome::Created(appointment))
    }

    // Partial update; the resulting window is re-checked (excluding the
    // appointment itself) so updates cannot break the no-overlap invariant.
    pub fn update(
        &self,
        salon_id: &str,
        appointment_id: &str,
        update: AppointmentUpdate,
    ) -> Result<Appointment, UpdateError> {
        let mut inner = self.store.lock();
        let appointments = inner
            .appointments
            .get_mut(salon_id)
            .ok_or(UpdateError::NotFound)?;
        let index = appointments
            .iter()
            .position(|a| a.id == appointment_id)
            .ok_or(UpdateError::NotFound)?;

        let mut candidate = appointments[index].clone();
        if let Some(service_id) = update.service_id {
            candidate.service_id = service_id;
        }
        if let Some(staff_id) = update.staff_id {
            candidate.staff_id = staff_id;
        }
        if let Some(customer_id) = update.customer_id {
            candidate.customer_id = customer_id;
        }
        if let Some(start_time) = update.start_time {
            candidate.start_time = start_time;
        }
        if let Some(end_time) = update.end_time {
            candidate.end_time = end_time;
        }
        if let Some(notes) = update.notes {
            candidate.notes = Some(notes);
        }
        if let Some(status) = update.status {
            candidate.status = status;
        }
        candidate.updated_at = Utc::now();

        if candidate.status != AppointmentStatus::Cancelled
            && has_conflict(
                appointments,
                &candidate.staff_id,
                candidate.start_time,
                candidate.end_time,
                Some(appointment_id),
            )
        {
            return Err(UpdateError::SlotConflict);
        }

        appointments[index] = candidate.clone();
        Ok(candidate)
    }

    // Status-only transition. Reviving a cancelled appointment re-checks its
    // window, since the slot may have been rebooked in the meantime.
    pub fn set_status(
        &self,
        salon_id: &str,
        appointment_id: &str,
        status: AppointmentStatus,
    ) -> Result<Appointment, UpdateError> {
        let mut inner = self.store.lock();
        let appointments = inner
            .appointments
            .get_mut(salon_id)
            .ok_or(UpdateError::NotFound)?;
        let index = appointments
            .iter()
            .position(|a| a.id == appointment_id)
            .ok_or(UpdateError::NotFound)?;

        let reviving = appointments[index].status == AppointmentStatus::Cancelled
            && status != AppointmentStatus::Cancelled;
        if reviving {
            let (start_time, end_time, staff_id) = {
                let apt = &appointments[index];
                (apt.start_time, apt.end_time, apt.staff_id.clone())
            };
            if has_conflict(
                appointments,
                &staff_id,
                start_time,
                end_time,
                Some(appointment_id),
            ) {
                return Err(UpdateError::SlotConflict);
            }
        }

        let apt = &mut appointments[index];
        apt.status = status;
        apt.updated_at = Utc::now();
        Ok(apt.clone())
    }

    pub fn delete(&self, salon_id: &str, appointment_id: &str) -> bool {
        let mut inner = self.store.lock();
        let Some(appointments) = inner.appointments.get_mut(salon_id) else {
            return false;
        };
        let before = appointments.len();
        appointments.retain(|a| a.id != appointment_id);
        appointments.len() < before
    }
}
