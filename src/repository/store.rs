// repository/store.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};

use crate::models::appointment::Appointment;
use crate::models::customer::Customer;
use crate::models::salon::Salon;
use crate::models::service::Service;
use crate::models::staff::StaffProfile;
use crate::models::user::StoredUser;

// Stored alongside the client-supplied idempotency key. The hash covers
// endpoint + tenant + body, so a key replayed with a different request is
// detectable.
#[derive(Debug, Clone)]
pub struct IdempotencyRecord {
    pub request_hash: String,
    pub response: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct StoreInner {
    pub salons: HashMap<String, Salon>,
    pub users: HashMap<String, StoredUser>,
    pub staff_profiles: HashMap<String, Vec<StaffProfile>>,
    pub services: HashMap<String, Vec<Service>>,
    pub customers: HashMap<String, Vec<Customer>>,
    pub appointments: HashMap<String, Vec<Appointment>>,
    pub idempotency: HashMap<String, IdempotencyRecord>,
    pub refresh_tokens: HashMap<String, RefreshTokenRecord>,
}

// Every tenant-scoped collection lives behind one mutex so that
// check-then-insert sequences (conflict check, idempotency guard) stay atomic
// under Rocket's multi-threaded executor.
pub struct BookingStore {
    inner: Mutex<StoreInner>,
}

impl BookingStore {
    pub fn new() -> Self {
        BookingStore {
            inner: Mutex::new(StoreInner::default()),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock()
    }

    // Drops every collection. Tests call this between scenarios.
    pub fn reset(&self) {
        *self.inner.lock() = StoreInner::default();
    }
}

impl Default for BookingStore {
    fn default() -> Self {
        Self::new()
    }
}
