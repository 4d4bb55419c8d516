// repository/staff_repository.rs

use std::sync::Arc;

use crate::models::staff::{StaffProfile, WorkingHours};
use crate::repository::store::BookingStore;

pub struct StaffRepository {
    store: Arc<BookingStore>,
}

impl StaffRepository {
    pub fn new(store: &Arc<BookingStore>) -> Self {
        StaffRepository {
            store: Arc::clone(store),
        }
    }

    pub fn list(&self, salon_id: &str) -> Vec<StaffProfile> {
        self.store
            .lock()
            .staff_profiles
            .get(salon_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn find(&self, salon_id: &str, staff_id: &str) -> Option<StaffProfile> {
        self.store
            .lock()
            .staff_profiles
            .get(salon_id)
            .and_then(|staff| staff.iter().find(|s| s.id == staff_id).cloned())
    }

    pub fn insert(&self, profile: StaffProfile) {
        self.store
            .lock()
            .staff_profiles
            .entry(profile.salon_id.clone())
            .or_default()
            .push(profile);
    }

    pub fn update(&self, salon_id: &str, updated: StaffProfile) -> Option<StaffProfile> {
        let mut inner = self.store.lock();
        let staff = inner.staff_profiles.get_mut(salon_id)?;
        let slot = staff.iter_mut().find(|s| s.id == updated.id)?;
        *slot = updated.clone();
        Some(updated)
    }

    pub fn delete(&self, salon_id: &str, staff_id: &str) -> bool {
        let mut inner = self.store.lock();
        let Some(staff) = inner.staff_profiles.get_mut(salon_id) else {
            return false;
        };
        let before = staff.len();
        staff.retain(|s| s.id != staff_id);
        staff.len() < before
    }

    pub fn set_working_hours(
        &self,
        salon_id: &str,
        staff_id: &str,
        working_hours: Vec<WorkingHours>,
    ) -> Option<StaffProfile> {
        let mut inner = self.store.lock();
        let staff = inner.staff_profiles.get_mut(salon_id)?;
        let slot = staff.iter_mut().find(|s| s.id == staff_id)?;
        slot.working_hours = Some(working_hours);
        Some(slot.clone())
    }
}
