// repository/salon_repository.rs

use std::sync::Arc;

use crate::models::salon::Salon;
use crate::repository::store::BookingStore;

pub struct SalonRepository {
    store: Arc<BookingStore>,
}

impl SalonRepository {
    pub fn new(store: &Arc<BookingStore>) -> Self {
        SalonRepository {
            store: Arc::clone(store),
        }
    }

    pub fn find_by_id(&self, salon_id: &str) -> Option<Salon> {
        self.store.lock().salons.get(salon_id).cloned()
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<Salon> {
        self.store
            .lock()
            .salons
            .values()
            .find(|salon| salon.slug == slug)
            .cloned()
    }

    pub fn update(&self, salon: Salon) -> Option<Salon> {
        let mut inner = self.store.lock();
        if !inner.salons.contains_key(&salon.id) {
            return None;
        }
        inner.salons.insert(salon.id.clone(), salon.clone());
        Some(salon)
    }
}
