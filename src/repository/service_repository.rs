// repository/service_repository.rs

use std::sync::Arc;

use crate::models::service::Service;
use crate::repository::store::BookingStore;

pub struct ServiceRepository {
    store: Arc<BookingStore>,
}

impl ServiceRepository {
    pub fn new(store: &Arc<BookingStore>) -> Self {
        ServiceRepository {
            store: Arc::clone(store),
        }
    }

    pub fn list(&self, salon_id: &str) -> Vec<Service> {
        self.store
            .lock()
            .services
            .get(salon_id)
            .cloned()
            .unwrap_or_default()
    }

    // Public listings only expose services that are still active.
    pub fn list_bookable(&self, salon_id: &str) -> Vec<Service> {
        self.list(salon_id)
            .into_iter()
            .filter(Service::is_bookable)
            .collect()
    }

    pub fn find(&self, salon_id: &str, service_id: &str) -> Option<Service> {
        self.store
            .lock()
            .services
            .get(salon_id)
            .and_then(|services| services.iter().find(|s| s.id == service_id).cloned())
    }

    pub fn insert(&self, service: Service) {
        self.store
            .lock()
            .services
            .entry(service.salon_id.clone())
            .or_default()
            .push(service);
    }

    pub fn update(&self, salon_id: &str, updated: Service) -> Option<Service> {
        let mut inner = self.store.lock();
        let services = inner.services.get_mut(salon_id)?;
        let slot = services.iter_mut().find(|s| s.id == updated.id)?;
        *slot = updated.clone();
        Some(updated)
    }

    pub fn delete(&self, salon_id: &str, service_id: &str) -> bool {
        let mut inner = self.store.lock();
        let Some(services) = inner.services.get_mut(salon_id) else {
            return false;
        };
        let before = services.len();
        services.retain(|s| s.id != service_id);
        services.len() < before
    }
}
