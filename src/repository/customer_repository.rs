// repository/customer_repository.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::models::customer::Customer;
use crate::repository::store::BookingStore;

pub struct CustomerRepository {
    store: Arc<BookingStore>,
}

impl CustomerRepository {
    pub fn new(store: &Arc<BookingStore>) -> Self {
        CustomerRepository {
            store: Arc::clone(store),
        }
    }

    pub fn list(&self, salon_id: &str) -> Vec<Customer> {
        self.store
            .lock()
            .customers
            .get(salon_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn find(&self, salon_id: &str, customer_id: &str) -> Option<Customer> {
        self.store
            .lock()
            .customers
            .get(salon_id)
            .and_then(|customers| customers.iter().find(|c| c.id == customer_id).cloned())
    }

    pub fn insert(&self, customer: Customer) {
        self.store
            .lock()
            .customers
            .entry(customer.salon_id.clone())
            .or_default()
            .push(customer);
    }

    pub fn update(&self, salon_id: &str, updated: Customer) -> Option<Customer> {
        let mut inner = self.store.lock();
        let customers = inner.customers.get_mut(salon_id)?;
        let slot = customers.iter_mut().find(|c| c.id == updated.id)?;
        *slot = updated.clone();
        Some(updated)
    }

    pub fn delete(&self, salon_id: &str, customer_id: &str) -> bool {
        let mut inner = self.store.lock();
        let Some(customers) = inner.customers.get_mut(salon_id) else {
            return false;
        };
        let before = customers.len();
        customers.retain(|c| c.id != customer_id);
        customers.len() < before
    }

    // Public bookings identify returning customers by phone number.
    pub fn find_or_create_by_phone(
        &self,
        salon_id: &str,
        name: &str,
        email: Option<&str>,
        phone: &str,
    ) -> Customer {
        let mut inner = self.store.lock();
        let customers = inner.customers.entry(salon_id.to_string()).or_default();
        if let Some(existing) = customers.iter().find(|c| c.phone.as_deref() == Some(phone)) {
            return existing.clone();
        }

        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            salon_id: salon_id.to_string(),
            name: name.to_string(),
            email: email.map(str::to_string),
            phone: Some(phone.to_string()),
            notes: None,
            created_at: now,
            updated_at: now,
        };
        customers.push(customer.clone());
        customer
    }
}
