// Shared fixture for the integration tests: a single tenant with known ids,
// exercised through Rocket's in-process client.

use std::sync::Arc;

use chrono::Utc;
use rocket::http::{ContentType, Header, Status};
use rocket::local::blocking::Client;
use serde_json::{json, Value};

use crate::models::customer::Customer;
use crate::models::salon::Salon;
use crate::models::service::Service;
use crate::models::staff::{StaffProfile, WorkingHours};
use crate::models::user::{StoredUser, User, UserRole};
use crate::repository::store::BookingStore;
use crate::{build_rocket, AppConfig};

pub const SALON_ID: &str = "salon-1";
pub const SALON_SLUG: &str = "demo-salon";
pub const ADMIN_EMAIL: &str = "admin@demo.local";
pub const ADMIN_PASSWORD: &str = "Password123!";
pub const STAFF_SOPHIE: &str = "staff-1";
pub const STAFF_EMMA: &str = "staff-2";
pub const SVC_HAIRCUT: &str = "svc-haircut"; // 60 minutes, $75.00
pub const SVC_MANICURE: &str = "svc-manicure"; // 45 minutes, $45.00
pub const CUSTOMER_SARAH: &str = "cust-1";

pub struct TestApp {
    pub client: Client,
    pub store: Arc<BookingStore>,
}

fn test_config() -> AppConfig {
    AppConfig {
        port: 0,
        latency_ms: 0,
        jwt_secret: Some("integration-test-secret".to_string()),
        default_tenant: SALON_SLUG.to_string(),
        no_seed: true,
    }
}

fn all_week_hours() -> Vec<WorkingHours> {
    (0..7)
        .map(|day_of_week| WorkingHours {
            day_of_week,
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            breaks: None,
        })
        .collect()
}

fn staff(id: &str, name: &str) -> StaffProfile {
    StaffProfile {
        id: id.to_string(),
        salon_id: SALON_ID.to_string(),
        user_id: None,
        name: name.to_string(),
        bio: None,
        avatar_url: None,
        skills: Some(Vec::new()),
        rating: None,
        working_hours: Some(all_week_hours()),
    }
}

fn service(id: &str, name: &str, duration_minutes: i64, price_cents: i64) -> Service {
    Service {
        id: id.to_string(),
        salon_id: SALON_ID.to_string(),
        name: name.to_string(),
        description: None,
        duration_minutes,
        price_cents,
        currency: Some("USD".to_string()),
        is_active: Some(true),
    }
}

fn fixture(store: &Arc<BookingStore>) {
    let mut inner = store.lock();

    inner.salons.insert(
        SALON_ID.to_string(),
        Salon {
            id: SALON_ID.to_string(),
            slug: SALON_SLUG.to_string(),
            name: "Test Salon".to_string(),
            address: None,
            phone: None,
            email: None,
            timezone: None,
            branding: None,
        },
    );

    inner.users.insert(
        "user-admin".to_string(),
        StoredUser {
            user: User {
                id: "user-admin".to_string(),
                email: ADMIN_EMAIL.to_string(),
                role: UserRole::Admin,
                name: Some("Admin".to_string()),
                avatar_url: None,
                salon_id: SALON_ID.to_string(),
            },
            password: ADMIN_PASSWORD.to_string(),
        },
    );

    inner.staff_profiles.insert(
        SALON_ID.to_string(),
        vec![staff(STAFF_SOPHIE, "Sophie Martinez"), staff(STAFF_EMMA, "Emma Thompson")],
    );

    inner.services.insert(
        SALON_ID.to_string(),
        vec![
            service(SVC_HAIRCUT, "Women's Haircut", 60, 7500),
            service(SVC_MANICURE, "Manicure", 45, 4500),
        ],
    );

    let now = Utc::now();
    inner.customers.insert(
        SALON_ID.to_string(),
        vec![Customer {
            id: CUSTOMER_SARAH.to_string(),
            salon_id: SALON_ID.to_string(),
            name: "Sarah Johnson".to_string(),
            email: Some("sarah.j@example.com".to_string()),
            phone: Some("+1 (555) 234-5678".to_string()),
            notes: None,
            created_at: now,
            updated_at: now,
        }],
    );
}

pub fn test_app() -> TestApp {
    let store = Arc::new(BookingStore::new());
    fixture(&store);
    let client = Client::tracked(build_rocket(test_config(), Arc::clone(&store)))
        .expect("valid rocket instance");
    TestApp { client, store }
}

pub fn bearer(token: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {token}"))
}

pub fn idempotency_key(key: &str) -> Header<'static> {
    Header::new("Idempotency-Key", key.to_string())
}

impl TestApp {
    pub fn login_tokens(&self) -> (String, String) {
        let response = self
            .client
            .post("/auth/login")
            .header(ContentType::JSON)
            .body(json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}).to_string())
            .dispatch();
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().expect("login response body");
        (
            body["accessToken"].as_str().expect("access token").to_string(),
            body["refreshToken"].as_str().expect("refresh token").to_string(),
        )
    }

    pub fn login(&self) -> String {
        self.login_tokens().0
    }

    pub fn appointment_count(&self) -> usize {
        self.store
            .lock()
            .appointments
            .get(SALON_ID)
            .map_or(0, Vec::len)
    }

    // Books via the admin API; panics on anything but 201.
    pub fn book(&self, token: &str, key: &str, staff_id: &str, start: &str, end: &str) -> Value {
        let response = self
            .client
            .post("/admin/appointments")
            .header(ContentType::JSON)
            .header(bearer(token))
            .header(idempotency_key(key))
            .body(
                json!({
                    "serviceId": SVC_HAIRCUT,
                    "staffId": staff_id,
                    "customerId": CUSTOMER_SARAH,
                    "startTime": start,
                    "endTime": end,
                })
                .to_string(),
            )
            .dispatch();
        assert_eq!(response.status(), Status::Created);
        response.into_json().expect("appointment body")
    }
}
