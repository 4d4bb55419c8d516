#[macro_use]
extern crate rocket;

mod jwt;
mod models;
mod repository;
mod routes;
mod seed;
mod services;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use clap::Parser;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::serde::json::Json;
use rocket::{Build, Data, Request, Response, Rocket};
use tracing_subscriber::EnvFilter;

use crate::jwt::jwt_helper::AuthKeys;
use crate::repository::appointment_repository::AppointmentRepository;
use crate::repository::customer_repository::CustomerRepository;
use crate::repository::salon_repository::SalonRepository;
use crate::repository::service_repository::ServiceRepository;
use crate::repository::staff_repository::StaffRepository;
use crate::repository::store::BookingStore;
use crate::repository::user_repository::UserRepository;
use crate::routes::error::ErrorBody;
use crate::services::auth_guard::AuthFailure;

#[derive(Parser, Debug, Clone)]
#[command(name = "salon-backend", about = "Multi-tenant salon booking API")]
pub struct AppConfig {
    #[arg(long, env = "SALON_PORT", default_value_t = 8000)]
    pub port: u16,

    // Artificial delay applied before each request is processed.
    #[arg(long, env = "SALON_LATENCY_MS", default_value_t = 0)]
    pub latency_ms: u64,

    // Falls back to a random per-process secret when unset.
    #[arg(long, env = "SALON_JWT_SECRET")]
    pub jwt_secret: Option<String>,

    #[arg(long, env = "SALON_DEFAULT_TENANT", default_value = "demo-salon")]
    pub default_tenant: String,

    #[arg(long, default_value_t = false)]
    pub no_seed: bool,
}

// CORS fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PUT, PATCH, DELETE, OPTIONS",
        ));
        response.set_header(Header::new(
            "Access-Control-Allow-Headers",
            "Content-Type, Authorization, X-Tenant-ID, Idempotency-Key",
        ));
    }
}

// Simulated network latency; injected before processing and does not change
// request ordering.
pub struct SimulatedLatency(pub u64);

#[rocket::async_trait]
impl Fairing for SimulatedLatency {
    fn info(&self) -> Info {
        Info {
            name: "Simulated request latency",
            kind: Kind::Request,
        }
    }

    async fn on_request(&self, _request: &mut Request<'_>, _data: &mut Data<'_>) {
        if self.0 > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.0)).await;
        }
    }
}

// CORS preflight route
#[options("/<_..>")]
fn all_options() -> rocket::http::Status {
    rocket::http::Status::Ok
}

#[catch(400)]
fn bad_request(_req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody {
        message: "Bad request".to_string(),
        code: "BAD_REQUEST".to_string(),
        details: None,
    })
}

// Auth guard failures stash their code in the request-local cache.
#[catch(401)]
fn unauthorized(req: &Request) -> Json<ErrorBody> {
    let failure = req.local_cache::<AuthFailure, _>(AuthFailure::default);
    let (code, message) = failure.0.unwrap_or(("UNAUTHORIZED", "Unauthorized"));
    Json(ErrorBody {
        message: message.to_string(),
        code: code.to_string(),
        details: None,
    })
}

#[catch(404)]
fn not_found(req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody {
        message: format!("'{}' route not found", req.uri()),
        code: "NOT_FOUND".to_string(),
        details: None,
    })
}

#[catch(422)]
fn unprocessable(_req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody {
        message: "Request body failed validation".to_string(),
        code: "VALIDATION_ERROR".to_string(),
        details: None,
    })
}

#[catch(500)]
fn internal_error(_req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody {
        message: "Internal server error".to_string(),
        code: "INTERNAL_ERROR".to_string(),
        details: None,
    })
}

pub fn build_rocket(config: AppConfig, store: Arc<BookingStore>) -> Rocket<Build> {
    let secret = config.jwt_secret.clone().unwrap_or_else(|| {
        let bytes: [u8; 32] = rand::random();
        hex::encode(bytes)
    });
    let keys = AuthKeys::new(secret.as_bytes());

    let figment = rocket::Config::figment().merge(("port", config.port));
    let latency_ms = config.latency_ms;

    rocket::custom(figment)
        .manage(config)
        .manage(keys)
        .manage(SalonRepository::new(&store))
        .manage(UserRepository::new(&store))
        .manage(StaffRepository::new(&store))
        .manage(ServiceRepository::new(&store))
        .manage(CustomerRepository::new(&store))
        .manage(AppointmentRepository::new(&store))
        .attach(Cors)
        .attach(SimulatedLatency(latency_ms))
        .mount("/", routes![all_options])
        .mount(
            "/auth",
            routes![routes::auth::login, routes::auth::refresh, routes::auth::logout],
        )
        .mount(
            "/admin",
            routes![
                routes::admin::list_services,
                routes::admin::create_service,
                routes::admin::update_service,
                routes::admin::delete_service,
                routes::admin::list_staff,
                routes::admin::create_staff,
                routes::admin::update_staff,
                routes::admin::delete_staff,
                routes::admin::get_staff_schedule,
                routes::admin::update_staff_schedule,
                routes::admin::list_customers,
                routes::admin::get_customer,
                routes::admin::create_customer,
                routes::admin::update_customer,
                routes::admin::delete_customer,
                routes::admin::list_appointments,
                routes::admin::create_appointment,
                routes::admin::update_appointment,
                routes::admin::update_appointment_status,
                routes::admin::delete_appointment,
                routes::admin::daily_report,
                routes::admin::top_services,
                routes::admin::get_salon,
                routes::admin::update_salon,
                routes::admin::test_webhook,
            ],
        )
        .mount(
            "/public",
            routes![
                routes::public::get_salon,
                routes::public::get_salon_services,
                routes::public::get_salon_staff,
                routes::public::list_services,
                routes::public::list_staff,
                routes::public::availability,
                routes::public::create_appointment,
            ],
        )
        .register(
            "/",
            catchers![bad_request, unauthorized, not_found, unprocessable, internal_error],
        )
}

#[launch]
fn rocket() -> _ {
    let config = AppConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let store = Arc::new(BookingStore::new());
    if !config.no_seed {
        seed::seed_demo_data(&store);
    }

    build_rocket(config, store)
}
