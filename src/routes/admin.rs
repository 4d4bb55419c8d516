// routes/admin.rs
//
// Admin surface. Every handler runs behind the AuthUser guard; the tenant is
// always the authenticated user's salon.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rand::Rng;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{delete, get, patch, post, put, FromForm, State};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::appointment::{Appointment, AppointmentSource, AppointmentStatus};
use crate::models::report::{DailyReport, TopServiceMetric};
use crate::models::salon::{Salon, SalonBranding};
use crate::models::service::Service;
use crate::models::staff::{StaffProfile, WorkingHours};
use crate::models::customer::Customer;
use crate::repository::appointment_repository::{
    AppointmentQuery, AppointmentRepository, AppointmentUpdate, CreateError, CreateOutcome,
    UpdateError,
};
use crate::repository::customer_repository::CustomerRepository;
use crate::repository::salon_repository::SalonRepository;
use crate::repository::service_repository::ServiceRepository;
use crate::repository::staff_repository::StaffRepository;
use crate::routes::error::ApiError;
use crate::services::auth_guard::{AuthUser, IdempotencyKey};
use crate::services::idempotency::request_hash;
use crate::services::reports;

// Accepts either a full RFC 3339 timestamp or a bare date.
fn parse_time_param(value: &str, end_of_day: bool) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
        return Ok(if end_of_day {
            start + Duration::days(1)
        } else {
            start
        });
    }
    Err(ApiError::bad_request(
        "INVALID_DATE",
        &format!("Could not parse date '{value}'"),
    ))
}

// ========== Services ==========

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCreateRequest {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i64,
    pub price_cents: i64,
    pub currency: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUpdateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i64>,
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub is_active: Option<bool>,
}

fn validate_service_numbers(duration_minutes: i64, price_cents: i64) -> Result<(), ApiError> {
    let mut details = serde_json::Map::new();
    if duration_minutes <= 0 {
        details.insert(
            "durationMinutes".to_string(),
            "Duration must be positive".into(),
        );
    }
    if price_cents < 0 {
        details.insert("priceCents".to_string(), "Price cannot be negative".into());
    }
    if details.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(details.into()))
    }
}

#[get("/services")]
pub fn list_services(auth: AuthUser, service_repo: &State<ServiceRepository>) -> Json<Vec<Service>> {
    Json(service_repo.list(&auth.user.salon_id))
}

#[post("/services", format = "json", data = "<body>")]
pub fn create_service(
    auth: AuthUser,
    body: Json<ServiceCreateRequest>,
    service_repo: &State<ServiceRepository>,
) -> Result<(Status, Json<Service>), ApiError> {
    let body = body.into_inner();
    validate_service_numbers(body.duration_minutes, body.price_cents)?;

    let service = Service {
        id: Uuid::new_v4().to_string(),
        salon_id: auth.user.salon_id.clone(),
        name: body.name,
        description: body.description,
        duration_minutes: body.duration_minutes,
        price_cents: body.price_cents,
        currency: Some(body.currency.unwrap_or_else(|| "USD".to_string())),
        is_active: Some(true),
    };
    service_repo.insert(service.clone());
    Ok((Status::Created, Json(service)))
}

#[put("/services/<id>", format = "json", data = "<body>")]
pub fn update_service(
    auth: AuthUser,
    id: &str,
    body: Json<ServiceUpdateRequest>,
    service_repo: &State<ServiceRepository>,
) -> Result<Json<Service>, ApiError> {
    let mut service = service_repo
        .find(&auth.user.salon_id, id)
        .ok_or_else(|| ApiError::not_found("SERVICE_NOT_FOUND", "Service not found"))?;

    let body = body.into_inner();
    if let Some(name) = body.name {
        service.name = name;
    }
    if let Some(description) = body.description {
        service.description = Some(description);
    }
    if let Some(duration_minutes) = body.duration_minutes {
        service.duration_minutes = duration_minutes;
    }
    if let Some(price_cents) = body.price_cents {
        service.price_cents = price_cents;
    }
    if let Some(currency) = body.currency {
        service.currency = Some(currency);
    }
    if let Some(is_active) = body.is_active {
        service.is_active = Some(is_active);
    }
    validate_service_numbers(service.duration_minutes, service.price_cents)?;

    service_repo
        .update(&auth.user.salon_id, service)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("SERVICE_NOT_FOUND", "Service not found"))
}

#[delete("/services/<id>")]
pub fn delete_service(
    auth: AuthUser,
    id: &str,
    service_repo: &State<ServiceRepository>,
) -> Result<Status, ApiError> {
    if service_repo.delete(&auth.user.salon_id, id) {
        Ok(Status::NoContent)
    } else {
        Err(ApiError::not_found("SERVICE_NOT_FOUND", "Service not found"))
    }
}

// ========== Staff ==========

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StaffCreateRequest {
    pub name: String,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StaffUpdateRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub rating: Option<f64>,
    pub working_hours: Option<Vec<WorkingHours>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleUpdateRequest {
    pub working_hours: Vec<WorkingHours>,
}

#[get("/staff")]
pub fn list_staff(auth: AuthUser, staff_repo: &State<StaffRepository>) -> Json<Vec<StaffProfile>> {
    Json(staff_repo.list(&auth.user.salon_id))
}

#[post("/staff", format = "json", data = "<body>")]
pub fn create_staff(
    auth: AuthUser,
    body: Json<StaffCreateRequest>,
    staff_repo: &State<StaffRepository>,
) -> (Status, Json<StaffProfile>) {
    let body = body.into_inner();
    let profile = StaffProfile {
        id: Uuid::new_v4().to_string(),
        salon_id: auth.user.salon_id.clone(),
        user_id: None,
        name: body.name,
        bio: body.bio,
        avatar_url: None,
        skills: Some(body.skills.unwrap_or_default()),
        rating: None,
        working_hours: Some(Vec::new()),
    };
    staff_repo.insert(profile.clone());
    (Status::Created, Json(profile))
}

#[put("/staff/<id>", format = "json", data = "<body>")]
pub fn update_staff(
    auth: AuthUser,
    id: &str,
    body: Json<StaffUpdateRequest>,
    staff_repo: &State<StaffRepository>,
) -> Result<Json<StaffProfile>, ApiError> {
    let mut profile = staff_repo
        .find(&auth.user.salon_id, id)
        .ok_or_else(|| ApiError::not_found("STAFF_NOT_FOUND", "Staff not found"))?;

    let body = body.into_inner();
    if let Some(name) = body.name {
        profile.name = name;
    }
    if let Some(bio) = body.bio {
        profile.bio = Some(bio);
    }
    if let Some(skills) = body.skills {
        profile.skills = Some(skills);
    }
    if let Some(rating) = body.rating {
        profile.rating = Some(rating);
    }
    if let Some(working_hours) = body.working_hours {
        profile.working_hours = Some(working_hours);
    }

    staff_repo
        .update(&auth.user.salon_id, profile)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("STAFF_NOT_FOUND", "Staff not found"))
}

#[delete("/staff/<id>")]
pub fn delete_staff(
    auth: AuthUser,
    id: &str,
    staff_repo: &State<StaffRepository>,
) -> Result<Status, ApiError> {
    if staff_repo.delete(&auth.user.salon_id, id) {
        Ok(Status::NoContent)
    } else {
        Err(ApiError::not_found("STAFF_NOT_FOUND", "Staff not found"))
    }
}

#[get("/staff/<id>/schedule")]
pub fn get_staff_schedule(
    auth: AuthUser,
    id: &str,
    staff_repo: &State<StaffRepository>,
) -> Result<Json<Vec<WorkingHours>>, ApiError> {
    let profile = staff_repo
        .find(&auth.user.salon_id, id)
        .ok_or_else(|| ApiError::not_found("STAFF_NOT_FOUND", "Staff not found"))?;
    Ok(Json(profile.working_hours.unwrap_or_default()))
}

#[put("/staff/<id>/schedule", format = "json", data = "<body>")]
pub fn update_staff_schedule(
    auth: AuthUser,
    id: &str,
    body: Json<ScheduleUpdateRequest>,
    staff_repo: &State<StaffRepository>,
) -> Result<Json<StaffProfile>, ApiError> {
    staff_repo
        .set_working_hours(&auth.user.salon_id, id, body.into_inner().working_hours)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("STAFF_NOT_FOUND", "Staff not found"))
}

// ========== Customers ==========

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreateRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[get("/customers")]
pub fn list_customers(
    auth: AuthUser,
    customer_repo: &State<CustomerRepository>,
) -> Json<Vec<Customer>> {
    Json(customer_repo.list(&auth.user.salon_id))
}

#[get("/customers/<id>")]
pub fn get_customer(
    auth: AuthUser,
    id: &str,
    customer_repo: &State<CustomerRepository>,
) -> Result<Json<Customer>, ApiError> {
    customer_repo
        .find(&auth.user.salon_id, id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("CUSTOMER_NOT_FOUND", "Customer not found"))
}

#[post("/customers", format = "json", data = "<body>")]
pub fn create_customer(
    auth: AuthUser,
    body: Json<CustomerCreateRequest>,
    customer_repo: &State<CustomerRepository>,
) -> (Status, Json<Customer>) {
    let body = body.into_inner();
    let now = Utc::now();
    let customer = Customer {
        id: Uuid::new_v4().to_string(),
        salon_id: auth.user.salon_id.clone(),
        name: body.name,
        email: body.email,
        phone: body.phone,
        notes: body.notes,
        created_at: now,
        updated_at: now,
    };
    customer_repo.insert(customer.clone());
    (Status::Created, Json(customer))
}

#[put("/customers/<id>", format = "json", data = "<body>")]
pub fn update_customer(
    auth: AuthUser,
    id: &str,
    body: Json<CustomerUpdateRequest>,
    customer_repo: &State<CustomerRepository>,
) -> Result<Json<Customer>, ApiError> {
    let mut customer = customer_repo
        .find(&auth.user.salon_id, id)
        .ok_or_else(|| ApiError::not_found("CUSTOMER_NOT_FOUND", "Customer not found"))?;

    let body = body.into_inner();
    if let Some(name) = body.name {
        customer.name = name;
    }
    if let Some(email) = body.email {
        customer.email = Some(email);
    }
    if let Some(phone) = body.phone {
        customer.phone = Some(phone);
    }
    if let Some(notes) = body.notes {
        customer.notes = Some(notes);
    }
    customer.updated_at = Utc::now();

    customer_repo
        .update(&auth.user.salon_id, customer)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("CUSTOMER_NOT_FOUND", "Customer not found"))
}

#[delete("/customers/<id>")]
pub fn delete_customer(
    auth: AuthUser,
    id: &str,
    customer_repo: &State<CustomerRepository>,
) -> Result<Status, ApiError> {
    if customer_repo.delete(&auth.user.salon_id, id) {
        Ok(Status::NoContent)
    } else {
        Err(ApiError::not_found("CUSTOMER_NOT_FOUND", "Customer not found"))
    }
}

// ========== Appointments ==========

#[derive(FromForm, Debug, Default)]
pub struct AppointmentListQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    #[field(name = "staffId")]
    pub staff_id: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub upcoming: Option<bool>,
    pub limit: Option<usize>,
    pub q: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentCreateRequest {
    pub service_id: String,
    pub staff_id: String,
    pub customer_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentUpdateRequest {
    pub service_id: Option<String>,
    pub staff_id: Option<String>,
    pub customer_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub status: Option<AppointmentStatus>,
}

#[derive(Deserialize, Debug)]
pub struct AppointmentStatusUpdateRequest {
    pub status: AppointmentStatus,
}

#[get("/appointments?<query..>")]
pub fn list_appointments(
    auth: AuthUser,
    query: AppointmentListQuery,
    appointment_repo: &State<AppointmentRepository>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let repo_query = AppointmentQuery {
        from: query
            .from
            .as_deref()
            .map(|v| parse_time_param(v, false))
            .transpose()?,
        to: query
            .to
            .as_deref()
            .map(|v| parse_time_param(v, true))
            .transpose()?,
        staff_id: query.staff_id,
        status: query.status,
        upcoming: query.upcoming.unwrap_or(false),
        limit: query.limit,
        q: query.q,
    };
    Ok(Json(
        appointment_repo.list_filtered(&auth.user.salon_id, &repo_query),
    ))
}

#[post("/appointments", format = "json", data = "<body>")]
pub fn create_appointment(
    auth: AuthUser,
    idempotency_key: IdempotencyKey,
    body: Json<AppointmentCreateRequest>,
    appointment_repo: &State<AppointmentRepository>,
    service_repo: &State<ServiceRepository>,
    staff_repo: &State<StaffRepository>,
    customer_repo: &State<CustomerRepository>,
) -> Result<(Status, Json<serde_json::Value>), ApiError> {
    let salon_id = auth.user.salon_id.clone();
    let key = idempotency_key.0.ok_or_else(|| {
        ApiError::bad_request("MISSING_IDEMPOTENCY_KEY", "Idempotency-Key header is required")
    })?;

    let body = body.into_inner();
    let hash = request_hash("/admin/appointments", &salon_id, &body);

    // Replay before touching anything else, so a retried request succeeds
    // even if referenced entities changed since the original call.
    if let Some(record) = appointment_repo.lookup_idempotency(&key) {
        if record.request_hash == hash {
            return Ok((Status::Created, Json(record.response)));
        }
        return Err(ApiError::conflict(
            "IDEMPOTENCY_MISMATCH",
            "Idempotency key reused with different request",
        ));
    }

    if service_repo.find(&salon_id, &body.service_id).is_none() {
        return Err(ApiError::not_found("SERVICE_NOT_FOUND", "Service not found"));
    }
    if staff_repo.find(&salon_id, &body.staff_id).is_none() {
        return Err(ApiError::not_found("STAFF_NOT_FOUND", "Staff not found"));
    }
    if customer_repo.find(&salon_id, &body.customer_id).is_none() {
        return Err(ApiError::not_found("CUSTOMER_NOT_FOUND", "Customer not found"));
    }

    let now = Utc::now();
    let appointment = Appointment {
        id: Uuid::new_v4().to_string(),
        salon_id: salon_id.clone(),
        service_id: body.service_id.clone(),
        staff_id: body.staff_id.clone(),
        customer_id: body.customer_id.clone(),
        start_time: body.start_time,
        end_time: body.end_time,
        status: AppointmentStatus::Confirmed,
        notes: body.notes.clone(),
        source: Some(AppointmentSource::Admin),
        created_at: now,
        updated_at: now,
    };

    match appointment_repo.create_idempotent(&salon_id, &key, &hash, appointment) {
        Ok(CreateOutcome::Created(created)) => {
            info!(appointment = %created.id, staff = %created.staff_id, "appointment booked");
            let value = serde_json::to_value(&created)
                .map_err(|_| ApiError::internal("Failed to encode appointment"))?;
            Ok((Status::Created, Json(value)))
        }
        Ok(CreateOutcome::Replayed(value)) => Ok((Status::Created, Json(value))),
        Err(CreateError::SlotConflict) => {
            warn!(staff = %body.staff_id, "booking conflict");
            Err(ApiError::conflict(
                "APPOINTMENT_CONFLICT",
                "Conflicting appointment exists",
            ))
        }
        Err(CreateError::IdempotencyMismatch) => Err(ApiError::conflict(
            "IDEMPOTENCY_MISMATCH",
            "Idempotency key reused with different request",
        )),
    }
}

fn map_update_error(error: UpdateError) -> ApiError {
    match error {
        UpdateError::NotFound => ApiError::not_found("APPOINTMENT_NOT_FOUND", "Appointment not found"),
        UpdateError::SlotConflict => {
            ApiError::conflict("APPOINTMENT_CONFLICT", "Conflicting appointment exists")
        }
    }
}

#[put("/appointments/<id>", format = "json", data = "<body>")]
pub fn update_appointment(
    auth: AuthUser,
    id: &str,
    body: Json<AppointmentUpdateRequest>,
    appointment_repo: &State<AppointmentRepository>,
) -> Result<Json<Appointment>, ApiError> {
    let body = body.into_inner();
    let update = AppointmentUpdate {
        service_id: body.service_id,
        staff_id: body.staff_id,
        customer_id: body.customer_id,
        start_time: body.start_time,
        end_time: body.end_time,
        notes: body.notes,
        status: body.status,
    };
    appointment_repo
        .update(&auth.user.salon_id, id, update)
        .map(Json)
        .map_err(map_update_error)
}

#[patch("/appointments/<id>", format = "json", data = "<body>")]
pub fn update_appointment_status(
    auth: AuthUser,
    id: &str,
    body: Json<AppointmentStatusUpdateRequest>,
    appointment_repo: &State<AppointmentRepository>,
) -> Result<Json<Appointment>, ApiError> {
    appointment_repo
        .set_status(&auth.user.salon_id, id, body.status)
        .map(Json)
        .map_err(map_update_error)
}

#[delete("/appointments/<id>")]
pub fn delete_appointment(
    auth: AuthUser,
    id: &str,
    appointment_repo: &State<AppointmentRepository>,
) -> Result<Status, ApiError> {
    if appointment_repo.delete(&auth.user.salon_id, id) {
        Ok(Status::NoContent)
    } else {
        Err(ApiError::not_found(
            "APPOINTMENT_NOT_FOUND",
            "Appointment not found",
        ))
    }
}

// ========== Reports ==========

#[get("/reports/daily?<date>")]
pub fn daily_report(
    auth: AuthUser,
    date: Option<String>,
    appointment_repo: &State<AppointmentRepository>,
    service_repo: &State<ServiceRepository>,
) -> Result<Json<DailyReport>, ApiError> {
    let target = match date.as_deref() {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
            ApiError::bad_request("INVALID_DATE", &format!("Could not parse date '{value}'"))
        })?,
        None => Utc::now().date_naive(),
    };

    let appointments = appointment_repo.list(&auth.user.salon_id);
    let services = service_repo.list(&auth.user.salon_id);
    Ok(Json(reports::daily_report(&appointments, &services, target)))
}

#[get("/reports/top-services?<from>&<to>&<limit>")]
pub fn top_services(
    auth: AuthUser,
    from: Option<String>,
    to: Option<String>,
    limit: Option<usize>,
    appointment_repo: &State<AppointmentRepository>,
    service_repo: &State<ServiceRepository>,
) -> Result<Json<Vec<TopServiceMetric>>, ApiError> {
    let from = from
        .as_deref()
        .map(|v| parse_time_param(v, false))
        .transpose()?;
    let to = to
        .as_deref()
        .map(|v| parse_time_param(v, true))
        .transpose()?;

    let appointments = appointment_repo.list(&auth.user.salon_id);
    let services = service_repo.list(&auth.user.salon_id);
    Ok(Json(reports::top_services(
        &appointments,
        &services,
        from,
        to,
        limit.unwrap_or(10),
    )))
}

// ========== Salon settings ==========

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SalonUpdateRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub branding: Option<SalonBranding>,
}

#[get("/salon")]
pub fn get_salon(auth: AuthUser, salon_repo: &State<SalonRepository>) -> Result<Json<Salon>, ApiError> {
    salon_repo
        .find_by_id(&auth.user.salon_id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("SALON_NOT_FOUND", "Salon not found"))
}

#[put("/salon", format = "json", data = "<body>")]
pub fn update_salon(
    auth: AuthUser,
    body: Json<SalonUpdateRequest>,
    salon_repo: &State<SalonRepository>,
) -> Result<Json<Salon>, ApiError> {
    let mut salon = salon_repo
        .find_by_id(&auth.user.salon_id)
        .ok_or_else(|| ApiError::not_found("SALON_NOT_FOUND", "Salon not found"))?;

    let body = body.into_inner();
    if let Some(name) = body.name {
        salon.name = name;
    }
    if let Some(address) = body.address {
        salon.address = Some(address);
    }
    if let Some(phone) = body.phone {
        salon.phone = Some(phone);
    }
    if let Some(email) = body.email {
        salon.email = Some(email);
    }
    if let Some(branding) = body.branding {
        salon.branding = Some(branding);
    }

    salon_repo
        .update(salon)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("SALON_NOT_FOUND", "Salon not found"))
}

// ========== Webhook test ==========

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WebhookTestRequest {
    pub webhook_url: String,
}

#[derive(Serialize, Debug)]
pub struct WebhookTestResponse {
    pub success: bool,
    pub message: String,
}

// No outbound request is made; the endpoint simulates a ping with an ~80%
// success rate so the settings UI has something to exercise.
#[post("/webhook/test", format = "json", data = "<body>")]
pub fn test_webhook(auth: AuthUser, body: Json<WebhookTestRequest>) -> Json<WebhookTestResponse> {
    let success = rand::thread_rng().gen_bool(0.8);
    info!(salon = %auth.user.salon_id, url = %body.webhook_url, success, "webhook test");
    Json(WebhookTestResponse {
        success,
        message: if success {
            "Webhook received test event successfully".to_string()
        } else {
            "Webhook did not respond or returned an error".to_string()
        },
    })
}
