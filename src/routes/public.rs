// routes/public.rs
//
// Public booking funnel. Slug-prefixed routes name their tenant directly;
// the rest go through the tenant resolver.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rocket::http::{Header, Status};
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::{get, post, FromForm, Request, State};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::appointment::{Appointment, AppointmentSource, AppointmentStatus};
use crate::models::availability::{AvailabilitySlot, PublicStaffWithAvailability};
use crate::models::salon::Salon;
use crate::models::service::Service;
use crate::models::staff::StaffProfile;
use crate::repository::appointment_repository::{
    AppointmentRepository, CreateError, CreateOutcome,
};
use crate::repository::customer_repository::CustomerRepository;
use crate::repository::salon_repository::SalonRepository;
use crate::repository::service_repository::ServiceRepository;
use crate::repository::staff_repository::StaffRepository;
use crate::routes::error::ApiError;
use crate::services::auth_guard::IdempotencyKey;
use crate::services::availability::{slots_for_date, slots_for_week};
use crate::services::idempotency::request_hash;
use crate::services::tenant_resolver::Tenant;

fn salon_by_slug(salon_repo: &SalonRepository, slug: &str) -> Result<Salon, ApiError> {
    salon_repo
        .find_by_slug(slug)
        .ok_or_else(|| ApiError::not_found("SALON_NOT_FOUND", "Salon not found"))
}

#[get("/salons/<slug>")]
pub fn get_salon(slug: &str, salon_repo: &State<SalonRepository>) -> Result<Json<Salon>, ApiError> {
    salon_by_slug(salon_repo, slug).map(Json)
}

#[get("/salons/<slug>/services")]
pub fn get_salon_services(
    slug: &str,
    salon_repo: &State<SalonRepository>,
    service_repo: &State<ServiceRepository>,
) -> Result<Json<Vec<Service>>, ApiError> {
    let salon = salon_by_slug(salon_repo, slug)?;
    Ok(Json(service_repo.list_bookable(&salon.id)))
}

#[get("/salons/<slug>/staff")]
pub fn get_salon_staff(
    slug: &str,
    salon_repo: &State<SalonRepository>,
    staff_repo: &State<StaffRepository>,
) -> Result<Json<Vec<StaffProfile>>, ApiError> {
    let salon = salon_by_slug(salon_repo, slug)?;
    Ok(Json(staff_repo.list(&salon.id)))
}

#[get("/services")]
pub fn list_services(
    tenant: Tenant,
    salon_repo: &State<SalonRepository>,
    service_repo: &State<ServiceRepository>,
) -> Result<Json<Vec<Service>>, ApiError> {
    let salon = salon_by_slug(salon_repo, &tenant.0)?;
    Ok(Json(service_repo.list_bookable(&salon.id)))
}

// The funnel passes ?serviceId= here; staff are not filtered by service, so
// the parameter is accepted and ignored.
#[get("/staff")]
pub fn list_staff(
    tenant: Tenant,
    salon_repo: &State<SalonRepository>,
    staff_repo: &State<StaffRepository>,
    appointment_repo: &State<AppointmentRepository>,
) -> Result<Json<Vec<PublicStaffWithAvailability>>, ApiError> {
    let salon = salon_by_slug(salon_repo, &tenant.0)?;
    let appointments = appointment_repo.list(&salon.id);
    let now = Utc::now();
    let today = now.date_naive();

    let staff = staff_repo
        .list(&salon.id)
        .into_iter()
        .map(|profile| {
            let availability = slots_for_week(&profile, &appointments, today, now);
            PublicStaffWithAvailability {
                staff: profile,
                availability,
            }
        })
        .collect();

    Ok(Json(staff))
}

#[derive(FromForm, Debug, Default)]
pub struct AvailabilityQuery {
    #[field(name = "staffId")]
    pub staff_id: Option<String>,
    pub date: Option<String>,
}

#[get("/availability?<query..>")]
pub fn availability(
    tenant: Tenant,
    query: AvailabilityQuery,
    salon_repo: &State<SalonRepository>,
    staff_repo: &State<StaffRepository>,
    appointment_repo: &State<AppointmentRepository>,
) -> Result<Json<Vec<AvailabilitySlot>>, ApiError> {
    let salon = salon_by_slug(salon_repo, &tenant.0)?;

    let staff_id = query
        .staff_id
        .ok_or_else(|| ApiError::bad_request("MISSING_STAFF_ID", "staffId is required"))?;
    let staff = staff_repo
        .find(&salon.id, &staff_id)
        .ok_or_else(|| ApiError::not_found("STAFF_NOT_FOUND", "Staff not found"))?;

    let now = Utc::now();
    let date = match query.date.as_deref() {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
            ApiError::bad_request("INVALID_DATE", &format!("Could not parse date '{value}'"))
        })?,
        None => now.date_naive(),
    };

    let appointments = appointment_repo.list(&salon.id);
    Ok(Json(slots_for_date(&staff, &appointments, date, now)))
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PublicCustomerDetails {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PublicAppointmentCreateRequest {
    pub service_id: String,
    pub staff_id: String,
    pub start_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub customer: PublicCustomerDetails,
}

// Field rules from the booking form: short names and phone numbers are the
// common garbage inputs.
fn validate_booking(body: &PublicAppointmentCreateRequest) -> Result<(), ApiError> {
    let mut details = serde_json::Map::new();
    if body.customer.name.trim().len() < 2 {
        details.insert(
            "name".to_string(),
            "Name must be at least 2 characters".into(),
        );
    }
    if body.customer.phone.trim().len() < 10 {
        details.insert(
            "phone".to_string(),
            "Please enter a valid phone number".into(),
        );
    }
    if let Some(email) = &body.customer.email {
        if !email.is_empty() && !email.contains('@') {
            details.insert("email".to_string(), "Invalid email address".into());
        }
    }
    if details.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(details.into()))
    }
}

// 201 response carrying the Idempotent-Replay marker the booking funnel uses
// to distinguish a fresh booking from a replayed retry.
pub struct BookingCreated {
    value: serde_json::Value,
    replayed: bool,
}

impl<'r> Responder<'r, 'static> for BookingCreated {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let mut response = Json(self.value).respond_to(request)?;
        response.set_status(Status::Created);
        response.set_header(Header::new(
            "Idempotent-Replay",
            if self.replayed { "true" } else { "false" },
        ));
        Ok(response)
    }
}

#[post("/appointments", format = "json", data = "<body>")]
pub fn create_appointment(
    tenant: Tenant,
    idempotency_key: IdempotencyKey,
    body: Json<PublicAppointmentCreateRequest>,
    salon_repo: &State<SalonRepository>,
    service_repo: &State<ServiceRepository>,
    staff_repo: &State<StaffRepository>,
    customer_repo: &State<CustomerRepository>,
    appointment_repo: &State<AppointmentRepository>,
) -> Result<BookingCreated, ApiError> {
    let salon = salon_by_slug(salon_repo, &tenant.0)?;
    let key = idempotency_key.0.ok_or_else(|| {
        ApiError::bad_request("MISSING_IDEMPOTENCY_KEY", "Idempotency-Key header is required")
    })?;

    let body = body.into_inner();
    let hash = request_hash("/public/appointments", &tenant.0, &body);

    // Replay first: a retried booking must succeed verbatim even if the
    // salon's catalogue changed in between.
    if let Some(record) = appointment_repo.lookup_idempotency(&key) {
        if record.request_hash == hash {
            return Ok(BookingCreated {
                value: record.response,
                replayed: true,
            });
        }
        return Err(ApiError::conflict(
            "IDEMPOTENCY_MISMATCH",
            "Idempotency key reused with different request",
        ));
    }

    validate_booking(&body)?;

    let service = service_repo
        .find(&salon.id, &body.service_id)
        .ok_or_else(|| ApiError::not_found("SERVICE_NOT_FOUND", "Service not found"))?;
    if staff_repo.find(&salon.id, &body.staff_id).is_none() {
        return Err(ApiError::not_found("STAFF_NOT_FOUND", "Staff not found"));
    }

    let customer = customer_repo.find_or_create_by_phone(
        &salon.id,
        body.customer.name.trim(),
        body.customer.email.as_deref().filter(|e| !e.is_empty()),
        body.customer.phone.trim(),
    );

    // The service duration is authoritative for the appointment window.
    let end_time = body.start_time + Duration::minutes(service.duration_minutes);
    let now = Utc::now();
    let appointment = Appointment {
        id: Uuid::new_v4().to_string(),
        salon_id: salon.id.clone(),
        service_id: body.service_id.clone(),
        staff_id: body.staff_id.clone(),
        customer_id: customer.id,
        start_time: body.start_time,
        end_time,
        status: AppointmentStatus::Confirmed,
        notes: body.notes.clone(),
        source: Some(AppointmentSource::Public),
        created_at: now,
        updated_at: now,
    };

    match appointment_repo.create_idempotent(&salon.id, &key, &hash, appointment) {
        Ok(CreateOutcome::Created(created)) => {
            info!(appointment = %created.id, salon = %salon.slug, "public booking");
            let value = serde_json::to_value(&created)
                .map_err(|_| ApiError::internal("Failed to encode appointment"))?;
            Ok(BookingCreated {
                value,
                replayed: false,
            })
        }
        Ok(CreateOutcome::Replayed(value)) => Ok(BookingCreated {
            value,
            replayed: true,
        }),
        Err(CreateError::SlotConflict) => {
            warn!(staff = %body.staff_id, salon = %salon.slug, "slot conflict");
            Err(ApiError::conflict(
                "SLOT_CONFLICT",
                "Selected time is no longer available",
            ))
        }
        Err(CreateError::IdempotencyMismatch) => Err(ApiError::conflict(
            "IDEMPOTENCY_MISMATCH",
            "Idempotency key reused with different request",
        )),
    }
}
