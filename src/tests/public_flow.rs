use rocket::http::{ContentType, Header, Status};
use serde_json::{json, Value};

use super::support::{idempotency_key, test_app, SALON_ID, SALON_SLUG, STAFF_SOPHIE, SVC_HAIRCUT};

fn tenant_header() -> Header<'static> {
    Header::new("X-Tenant-ID", SALON_SLUG)
}

fn booking_body(start: &str, phone: &str) -> String {
    json!({
        "serviceId": SVC_HAIRCUT,
        "staffId": STAFF_SOPHIE,
        "startTime": start,
        "customer": {
            "name": "Walk In",
            "email": "walkin@example.com",
            "phone": phone,
        },
    })
    .to_string()
}

#[test]
fn salon_is_looked_up_by_slug() {
    let app = test_app();

    let response = app.client.get(format!("/public/salons/{SALON_SLUG}")).dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["slug"], SALON_SLUG);

    let missing = app.client.get("/public/salons/no-such-salon").dispatch();
    assert_eq!(missing.status(), Status::NotFound);
    let body: Value = missing.into_json().unwrap();
    assert_eq!(body["code"], "SALON_NOT_FOUND");
}

#[test]
fn public_services_hide_inactive_entries() {
    let app = test_app();
    {
        let mut inner = app.store.lock();
        let services = inner.services.get_mut(SALON_ID).unwrap();
        services[1].is_active = Some(false);
    }

    let response = app
        .client
        .get("/public/services")
        .header(tenant_header())
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().unwrap();
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Women's Haircut"]);
}

#[test]
fn tenant_resolves_from_query_param_too() {
    let app = test_app();

    let response = app
        .client
        .get(format!("/public/services?tenant={SALON_SLUG}"))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    let unknown = app
        .client
        .get("/public/services")
        .header(Header::new("X-Tenant-ID", "ghost-salon"))
        .dispatch();
    assert_eq!(unknown.status(), Status::NotFound);
}

#[test]
fn availability_requires_staff_id() {
    let app = test_app();
    let response = app
        .client
        .get("/public/availability?date=2099-01-05")
        .header(tenant_header())
        .dispatch();
    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["code"], "MISSING_STAFF_ID");
}

#[test]
fn availability_lists_slots_and_marks_reservations() {
    let app = test_app();

    let uri = format!("/public/availability?staffId={STAFF_SOPHIE}&date=2099-01-05");
    let response = app.client.get(uri.as_str()).header(tenant_header()).dispatch();
    assert_eq!(response.status(), Status::Ok);
    let slots: Value = response.into_json().unwrap();
    // 09:00-17:00 in half-hour steps.
    assert_eq!(slots.as_array().unwrap().len(), 16);
    assert!(slots.as_array().unwrap().iter().all(|s| s["isReserved"] == false));

    // Book 10:00-11:00 and the two slots underneath it flip to reserved.
    let booking = app
        .client
        .post("/public/appointments")
        .header(ContentType::JSON)
        .header(tenant_header())
        .header(idempotency_key("pub-key-1"))
        .body(booking_body("2099-01-05T10:00:00Z", "+1 (555) 999-0001"))
        .dispatch();
    assert_eq!(booking.status(), Status::Created);

    let response = app.client.get(uri.as_str()).header(tenant_header()).dispatch();
    let slots: Value = response.into_json().unwrap();
    let reserved: Vec<&Value> = slots
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| s["isReserved"] == true)
        .collect();
    assert_eq!(reserved.len(), 2);
    assert_eq!(reserved[0]["startTime"], "2099-01-05T10:00:00Z");
}

#[test]
fn public_booking_creates_the_customer_once() {
    let app = test_app();
    let customers_before = app.store.lock().customers.get(SALON_ID).unwrap().len();

    let first = app
        .client
        .post("/public/appointments")
        .header(ContentType::JSON)
        .header(tenant_header())
        .header(idempotency_key("pub-key-1"))
        .body(booking_body("2099-01-05T10:00:00Z", "+1 (555) 999-0001"))
        .dispatch();
    assert_eq!(first.status(), Status::Created);
    assert_eq!(first.headers().get_one("Idempotent-Replay"), Some("false"));
    let body: Value = first.into_json().unwrap();
    // End time derives from the service duration.
    assert_eq!(body["endTime"], "2099-01-05T11:00:00Z");
    assert_eq!(body["source"], "PUBLIC");

    let second = app
        .client
        .post("/public/appointments")
        .header(ContentType::JSON)
        .header(tenant_header())
        .header(idempotency_key("pub-key-2"))
        .body(booking_body("2099-01-06T10:00:00Z", "+1 (555) 999-0001"))
        .dispatch();
    assert_eq!(second.status(), Status::Created);

    let customers_after = app.store.lock().customers.get(SALON_ID).unwrap().len();
    assert_eq!(customers_after, customers_before + 1);
}

#[test]
fn public_booking_replays_with_marker_header() {
    let app = test_app();

    let body = booking_body("2099-01-05T10:00:00Z", "+1 (555) 999-0001");
    let first = app
        .client
        .post("/public/appointments")
        .header(ContentType::JSON)
        .header(tenant_header())
        .header(idempotency_key("pub-key-1"))
        .body(body.clone())
        .dispatch();
    assert_eq!(first.status(), Status::Created);
    let first_body: Value = first.into_json().unwrap();

    let replay = app
        .client
        .post("/public/appointments")
        .header(ContentType::JSON)
        .header(tenant_header())
        .header(idempotency_key("pub-key-1"))
        .body(body)
        .dispatch();
    assert_eq!(replay.status(), Status::Created);
    assert_eq!(replay.headers().get_one("Idempotent-Replay"), Some("true"));
    let replay_body: Value = replay.into_json().unwrap();
    assert_eq!(first_body, replay_body);
    assert_eq!(app.appointment_count(), 1);
}

#[test]
fn public_booking_conflict_returns_slot_conflict() {
    let app = test_app();

    let first = app
        .client
        .post("/public/appointments")
        .header(ContentType::JSON)
        .header(tenant_header())
        .header(idempotency_key("pub-key-1"))
        .body(booking_body("2099-01-05T10:00:00Z", "+1 (555) 999-0001"))
        .dispatch();
    assert_eq!(first.status(), Status::Created);

    let clash = app
        .client
        .post("/public/appointments")
        .header(ContentType::JSON)
        .header(tenant_header())
        .header(idempotency_key("pub-key-2"))
        .body(booking_body("2099-01-05T10:30:00Z", "+1 (555) 999-0002"))
        .dispatch();
    assert_eq!(clash.status(), Status::Conflict);
    let body: Value = clash.into_json().unwrap();
    assert_eq!(body["code"], "SLOT_CONFLICT");
    assert_eq!(app.appointment_count(), 1);
}

#[test]
fn public_booking_validates_customer_fields() {
    let app = test_app();

    let response = app
        .client
        .post("/public/appointments")
        .header(ContentType::JSON)
        .header(tenant_header())
        .header(idempotency_key("pub-key-1"))
        .body(
            json!({
                "serviceId": SVC_HAIRCUT,
                "staffId": STAFF_SOPHIE,
                "startTime": "2099-01-05T10:00:00Z",
                "customer": {"name": "X", "phone": "123"},
            })
            .to_string(),
        )
        .dispatch();

    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"]["name"].is_string());
    assert!(body["details"]["phone"].is_string());
    assert_eq!(app.appointment_count(), 0);
}

#[test]
fn public_booking_unknown_service_is_not_found() {
    let app = test_app();

    let response = app
        .client
        .post("/public/appointments")
        .header(ContentType::JSON)
        .header(tenant_header())
        .header(idempotency_key("pub-key-1"))
        .body(
            json!({
                "serviceId": "svc-missing",
                "staffId": STAFF_SOPHIE,
                "startTime": "2099-01-05T10:00:00Z",
                "customer": {"name": "Walk In", "phone": "+1 (555) 999-0001"},
            })
            .to_string(),
        )
        .dispatch();

    assert_eq!(response.status(), Status::NotFound);
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["code"], "SERVICE_NOT_FOUND");
}

#[test]
fn public_staff_listing_includes_weekly_availability() {
    let app = test_app();

    let response = app
        .client
        .get("/public/staff")
        .header(tenant_header())
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().unwrap();
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    for entry in entries {
        assert!(entry["staff"]["name"].is_string());
        assert!(entry["availability"].is_array());
    }
}
