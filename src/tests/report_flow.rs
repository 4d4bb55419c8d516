use rocket::http::{ContentType, Status};
use serde_json::{json, Value};

use super::support::{
    bearer, idempotency_key, test_app, CUSTOMER_SARAH, STAFF_EMMA, STAFF_SOPHIE, SVC_HAIRCUT,
    SVC_MANICURE,
};

#[test]
fn empty_day_reports_zero_revenue() {
    let app = test_app();
    let token = app.login();

    let response = app
        .client
        .get("/admin/reports/daily?date=2099-01-05")
        .header(bearer(&token))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["date"], "2099-01-05");
    assert_eq!(body["totalRevenueCents"], 0);
    assert_eq!(body["totalAppointments"], 0);
    assert_eq!(body["noShowCount"], 0);
    assert!(body["topServices"].as_array().unwrap().is_empty());
}

#[test]
fn completing_an_appointment_moves_the_daily_revenue() {
    let app = test_app();
    let token = app.login();

    let created = app.book(
        &token,
        "key-1",
        STAFF_SOPHIE,
        "2099-01-05T10:00:00Z",
        "2099-01-05T11:00:00Z",
    );

    let before: Value = app
        .client
        .get("/admin/reports/daily?date=2099-01-05")
        .header(bearer(&token))
        .dispatch()
        .into_json()
        .unwrap();
    assert_eq!(before["totalRevenueCents"], 0);
    assert_eq!(before["totalAppointments"], 1);

    let patch = app
        .client
        .patch(format!("/admin/appointments/{}", created["id"].as_str().unwrap()))
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(json!({"status": "COMPLETED"}).to_string())
        .dispatch();
    assert_eq!(patch.status(), Status::Ok);

    let after: Value = app
        .client
        .get("/admin/reports/daily?date=2099-01-05")
        .header(bearer(&token))
        .dispatch()
        .into_json()
        .unwrap();
    assert_eq!(after["totalRevenueCents"], 7500);
}

#[test]
fn cancelled_appointments_stay_in_raw_totals_only() {
    let app = test_app();
    let token = app.login();

    let created = app.book(
        &token,
        "key-1",
        STAFF_SOPHIE,
        "2099-01-05T10:00:00Z",
        "2099-01-05T11:00:00Z",
    );
    app.client
        .patch(format!("/admin/appointments/{}", created["id"].as_str().unwrap()))
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(json!({"status": "CANCELLED"}).to_string())
        .dispatch();

    let report: Value = app
        .client
        .get("/admin/reports/daily?date=2099-01-05")
        .header(bearer(&token))
        .dispatch()
        .into_json()
        .unwrap();
    assert_eq!(report["totalAppointments"], 1);
    assert!(report["topServices"].as_array().unwrap().is_empty());
    assert_eq!(report["totalRevenueCents"], 0);
}

fn book_service(
    app: &super::support::TestApp,
    token: &str,
    key: &str,
    service_id: &str,
    staff_id: &str,
    start: &str,
    end: &str,
) -> Value {
    let response = app
        .client
        .post("/admin/appointments")
        .header(ContentType::JSON)
        .header(bearer(token))
        .header(idempotency_key(key))
        .body(
            json!({
                "serviceId": service_id,
                "staffId": staff_id,
                "customerId": CUSTOMER_SARAH,
                "startTime": start,
                "endTime": end,
            })
            .to_string(),
        )
        .dispatch();
    assert_eq!(response.status(), Status::Created);
    response.into_json().unwrap()
}

#[test]
fn top_services_rank_by_count_with_completed_revenue() {
    let app = test_app();
    let token = app.login();

    let first = book_service(
        &app,
        &token,
        "k1",
        SVC_HAIRCUT,
        STAFF_SOPHIE,
        "2099-01-05T09:00:00Z",
        "2099-01-05T10:00:00Z",
    );
    book_service(
        &app,
        &token,
        "k2",
        SVC_HAIRCUT,
        STAFF_SOPHIE,
        "2099-01-05T12:00:00Z",
        "2099-01-05T13:00:00Z",
    );
    book_service(
        &app,
        &token,
        "k3",
        SVC_MANICURE,
        STAFF_EMMA,
        "2099-01-05T09:00:00Z",
        "2099-01-05T09:45:00Z",
    );

    // Only the completed haircut contributes revenue.
    app.client
        .patch(format!("/admin/appointments/{}", first["id"].as_str().unwrap()))
        .header(ContentType::JSON)
        .header(bearer(&token))
        .body(json!({"status": "COMPLETED"}).to_string())
        .dispatch();

    let response = app
        .client
        .get("/admin/reports/top-services?from=2099-01-05&to=2099-01-05")
        .header(bearer(&token))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let ranking: Value = response.into_json().unwrap();
    let ranking = ranking.as_array().unwrap();

    assert_eq!(ranking.len(), 2);
    assert_eq!(ranking[0]["serviceId"], SVC_HAIRCUT);
    assert_eq!(ranking[0]["count"], 2);
    assert_eq!(ranking[0]["revenueCents"], 7500);
    assert_eq!(ranking[1]["serviceId"], SVC_MANICURE);
    assert_eq!(ranking[1]["count"], 1);
    assert_eq!(ranking[1]["revenueCents"], 0);
}

#[test]
fn top_services_ties_order_by_service_id() {
    let app = test_app();
    let token = app.login();

    book_service(
        &app,
        &token,
        "k1",
        SVC_MANICURE,
        STAFF_EMMA,
        "2099-01-05T09:00:00Z",
        "2099-01-05T09:45:00Z",
    );
    book_service(
        &app,
        &token,
        "k2",
        SVC_HAIRCUT,
        STAFF_SOPHIE,
        "2099-01-05T09:00:00Z",
        "2099-01-05T10:00:00Z",
    );

    let ranking: Value = app
        .client
        .get("/admin/reports/top-services")
        .header(bearer(&token))
        .dispatch()
        .into_json()
        .unwrap();
    let ranking = ranking.as_array().unwrap();
    assert_eq!(ranking[0]["serviceId"], SVC_HAIRCUT);
    assert_eq!(ranking[1]["serviceId"], SVC_MANICURE);
}

#[test]
fn top_services_honours_the_limit() {
    let app = test_app();
    let token = app.login();

    book_service(
        &app,
        &token,
        "k1",
        SVC_MANICURE,
        STAFF_EMMA,
        "2099-01-05T09:00:00Z",
        "2099-01-05T09:45:00Z",
    );
    book_service(
        &app,
        &token,
        "k2",
        SVC_HAIRCUT,
        STAFF_SOPHIE,
        "2099-01-05T09:00:00Z",
        "2099-01-05T10:00:00Z",
    );

    let ranking: Value = app
        .client
        .get("/admin/reports/top-services?limit=1")
        .header(bearer(&token))
        .dispatch()
        .into_json()
        .unwrap();
    assert_eq!(ranking.as_array().unwrap().len(), 1);
}
