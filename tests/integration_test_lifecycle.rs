mod common;

use common::{parse_body, TestApp};
use serde_json::json;

const DATE: &str = "2030-07-01";

#[tokio::test]
async fn test_public_booking_is_pending_with_frozen_prices() {
    let app = TestApp::new().await;
    let barber = app.register_barber("lifecycle-barber").await;

    let res = app.send("POST", "/api/public/appointments", None, Some(json!({
        "customer_name": "  Jane Doe ",
        "customer_phone": "555-0111",
        "appointment_date": DATE,
        "appointment_time": "09:00",
        "service_ids": [1, 3],
        "barber_id": barber.id
    }))).await;
    assert_eq!(res.status(), 201);

    let body = parse_body(res).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["customer_name"], "Jane Doe");
    assert_eq!(body["total_amount"], 3000);
    assert_eq!(body["services"].as_array().unwrap().len(), 2);
    assert_eq!(body["services"][1]["name"], "Beard Trim");
    assert!(body["invoice_id"].is_null());
}

#[tokio::test]
async fn test_public_booking_validation() {
    let app = TestApp::new().await;
    let barber = app.register_barber("picky-barber").await;

    let base = json!({
        "customer_name": "Jane",
        "customer_phone": "555-0111",
        "appointment_date": DATE,
        "appointment_time": "09:00",
        "service_ids": [1],
        "barber_id": barber.id
    });

    let cases = [
        ("customer_name", json!("")),
        ("appointment_date", json!("2030/07/01")),
        ("appointment_time", json!("9:00")),
        ("appointment_time", json!("09:15")),
        ("service_ids", json!([])),
        ("service_ids", json!([99])),
        ("barber_id", json!("no-such-barber")),
    ];

    for (field, value) in cases {
        let mut payload = base.clone();
        payload[field] = value.clone();
        let res = app.send("POST", "/api/public/appointments", None, Some(payload)).await;
        assert_eq!(res.status(), 400, "expected 400 for {} = {}", field, value);
    }
}

#[tokio::test]
async fn test_confirm_then_confirm_again_is_invalid_state() {
    let app = TestApp::new().await;
    let barber = app.register_barber("confirm-barber").await;

    let pending = parse_body(app.book_pending(&barber.id, DATE, "09:00").await).await;
    let id = pending["id"].as_str().unwrap();

    let res = app.send("PUT", &format!("/api/appointments/{}/confirm", id), Some(&barber.token), None).await;
    assert_eq!(res.status(), 200);
    assert_eq!(parse_body(res).await["status"], "confirmed");

    let res = app.send("PUT", &format!("/api/appointments/{}/confirm", id), Some(&barber.token), None).await;
    assert_eq!(res.status(), 422);
    assert!(parse_body(res).await["error"].as_str().is_some());
}

#[tokio::test]
async fn test_confirm_refused_when_slot_taken() {
    let app = TestApp::new().await;
    let barber = app.register_barber("busy-barber").await;

    let first = parse_body(app.book_pending(&barber.id, DATE, "10:00").await).await;
    let second = parse_body(app.book_pending(&barber.id, DATE, "10:00").await).await;

    let res = app.send("PUT", &format!("/api/appointments/{}/confirm", first["id"].as_str().unwrap()), Some(&barber.token), None).await;
    assert_eq!(res.status(), 200);

    let second_id = second["id"].as_str().unwrap();
    let res = app.send("PUT", &format!("/api/appointments/{}/confirm", second_id), Some(&barber.token), None).await;
    assert_eq!(res.status(), 409);

    let res = app.send("GET", &format!("/api/appointments/{}", second_id), Some(&barber.token), None).await;
    assert_eq!(parse_body(res).await["status"], "pending");

    // A third public request for the now-held slot is refused outright.
    let res = app.book_pending(&barber.id, DATE, "10:00").await;
    assert_eq!(res.status(), 409);
}

#[tokio::test]
async fn test_reject_and_cancel_are_terminal() {
    let app = TestApp::new().await;
    let barber = app.register_barber("closing-barber").await;

    let pending = parse_body(app.book_pending(&barber.id, DATE, "11:00").await).await;
    let pending_id = pending["id"].as_str().unwrap();

    let res = app.send("PUT", &format!("/api/appointments/{}/reject", pending_id), Some(&barber.token), None).await;
    assert_eq!(res.status(), 200);
    assert_eq!(parse_body(res).await["status"], "rejected");

    for action in ["confirm", "reject", "complete"] {
        let res = app.send("PUT", &format!("/api/appointments/{}/{}", pending_id, action), Some(&barber.token), None).await;
        assert_eq!(res.status(), 422, "{} on rejected appointment", action);
    }
    let res = app.send("DELETE", &format!("/api/appointments/{}", pending_id), Some(&barber.token), None).await;
    assert_eq!(res.status(), 422);

    let confirmed = app.book_confirmed(&barber, DATE, "12:00", &[1]).await;
    let confirmed_id = confirmed["id"].as_str().unwrap();

    let res = app.send("DELETE", &format!("/api/appointments/{}", confirmed_id), Some(&barber.token), None).await;
    assert_eq!(res.status(), 200);
    assert_eq!(parse_body(res).await["status"], "cancelled");

    let res = app.send("GET", &format!("/api/appointments/{}", confirmed_id), Some(&barber.token), None).await;
    assert_eq!(parse_body(res).await["status"], "cancelled");
}

#[tokio::test]
async fn test_pending_cannot_be_completed() {
    let app = TestApp::new().await;
    let barber = app.register_barber("eager-barber").await;

    let pending = parse_body(app.book_pending(&barber.id, DATE, "13:00").await).await;
    let res = app.send("PUT", &format!("/api/appointments/{}/complete", pending["id"].as_str().unwrap()), Some(&barber.token), None).await;
    assert_eq!(res.status(), 422);

    let res = app.send("GET", "/api/invoices", Some(&barber.token), None).await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_foreign_and_unknown_appointments_look_the_same() {
    let app = TestApp::new().await;
    let owner = app.register_barber("owner").await;
    let intruder = app.register_barber("intruder").await;

    let appt = app.book_confirmed(&owner, DATE, "15:00", &[1]).await;
    let id = appt["id"].as_str().unwrap();

    for (method, uri) in [
        ("GET", format!("/api/appointments/{}", id)),
        ("PUT", format!("/api/appointments/{}/confirm", id)),
        ("PUT", format!("/api/appointments/{}/reject", id)),
        ("PUT", format!("/api/appointments/{}/complete", id)),
        ("DELETE", format!("/api/appointments/{}", id)),
        ("GET", "/api/appointments/does-not-exist".to_string()),
    ] {
        let res = app.send(method, &uri, Some(&intruder.token), None).await;
        assert_eq!(res.status(), 404, "{} {}", method, uri);
    }

    let res = app.send("GET", &format!("/api/appointments/{}", id), Some(&owner.token), None).await;
    assert_eq!(parse_body(res).await["status"], "confirmed");
}

#[tokio::test]
async fn test_barber_double_booking_conflicts() {
    let app = TestApp::new().await;
    let barber = app.register_barber("double-barber").await;

    app.book_confirmed(&barber, DATE, "16:00", &[1]).await;

    let res = app.send("POST", "/api/appointments", Some(&barber.token), Some(json!({
        "customer_name": "Second",
        "customer_phone": "555-0102",
        "appointment_date": DATE,
        "appointment_time": "16:00",
        "service_ids": [2]
    }))).await;
    assert_eq!(res.status(), 409);
}

#[tokio::test]
async fn test_barber_booking_for_colleague_and_off_grid_time() {
    let app = TestApp::new().await;
    let barber = app.register_barber("front-desk").await;
    let colleague = app.register_barber("colleague").await;

    let res = app.send("POST", "/api/appointments", Some(&barber.token), Some(json!({
        "customer_name": "Late Walk In",
        "customer_phone": "555-0103",
        "appointment_date": DATE,
        "appointment_time": "19:15",
        "service_ids": [5],
        "barber_id": colleague.id
    }))).await;
    assert_eq!(res.status(), 201);
    let body = parse_body(res).await;
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["barber_id"], colleague.id.as_str());

    let res = app.send("POST", "/api/appointments", Some(&barber.token), Some(json!({
        "customer_name": "Nobody",
        "customer_phone": "555-0104",
        "appointment_date": DATE,
        "appointment_time": "10:00",
        "service_ids": [1],
        "barber_id": "ghost"
    }))).await;
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn test_list_appointments_filters() {
    let app = TestApp::new().await;
    let barber = app.register_barber("filter-barber").await;
    let other = app.register_barber("other-barber").await;

    app.book_confirmed(&barber, "2030-07-01", "09:00", &[1]).await;
    app.book_confirmed(&barber, "2030-07-02", "09:00", &[1]).await;
    app.book_pending(&barber.id, "2030-07-02", "10:00").await;
    app.book_confirmed(&other, "2030-07-01", "09:00", &[1]).await;

    let res = app.send("GET", "/api/appointments", Some(&barber.token), None).await;
    assert_eq!(res.status(), 200);
    let all = parse_body(res).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
    assert_eq!(all[0]["appointment_date"], "2030-07-01");

    let res = app.send("GET", "/api/appointments?status=pending", Some(&barber.token), None).await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 1);

    let res = app.send("GET", "/api/appointments?start_date=2030-07-02&end_date=2030-07-02", Some(&barber.token), None).await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 2);

    let res = app.send("GET", "/api/appointments?status=bogus", Some(&barber.token), None).await;
    assert_eq!(res.status(), 400);

    let res = app.send("GET", "/api/appointments?start_date=2030-07-05&end_date=2030-07-01", Some(&barber.token), None).await;
    assert_eq!(res.status(), 400);
}
