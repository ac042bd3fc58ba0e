mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{parse_body, TestApp, TEST_PASSWORD};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_register_login_me() {
    let app = TestApp::new().await;

    let res = app.send("POST", "/api/auth/register", None, Some(json!({
        "username": "marco",
        "password": TEST_PASSWORD
    }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let profile = parse_body(res).await;
    assert_eq!(profile["username"], "marco");
    assert!(profile.get("password_hash").is_none());

    let res = app.send("POST", "/api/auth/login", None, Some(json!({
        "username": "marco",
        "password": TEST_PASSWORD
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    let token = body["token"].as_str().unwrap();
    assert!(body["csrf_token"].as_str().is_some());
    assert_eq!(body["user"]["id"], profile["id"]);

    let res = app.send("GET", "/api/auth/me", Some(token), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["username"], "marco");
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_weak_input() {
    let app = TestApp::new().await;
    app.register_barber("taken").await;

    let res = app.send("POST", "/api/auth/register", None, Some(json!({
        "username": "taken",
        "password": TEST_PASSWORD
    }))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app.send("POST", "/api/auth/register", None, Some(json!({
        "username": "shorty",
        "password": "123"
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("POST", "/api/auth/register", None, Some(json!({
        "username": "  ",
        "password": TEST_PASSWORD
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failures_are_unauthorized() {
    let app = TestApp::new().await;
    app.register_barber("known").await;

    let res = app.send("POST", "/api/auth/login", None, Some(json!({
        "username": "known",
        "password": "wrong-password"
    }))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app.send("POST", "/api/auth/login", None, Some(json!({
        "username": "unknown",
        "password": TEST_PASSWORD
    }))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_need_identity() {
    let app = TestApp::new().await;

    for (method, uri) in [
        ("GET", "/api/services"),
        ("GET", "/api/appointments"),
        ("GET", "/api/invoices"),
        ("GET", "/api/invoices/summary"),
        ("GET", "/api/auth/me"),
    ] {
        let res = app.send(method, uri, None, None).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }

    let res = app.send("GET", "/api/appointments", Some("not-a-jwt"), None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app.send("GET", "/health", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cookie_auth_requires_csrf_on_writes() {
    let app = TestApp::new().await;
    app.register_barber("cookie-barber").await;
    let auth = app.login("cookie-barber", TEST_PASSWORD).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/appointments")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let payload = json!({
        "customer_name": "Cookie Customer",
        "customer_phone": "555-0177",
        "appointment_date": "2030-11-01",
        "appointment_time": "09:00",
        "service_ids": [1]
    });

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/appointments")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/appointments")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::new().await;
    app.register_barber("leaving-barber").await;
    let auth = app.login("leaving-barber", TEST_PASSWORD).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/auth/logout")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let cleared = res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .any(|h| h.to_str().unwrap().starts_with("access_token=;"));
    assert!(cleared);
}
