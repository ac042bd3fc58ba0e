#![allow(dead_code)]

use barbershop_backend::{
    api::router::create_router,
    config::Config,
    domain::models::catalog::ServiceCatalog,
    domain::services::slot_calendar::SlotSchedule,
    infra::factory::sqlite_state,
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use tower::ServiceExt;
use serde_json::Value;

pub const TEST_PASSWORD: &str = "clipper-123";

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

/// A registered barber with a bearer token ready to use.
pub struct Barber {
    pub id: String,
    pub token: String,
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_catalog(ServiceCatalog::default()).await
    }

    pub async fn with_catalog(catalog: ServiceCatalog) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            schedule: SlotSchedule::default(),
            catalog,
        };

        let state = Arc::new(sqlite_state(&config, pool.clone()).await.expect("Failed to build test state"));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Sends a JSON request, authenticated with a bearer token when given.
    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn register_barber(&self, username: &str) -> Barber {
        let payload = serde_json::json!({ "username": username, "password": TEST_PASSWORD });

        let res = self.send("POST", "/api/auth/register", None, Some(payload.clone())).await;
        if !res.status().is_success() {
            panic!("Register failed in test helper: status {}", res.status());
        }

        let res = self.send("POST", "/api/auth/login", None, Some(payload)).await;
        if !res.status().is_success() {
            panic!("Login failed in test helper: status {}", res.status());
        }
        let body = parse_body(res).await;

        Barber {
            id: body["user"]["id"].as_str().expect("No user id").to_string(),
            token: body["token"].as_str().expect("No token").to_string(),
        }
    }

    /// Logs in through the cookie flow, returning the cookie value and CSRF token.
    pub async fn login(&self, username: &str, password: &str) -> AuthHeaders {
        let payload = serde_json::json!({
            "username": username,
            "password": password
        });

        let response = self.send("POST", "/api/auth/login", None, Some(payload)).await;

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookies: Vec<String> = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token_cookie = cookies.iter()
            .find(|c| c.contains("access_token="))
            .expect("No access_token cookie returned");

        let start = access_token_cookie.find("access_token=").unwrap() + 13;
        let end = access_token_cookie[start..].find(';').unwrap_or(access_token_cookie.len() - start);
        let access_token = access_token_cookie[start..start+end].to_string();

        let body_json = parse_body(response).await;
        let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();

        AuthHeaders {
            access_token,
            csrf_token
        }
    }

    /// Books through the barber endpoint, so the appointment starts confirmed.
    pub async fn book_confirmed(&self, barber: &Barber, date: &str, time: &str, service_ids: &[i64]) -> Value {
        let res = self.send("POST", "/api/appointments", Some(&barber.token), Some(serde_json::json!({
            "customer_name": "Walk In",
            "customer_phone": "555-0101",
            "appointment_date": date,
            "appointment_time": time,
            "service_ids": service_ids
        }))).await;
        assert_eq!(res.status(), 201, "barber booking failed");
        parse_body(res).await
    }

    /// Books through the public endpoint, so the appointment starts pending.
    pub async fn book_pending(&self, barber_id: &str, date: &str, time: &str) -> Response {
        self.send("POST", "/api/public/appointments", None, Some(serde_json::json!({
            "customer_name": "Online Customer",
            "customer_phone": "555-0199",
            "appointment_date": date,
            "appointment_time": time,
            "service_ids": [1],
            "barber_id": barber_id
        }))).await
    }
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
