use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, auth, public, catalog, appointment, invoice};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))

        // Public Booking Flow
        .route("/api/public/services", get(catalog::list_public_services))
        .route("/api/public/barbers", get(public::list_barbers))
        .route("/api/public/available-slots", get(public::available_slots))
        .route("/api/public/appointments", post(public::create_public_appointment))

        // Barber Appointment Management
        .route("/api/services", get(catalog::list_services))
        .route("/api/appointments", post(appointment::create_appointment).get(appointment::list_appointments))
        .route("/api/appointments/{id}", get(appointment::get_appointment).delete(appointment::cancel_appointment))
        .route("/api/appointments/{id}/confirm", put(appointment::confirm_appointment))
        .route("/api/appointments/{id}/reject", put(appointment::reject_appointment))
        .route("/api/appointments/{id}/complete", put(appointment::complete_appointment))

        // Invoices
        .route("/api/invoices", post(invoice::create_invoice).get(invoice::list_invoices))
        .route("/api/invoices/summary", get(invoice::sales_summary))
        .route("/api/invoices/{id}", get(invoice::get_invoice))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
