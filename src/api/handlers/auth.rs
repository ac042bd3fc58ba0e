use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::CredentialsRequest;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::auth::{AuthResponse, UserProfile};
use crate::domain::services::auth_service::TOKEN_TTL_HOURS;
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::info;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.register(&payload.username, &payload.password).await?;

    Ok((StatusCode::CREATED, Json(UserProfile {
        id: user.id,
        username: user.username,
    })))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.authenticate(&payload.username, &payload.password).await?;
    let issued = state.auth_service.issue_token(&user)?;

    set_cookie(&cookies, &issued.access_token);

    info!("User logged in: {}", user.id);

    Ok(Json(AuthResponse {
        token: issued.access_token,
        csrf_token: issued.csrf_token,
        user: UserProfile {
            id: user.id,
            username: user.username,
        }
    }))
}

pub async fn me(user: AuthUser) -> Result<impl IntoResponse, AppError> {
    Ok(Json(UserProfile {
        id: user.id,
        username: user.username,
    }))
}

pub async fn logout(cookies: Cookies) -> Result<impl IntoResponse, AppError> {
    cookies.remove(Cookie::build(("access_token", "")).path("/").into());

    info!("User logged out");

    Ok(StatusCode::OK)
}

fn set_cookie(cookies: &Cookies, access: &str) {
    let mut access_c = Cookie::new("access_token", access.to_string());
    access_c.set_http_only(true);
    access_c.set_secure(true);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::hours(TOKEN_TTL_HOURS));
    cookies.add(access_c);
}
