use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header, request::Parts, StatusCode},
};
use crate::state::AppState;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::Span;

/// The verified barber identity behind a request.
pub struct AuthUser {
    pub id: String,
    pub username: String,
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts.headers.get(header::AUTHORIZATION)?
        .to_str().ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        // CSRF echo applies to cookie-borne tokens only.
        let (access_token, from_cookie) = match bearer_token(parts) {
            Some(token) => (token, false),
            None => {
                let cookies = parts.extensions.get::<Cookies>()
                    .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
                let token = cookies.get("access_token")
                    .ok_or(StatusCode::UNAUTHORIZED)?
                    .value()
                    .to_string();
                (token, true)
            }
        };

        let claims = app_state.auth_service.verify_token(&access_token)
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        let method = &parts.method;
        if from_cookie && method != "GET" && method != "HEAD" && method != "OPTIONS" {
            let csrf_header_val = parts.headers.get("X-CSRF-Token")
                .ok_or(StatusCode::FORBIDDEN)?
                .to_str()
                .map_err(|_| StatusCode::FORBIDDEN)?;

            if csrf_header_val != claims.csrf_token {
                return Err(StatusCode::FORBIDDEN);
            }
        }

        Span::current().record("user_id", claims.sub.as_str());

        Ok(AuthUser {
            id: claims.sub,
            username: claims.username,
        })
    }
}
