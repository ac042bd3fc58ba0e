use std::sync::Arc;
use crate::domain::{
    models::{auth::Claims, user::User},
    ports::UserRepository,
};
use crate::error::AppError;
use crate::config::Config;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use chrono::{Utc, Duration};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use tracing::info;

const AUDIENCE: &str = "barbershop-frontend";
const MIN_PASSWORD_LEN: usize = 6;
pub const TOKEN_TTL_HOURS: i64 = 24;

pub struct IssuedToken {
    pub access_token: String,
    pub csrf_token: String,
}

/// Issues and verifies barber identities. The rest of the crate only ever
/// sees the verified user id.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    issuer: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, config: &Config) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT private key PEM: {}", e)))?;
        let decoding_key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT public key PEM: {}", e)))?;

        Ok(Self {
            users,
            issuer: config.auth_issuer.clone(),
            encoding_key,
            decoding_key,
        })
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<User, AppError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::Validation("Username and password required".into()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation("Password must be at least 6 characters".into()));
        }
        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("Username already exists".into()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| AppError::Internal)?
            .to_string();

        let created = self.users.create(&User::new(username.to_string(), password_hash)).await?;
        info!("Registered barber: {}", created.id);
        Ok(created)
    }

    /// Verifies credentials. Unknown user and wrong password are indistinguishable.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AppError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation("Username and password required".into()));
        }

        let user = self.users.find_by_username(username.trim()).await?
            .ok_or(AppError::Unauthorized)?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal)?;

        Argon2::default().verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::Unauthorized)?;

        Ok(user)
    }

    pub fn issue_token(&self, user: &User) -> Result<IssuedToken, AppError> {
        let csrf_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect();
        let now = Utc::now();
        let exp = (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;

        let claims = Claims {
            iss: self.issuer.clone(),
            sub: user.id.clone(),
            aud: AUDIENCE.to_string(),
            exp,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            username: user.username.clone(),
            csrf_token: csrf_token.clone(),
        };

        let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("JWT encoding failed: {}", e);
                AppError::Internal
            })?;

        Ok(IssuedToken { access_token, csrf_token })
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[AUDIENCE]);
        validation.set_issuer(&[self.issuer.as_str()]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }
}
