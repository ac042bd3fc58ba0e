use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::{AppointmentRepository, InvoiceRepository, UserRepository};
use crate::domain::services::auth_service::AuthService;
use crate::error::AppError;
use crate::infra::repositories::{
    postgres_appointment_repo::PostgresAppointmentRepo, postgres_invoice_repo::PostgresInvoiceRepo,
    postgres_user_repo::PostgresUserRepo,
    sqlite_appointment_repo::SqliteAppointmentRepo, sqlite_invoice_repo::SqliteInvoiceRepo,
    sqlite_user_repo::SqliteUserRepo,
};

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    let (user_repo, appointment_repo, invoice_repo): (
        Arc<dyn UserRepository>,
        Arc<dyn AppointmentRepository>,
        Arc<dyn InvoiceRepository>,
    ) = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let opts: PgConnectOptions = database_url.parse().map_err(AppError::Database)?;
        let opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .map_err(AppError::Database)?;

        run_postgres_migrations(&pool).await?;

        (
            Arc::new(PostgresUserRepo::new(pool.clone())),
            Arc::new(PostgresAppointmentRepo::new(pool.clone())),
            Arc::new(PostgresInvoiceRepo::new(pool)),
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .map_err(AppError::Database)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .map_err(AppError::Database)?;

        run_sqlite_migrations(&pool).await?;

        (
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteAppointmentRepo::new(pool.clone())),
            Arc::new(SqliteInvoiceRepo::new(pool)),
        )
    };

    let auth_service = Arc::new(AuthService::new(user_repo.clone(), config)?);

    Ok(AppState::new(config.clone(), user_repo, appointment_repo, invoice_repo, auth_service))
}

/// Builds state over an already-open SQLite pool, running migrations first.
pub async fn sqlite_state(config: &Config, pool: SqlitePool) -> Result<AppState, AppError> {
    run_sqlite_migrations(&pool).await?;

    let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepo::new(pool.clone()));
    let auth_service = Arc::new(AuthService::new(user_repo.clone(), config)?);

    Ok(AppState::new(
        config.clone(),
        user_repo,
        Arc::new(SqliteAppointmentRepo::new(pool.clone())),
        Arc::new(SqliteInvoiceRepo::new(pool)),
        auth_service,
    ))
}

async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to run Postgres migrations: {}", e)))
}

async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to run SQLite migrations: {}", e)))
}
