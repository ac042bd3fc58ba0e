use crate::domain::{models::invoice::Invoice, ports::InvoiceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{types::Json, PgPool};

pub struct PostgresInvoiceRepo {
    pool: PgPool,
}

impl PostgresInvoiceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepo {
    async fn create(&self, invoice: &Invoice) -> Result<Invoice, AppError> {
        sqlx::query_as::<_, Invoice>(
            "INSERT INTO invoices (id, user_id, customer_name, date, total_amount, items, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *"
        )
            .bind(&invoice.id).bind(&invoice.user_id).bind(&invoice.customer_name).bind(invoice.date)
            .bind(invoice.total_amount).bind(Json(&invoice.items)).bind(invoice.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, user_id: &str, id: &str) -> Result<Option<Invoice>, AppError> {
        sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE user_id = $1 AND id = $2").bind(user_id).bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Vec<Invoice>, AppError> {
        sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices
             WHERE user_id = $1
               AND ($2::date IS NULL OR date >= $2)
               AND ($3::date IS NULL OR date <= $3)
             ORDER BY date DESC, created_at DESC"
        )
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
