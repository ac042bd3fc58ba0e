use crate::domain::{
    models::{
        appointment::{Appointment, AppointmentFilter, AppointmentStatus},
        invoice::Invoice,
    },
    ports::AppointmentRepository,
};
use crate::error::AppError;
use crate::infra::repositories::explain_missed_write;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{types::Json, Row, SqlitePool};

const SLOT_FREE: &str = "NOT EXISTS (
    SELECT 1 FROM appointments held
    WHERE held.barber_id = ? AND held.appointment_date = ? AND held.appointment_time = ?
      AND held.status = 'confirmed'
)";

pub struct SqliteAppointmentRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepo {
    async fn create(&self, appt: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (id, barber_id, customer_name, customer_phone, appointment_date, appointment_time, services, total_amount, status, invoice_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&appt.id).bind(&appt.barber_id).bind(&appt.customer_name).bind(&appt.customer_phone)
            .bind(appt.appointment_date).bind(&appt.appointment_time).bind(Json(&appt.services))
            .bind(appt.total_amount).bind(appt.status.as_str()).bind(&appt.invoice_id).bind(appt.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::slot_taken_or_db)
    }

    async fn create_if_slot_free(&self, appt: &Appointment) -> Result<Appointment, AppError> {
        let sql = format!(
            "INSERT INTO appointments (id, barber_id, customer_name, customer_phone, appointment_date, appointment_time, services, total_amount, status, invoice_id, created_at)
             SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
             WHERE {}
             RETURNING *",
            SLOT_FREE
        );

        sqlx::query_as::<_, Appointment>(&sql)
            .bind(&appt.id).bind(&appt.barber_id).bind(&appt.customer_name).bind(&appt.customer_phone)
            .bind(appt.appointment_date).bind(&appt.appointment_time).bind(Json(&appt.services))
            .bind(appt.total_amount).bind(appt.status.as_str()).bind(&appt.invoice_id).bind(appt.created_at)
            .bind(&appt.barber_id).bind(appt.appointment_date).bind(&appt.appointment_time)
            .fetch_optional(&self.pool).await.map_err(AppError::slot_taken_or_db)?
            .ok_or_else(|| AppError::Conflict("Time slot is already booked".into()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_barber(&self, barber_id: &str, filter: &AppointmentFilter) -> Result<Vec<Appointment>, AppError> {
        let status = filter.status.map(|s| s.as_str());
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments
             WHERE barber_id = ?
               AND (? IS NULL OR status = ?)
               AND (? IS NULL OR appointment_date >= ?)
               AND (? IS NULL OR appointment_date <= ?)
             ORDER BY appointment_date ASC, appointment_time ASC"
        )
            .bind(barber_id)
            .bind(status).bind(status)
            .bind(filter.start_date).bind(filter.start_date)
            .bind(filter.end_date).bind(filter.end_date)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_confirmed_times(&self, barber_id: &str, date: NaiveDate) -> Result<Vec<String>, AppError> {
        let rows = sqlx::query("SELECT appointment_time FROM appointments WHERE barber_id = ? AND appointment_date = ? AND status = 'confirmed'")
            .bind(barber_id).bind(date)
            .fetch_all(&self.pool).await.map_err(AppError::Database)?;
        Ok(rows.iter().map(|r| r.get::<String, _>("appointment_time")).collect())
    }

    async fn is_slot_available(&self, barber_id: &str, date: NaiveDate, time: &str, exclude_id: Option<&str>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "SELECT COUNT(*) as count FROM appointments
             WHERE barber_id = ? AND appointment_date = ? AND appointment_time = ? AND status = 'confirmed'
               AND (? IS NULL OR id != ?)"
        )
            .bind(barber_id).bind(date).bind(time).bind(exclude_id).bind(exclude_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count") == 0)
    }

    async fn confirm(&self, id: &str, barber_id: &str) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let confirmed = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = 'confirmed'
             WHERE id = ? AND barber_id = ? AND status = 'pending'
               AND NOT EXISTS (
                   SELECT 1 FROM appointments held
                   WHERE held.barber_id = appointments.barber_id
                     AND held.appointment_date = appointments.appointment_date
                     AND held.appointment_time = appointments.appointment_time
                     AND held.status = 'confirmed'
                     AND held.id != appointments.id
               )
             RETURNING *"
        )
            .bind(id).bind(barber_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::slot_taken_or_db)?;

        match confirmed {
            Some(appt) => {
                tx.commit().await.map_err(AppError::Database)?;
                Ok(appt)
            }
            None => {
                let current = sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?").bind(id).fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
                Err(explain_missed_write(current, barber_id, &[AppointmentStatus::Pending]))
            }
        }
    }

    async fn close(&self, id: &str, barber_id: &str, status: AppointmentStatus) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let closed = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = ?
             WHERE id = ? AND barber_id = ? AND status IN ('pending', 'confirmed')
             RETURNING *"
        )
            .bind(status.as_str()).bind(id).bind(barber_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

        match closed {
            Some(appt) => {
                tx.commit().await.map_err(AppError::Database)?;
                Ok(appt)
            }
            None => {
                let current = sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?").bind(id).fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
                Err(explain_missed_write(current, barber_id, &[]))
            }
        }
    }

    async fn complete_with_invoice(&self, id: &str, barber_id: &str, invoice: &Invoice) -> Result<(Appointment, Invoice), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Invoice>(
            "INSERT INTO invoices (id, user_id, customer_name, date, total_amount, items, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&invoice.id).bind(&invoice.user_id).bind(&invoice.customer_name).bind(invoice.date)
            .bind(invoice.total_amount).bind(Json(&invoice.items)).bind(invoice.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        let completed = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = 'completed', invoice_id = ?
             WHERE id = ? AND barber_id = ? AND status = 'confirmed' AND invoice_id IS NULL
             RETURNING *"
        )
            .bind(&created.id).bind(id).bind(barber_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

        match completed {
            Some(appt) => {
                tx.commit().await.map_err(AppError::Database)?;
                Ok((appt, created))
            }
            None => {
                let current = sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?").bind(id).fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
                tx.rollback().await.map_err(AppError::Database)?;
                Err(explain_missed_write(current, barber_id, &[]))
            }
        }
    }
}
