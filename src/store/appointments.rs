use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use sqlx::QueryBuilder;

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::{
    Appointment, AppointmentPatch, AppointmentStatus, BookAppointmentRequest, RescheduleRecord,
};

/// Appointment ledger: appointment rows plus the append-only reschedule
/// audit trail. Reschedule rows cascade-delete with their appointment.
#[derive(Debug, Clone)]
pub struct AppointmentStore {
    pool: SqlitePool,
}

impl AppointmentStore {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    /// Insert a new row with status `pending`. `user_id` and `clinic_id`
    /// stay null when not supplied.
    pub async fn create(
        &self,
        user_id: Option<i64>,
        clinic_id: Option<i64>,
        request: &BookAppointmentRequest,
    ) -> Result<Appointment> {
        let result = sqlx::query(
            "INSERT INTO appointments
             (user_id, clinic_id, name, email, phone, area, clinic, department, date, message, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(clinic_id)
        .bind(request.name.trim())
        .bind(request.email.trim())
        .bind(&request.phone)
        .bind(&request.area)
        .bind(&request.clinic)
        .bind(&request.department)
        .bind(&request.date)
        .bind(&request.message)
        .bind(AppointmentStatus::Pending)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.find_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| ApiError::internal("appointment row missing after insert"))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>> {
        let appointment =
            sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(appointment)
    }

    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(appointments)
    }

    pub async fn find_by_clinic(&self, clinic_id: i64) -> Result<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE clinic_id = ? ORDER BY created_at DESC",
        )
        .bind(clinic_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(appointments)
    }

    pub async fn find_all(&self) -> Result<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(appointments)
    }

    /// Partial update; only supplied fields change. An empty patch is a
    /// no-op that returns the current row, not an error.
    pub async fn update(&self, id: i64, patch: &AppointmentPatch) -> Result<Appointment> {
        if patch.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| ApiError::not_found("Appointment not found"));
        }

        let mut builder = QueryBuilder::new("UPDATE appointments SET ");
        let mut sets = builder.separated(", ");
        if let Some(name) = &patch.name {
            sets.push("name = ");
            sets.push_bind_unseparated(name.clone());
        }
        if let Some(email) = &patch.email {
            sets.push("email = ");
            sets.push_bind_unseparated(email.clone());
        }
        if let Some(phone) = &patch.phone {
            sets.push("phone = ");
            sets.push_bind_unseparated(phone.clone());
        }
        if let Some(area) = &patch.area {
            sets.push("area = ");
            sets.push_bind_unseparated(area.clone());
        }
        if let Some(clinic) = &patch.clinic {
            sets.push("clinic = ");
            sets.push_bind_unseparated(clinic.clone());
        }
        if let Some(department) = &patch.department {
            sets.push("department = ");
            sets.push_bind_unseparated(department.clone());
        }
        if let Some(date) = &patch.date {
            sets.push("date = ");
            sets.push_bind_unseparated(date.clone());
        }
        if let Some(message) = &patch.message {
            sets.push("message = ");
            sets.push_bind_unseparated(message.clone());
        }
        if let Some(status) = patch.status {
            sets.push("status = ");
            sets.push_bind_unseparated(status);
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.build().execute(&self.pool).await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Appointment not found"))
    }

    /// Hard delete; linked reschedule rows go with it via FK cascade.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Append one audit row. Runs before the appointment's own date update;
    /// a crash between the two leaves an audit row with no matching date
    /// change, which is acceptable for this domain.
    pub async fn append_reschedule(
        &self,
        appointment_id: i64,
        old_date: &str,
        new_date: &str,
        reason: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO appointment_reschedules (appointment_id, old_date, new_date, reason, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(appointment_id)
        .bind(old_date)
        .bind(new_date)
        .bind(reason)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn reschedules(&self, appointment_id: i64) -> Result<Vec<RescheduleRecord>> {
        let records = sqlx::query_as::<_, RescheduleRecord>(
            "SELECT * FROM appointment_reschedules WHERE appointment_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(appointment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM appointments")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_by_status(&self, status: AppointmentStatus) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM appointments WHERE status = ?")
                .bind(status)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    pub async fn count_for_clinic(&self, clinic_id: i64) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM appointments WHERE clinic_id = ?")
                .bind(clinic_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    pub async fn count_for_clinic_by_status(
        &self,
        clinic_id: i64,
        status: AppointmentStatus,
    ) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM appointments WHERE clinic_id = ? AND status = ?",
        )
        .bind(clinic_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
