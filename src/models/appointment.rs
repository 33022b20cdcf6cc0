use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::Result;
use crate::models::validate::FieldValidator;

/// Appointment lifecycle states. The transition graph is deliberately
/// unconstrained: clinic staff may move an appointment from any status to
/// any other, including back to `pending` from `completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Pending
    }
}

/// Appointment row. `user_id` is null for anonymous bookings; `clinic_id`
/// is resolved at booking time from the free-text `clinic` field when an
/// exact-name match exists, and null otherwise. The requester's contact
/// fields are captured redundantly at booking time, independent of any user
/// record.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Appointment {
    pub id: i64,
    pub user_id: Option<i64>,
    pub clinic_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub area: String,
    pub clinic: String,
    pub department: String,
    pub date: String,
    pub message: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

/// Append-only reschedule audit row, cascade-deleted with its appointment.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RescheduleRecord {
    pub id: i64,
    pub appointment_id: i64,
    pub old_date: String,
    pub new_date: String,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct BookAppointmentRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub area: String,
    pub clinic: String,
    pub department: String,
    pub date: String,
    pub message: Option<String>,
}

impl BookAppointmentRequest {
    pub fn validate(&self) -> Result<()> {
        let mut v = FieldValidator::new();
        v.require("name", &self.name, "Name is required")
            .require_email("email", &self.email)
            .require("phone", &self.phone, "Phone number is required")
            .require("area", &self.area, "Area is required")
            .require("clinic", &self.clinic, "Clinic is required")
            .require("department", &self.department, "Department is required")
            .require("date", &self.date, "Date is required");
        v.finish()
    }
}

/// Partial appointment update. The date field is intentionally not
/// validated here; only the reschedule path checks calendar validity.
#[derive(Debug, Default, Deserialize)]
pub struct AppointmentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub area: Option<String>,
    pub clinic: Option<String>,
    pub department: Option<String>,
    pub date: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub message: Option<Option<String>>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.area.is_none()
            && self.clinic.is_none()
            && self.department.is_none()
            && self.date.is_none()
            && self.message.is_none()
            && self.status.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    pub date: String,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: AppointmentStatus,
}

/// Per-clinic appointment counters for the clinic dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicStats {
    pub total_appointments: i64,
    pub pending_appointments: i64,
    pub confirmed_appointments: i64,
    pub cancelled_appointments: i64,
}

/// System-wide counters for the admin dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: i64,
    pub total_clinics: i64,
    pub total_appointments: i64,
    pub pending_appointments: i64,
}
