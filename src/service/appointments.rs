use chrono::{DateTime, Local, NaiveDate};
use tracing::{info, warn};

use crate::auth::Caller;
use crate::error::{ApiError, Result};
use crate::models::{
    Appointment, AppointmentPatch, AppointmentStatus, BookAppointmentRequest, ClinicStats,
    RescheduleRequest,
};
use crate::store::{AppointmentStore, ClinicStore};

/// Appointment lifecycle orchestrator: booking, role/ownership-gated reads
/// and edits, cancellation, reschedule bookkeeping, and clinic status
/// transitions. Holds no persistent state of its own.
#[derive(Debug, Clone)]
pub struct AppointmentService {
    appointments: AppointmentStore,
    clinics: ClinicStore,
}

impl AppointmentService {
    pub fn new(appointments: AppointmentStore, clinics: ClinicStore) -> Self {
        Self {
            appointments,
            clinics,
        }
    }

    /// Book an appointment, anonymously or on behalf of `caller`.
    ///
    /// The free-text clinic name is resolved against the directory by exact
    /// match; no match leaves `clinic_id` null without failing the booking,
    /// and the literal text is stored either way.
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
        caller: Option<&Caller>,
    ) -> Result<Appointment> {
        request.validate()?;

        let user_id = caller.map(|caller| caller.id);
        let clinic_id = self
            .clinics
            .find_by_name(&request.clinic)
            .await?
            .map(|clinic| clinic.id);

        let appointment = self.appointments.create(user_id, clinic_id, &request).await?;
        info!(
            "Appointment {} booked for {} (user: {:?}, clinic: {:?})",
            appointment.id, appointment.email, user_id, clinic_id
        );
        Ok(appointment)
    }

    /// Single-record read. Owned appointments are visible to their owner and
    /// to elevated roles; anonymous appointments are open to any caller.
    pub async fn get(&self, id: i64, caller: &Caller) -> Result<Appointment> {
        let appointment = self.load(id).await?;
        Self::ensure_owner(&appointment, caller, "Not authorized to access this appointment")?;
        Ok(appointment)
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Appointment>> {
        self.appointments.find_by_user(user_id).await
    }

    pub async fn list_for_clinic(&self, clinic_id: i64) -> Result<Vec<Appointment>> {
        self.appointments.find_by_clinic(clinic_id).await
    }

    pub async fn list_all(&self) -> Result<Vec<Appointment>> {
        self.appointments.find_all().await
    }

    /// General field edit. Dates are deliberately not validated on this
    /// path; only the reschedule path checks calendar validity.
    pub async fn update(
        &self,
        id: i64,
        patch: AppointmentPatch,
        caller: &Caller,
    ) -> Result<Appointment> {
        let appointment = self.load(id).await?;
        Self::ensure_owner(&appointment, caller, "Not authorized to update this appointment")?;
        self.appointments.update(id, &patch).await
    }

    /// Owner cancellation: hard delete, reschedule history goes with it.
    pub async fn cancel(&self, id: i64, caller: &Caller) -> Result<()> {
        let appointment = self.load(id).await?;
        Self::ensure_owner(&appointment, caller, "Not authorized to delete this appointment")?;
        self.appointments.delete(id).await?;
        info!("Appointment {} cancelled", id);
        Ok(())
    }

    /// Reschedule to a new date, recording the old one in the audit trail
    /// and forcing status back to `confirmed` regardless of its prior value.
    ///
    /// Two concurrent reschedules of one row are not coordinated here: both
    /// audit rows persist and the date is last-write-wins.
    pub async fn reschedule(
        &self,
        id: i64,
        request: RescheduleRequest,
        caller: &Caller,
    ) -> Result<Appointment> {
        if request.date.trim().is_empty() {
            return Err(ApiError::invalid(
                "date",
                "New date is required to reschedule the appointment",
            ));
        }
        let new_date = parse_calendar_date(&request.date)
            .ok_or_else(|| ApiError::invalid("date", "Invalid date format"))?;

        // Date-only comparison; rescheduling to today is allowed.
        let today = Local::now().date_naive();
        if new_date < today {
            return Err(ApiError::invalid(
                "date",
                "New appointment date must be today or in the future",
            ));
        }

        let appointment = self.load(id).await?;
        Self::ensure_owner(
            &appointment,
            caller,
            "Not authorized to reschedule this appointment",
        )?;

        // Audit first, then the row update. Both writes are one logical
        // unit; the storage layer's serialization is the only net under a
        // crash between them.
        self.appointments
            .append_reschedule(
                appointment.id,
                &appointment.date,
                &request.date,
                request.reason.as_deref(),
            )
            .await?;

        let patch = AppointmentPatch {
            date: Some(request.date.clone()),
            status: Some(AppointmentStatus::Confirmed),
            ..AppointmentPatch::default()
        };
        let updated = self.appointments.update(id, &patch).await?;
        info!(
            "Appointment {} rescheduled from {} to {}",
            id, appointment.date, updated.date
        );
        Ok(updated)
    }

    /// Clinic-staff status transition. The caller must hold the clinic role
    /// and be affiliated with exactly the appointment's clinic; the graph
    /// itself is unconstrained (any status to any status).
    pub async fn update_status(
        &self,
        id: i64,
        status: AppointmentStatus,
        caller: &Caller,
    ) -> Result<Appointment> {
        let clinic_id = caller.clinic_affiliation()?;

        let appointment = self.load(id).await?;
        if appointment.clinic_id != Some(clinic_id) {
            warn!(
                "Clinic {} attempted status update on appointment {} owned by clinic {:?}",
                clinic_id, id, appointment.clinic_id
            );
            return Err(ApiError::forbidden(
                "Not authorized to update this appointment",
            ));
        }

        let patch = AppointmentPatch {
            status: Some(status),
            ..AppointmentPatch::default()
        };
        self.appointments.update(id, &patch).await
    }

    pub async fn clinic_stats(&self, clinic_id: i64) -> Result<ClinicStats> {
        Ok(ClinicStats {
            total_appointments: self.appointments.count_for_clinic(clinic_id).await?,
            pending_appointments: self
                .appointments
                .count_for_clinic_by_status(clinic_id, AppointmentStatus::Pending)
                .await?,
            confirmed_appointments: self
                .appointments
                .count_for_clinic_by_status(clinic_id, AppointmentStatus::Confirmed)
                .await?,
            cancelled_appointments: self
                .appointments
                .count_for_clinic_by_status(clinic_id, AppointmentStatus::Cancelled)
                .await?,
        })
    }

    /// Ledger-wide counters for the admin dashboard: every appointment,
    /// and the pending subset.
    pub async fn ledger_totals(&self) -> Result<(i64, i64)> {
        Ok((
            self.appointments.count().await?,
            self.appointments
                .count_by_status(AppointmentStatus::Pending)
                .await?,
        ))
    }

    async fn load(&self, id: i64) -> Result<Appointment> {
        self.appointments
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Appointment not found"))
    }

    /// Owned rows are gated to the owner or an elevated role; anonymous
    /// rows (null `user_id`) carry no ownership barrier.
    fn ensure_owner(appointment: &Appointment, caller: &Caller, message: &str) -> Result<()> {
        match appointment.user_id {
            Some(owner) if owner != caller.id && !caller.is_elevated() => {
                Err(ApiError::forbidden(message))
            }
            _ => Ok(()),
        }
    }
}

/// A reschedule date must be a real calendar date: `YYYY-MM-DD`, or an
/// RFC 3339 datetime truncated to its date.
fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
