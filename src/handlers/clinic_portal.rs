//! Clinic-staff portal: appointments, stats, and status transitions scoped
//! to the clinic the caller is affiliated with.

use axum::extract::{Path, State};
use axum::response::Json;
use serde_json::{json, Value};

use crate::auth::Caller;
use crate::error::{ApiError, Result};
use crate::handlers::AppState;
use crate::models::StatusUpdateRequest;

pub async fn appointments(State(state): State<AppState>, caller: Caller) -> Result<Json<Value>> {
    let clinic_id = caller.clinic_affiliation()?;
    let appointments = state.appointments.list_for_clinic(clinic_id).await?;
    Ok(Json(json!({
        "success": true,
        "count": appointments.len(),
        "appointments": appointments,
    })))
}

pub async fn stats(State(state): State<AppState>, caller: Caller) -> Result<Json<Value>> {
    let clinic_id = caller.clinic_affiliation()?;
    let stats = state.appointments.clinic_stats(clinic_id).await?;
    let clinic = state
        .clinics
        .find_by_id(clinic_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Clinic not found"))?;
    Ok(Json(json!({
        "success": true,
        "stats": stats,
        "clinic": {
            "id": clinic.id,
            "name": clinic.name,
            "category": clinic.category,
        },
    })))
}

pub async fn profile(State(state): State<AppState>, caller: Caller) -> Result<Json<Value>> {
    let clinic_id = caller.clinic_affiliation()?;
    let clinic = state
        .clinics
        .find_by_id(clinic_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Clinic not found"))?;
    Ok(Json(json!({
        "success": true,
        "clinic": clinic,
        "user": {
            "id": caller.id,
            "name": caller.name,
            "email": caller.email,
        },
    })))
}

pub async fn update_status(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<Value>> {
    let appointment = state
        .appointments
        .update_status(id, request.status, &caller)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Appointment status updated successfully",
        "appointment": appointment,
    })))
}
