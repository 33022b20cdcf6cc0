//! Admin surface: global listings, dashboard stats, and clinic record
//! management. Every handler requires the admin role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::Caller;
use crate::error::{ApiError, Result};
use crate::handlers::AppState;
use crate::models::{AdminStats, ClinicFilter, ClinicPatch, CreateClinicRequest, Role};

pub async fn appointments(State(state): State<AppState>, caller: Caller) -> Result<Json<Value>> {
    caller.require_role(&[Role::Admin])?;
    let appointments = state.appointments.list_all().await?;
    Ok(Json(json!({
        "success": true,
        "count": appointments.len(),
        "appointments": appointments,
    })))
}

pub async fn users(State(state): State<AppState>, caller: Caller) -> Result<Json<Value>> {
    caller.require_role(&[Role::Admin])?;
    let users = state.users.list().await?;
    Ok(Json(json!({
        "success": true,
        "count": users.len(),
        "users": users,
    })))
}

pub async fn stats(State(state): State<AppState>, caller: Caller) -> Result<Json<Value>> {
    caller.require_role(&[Role::Admin])?;
    let (total_appointments, pending_appointments) = state.appointments.ledger_totals().await?;
    let stats = AdminStats {
        total_users: state.users.count().await?,
        total_clinics: state.clinics.count().await?,
        total_appointments,
        pending_appointments,
    };
    Ok(Json(json!({ "success": true, "stats": stats })))
}

/// Admin listing includes inactive clinics.
pub async fn list_clinics(State(state): State<AppState>, caller: Caller) -> Result<Json<Value>> {
    caller.require_role(&[Role::Admin])?;
    let clinics = state.clinics.list(&ClinicFilter::default()).await?;
    Ok(Json(json!({
        "success": true,
        "count": clinics.len(),
        "clinics": clinics,
    })))
}

pub async fn create_clinic(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<CreateClinicRequest>,
) -> Result<impl IntoResponse> {
    caller.require_role(&[Role::Admin])?;
    request.validate()?;
    let clinic = state.clinics.create(&request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Clinic created successfully",
            "clinic": clinic,
        })),
    ))
}

pub async fn update_clinic(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    Json(patch): Json<ClinicPatch>,
) -> Result<Json<Value>> {
    caller.require_role(&[Role::Admin])?;
    let clinic = state.clinics.update(id, &patch).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Clinic updated successfully",
        "clinic": clinic,
    })))
}

pub async fn delete_clinic(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    caller.require_role(&[Role::Admin])?;
    if !state.clinics.delete(id).await? {
        return Err(ApiError::not_found("Clinic not found"));
    }
    Ok(Json(json!({
        "success": true,
        "message": "Clinic deleted successfully",
    })))
}

pub async fn clinic_appointments(
    State(state): State<AppState>,
    caller: Caller,
    Path(clinic_id): Path<i64>,
) -> Result<Json<Value>> {
    caller.require_role(&[Role::Admin])?;
    let appointments = state.appointments.list_for_clinic(clinic_id).await?;
    Ok(Json(json!({
        "success": true,
        "count": appointments.len(),
        "appointments": appointments,
    })))
}
