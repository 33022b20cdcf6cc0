use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::{Caller, MaybeCaller};
use crate::error::Result;
use crate::handlers::AppState;
use crate::models::{AppointmentPatch, BookAppointmentRequest, RescheduleRequest};

/// Public booking. A valid bearer token binds the appointment to the
/// caller; a missing, invalid, or expired one silently produces an
/// anonymous booking instead of an error.
pub async fn book(
    State(state): State<AppState>,
    MaybeCaller(caller): MaybeCaller,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<impl IntoResponse> {
    let appointment = state.appointments.book(request, caller.as_ref()).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Appointment booked successfully",
            "appointment": appointment,
        })),
    ))
}

pub async fn list_own(State(state): State<AppState>, caller: Caller) -> Result<Json<Value>> {
    let appointments = state.appointments.list_for_user(caller.id).await?;
    Ok(Json(json!({
        "success": true,
        "count": appointments.len(),
        "appointments": appointments,
    })))
}

pub async fn get_one(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    let appointment = state.appointments.get(id, &caller).await?;
    Ok(Json(json!({ "success": true, "appointment": appointment })))
}

pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    Json(patch): Json<AppointmentPatch>,
) -> Result<Json<Value>> {
    let appointment = state.appointments.update(id, patch, &caller).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Appointment updated successfully",
        "appointment": appointment,
    })))
}

pub async fn cancel(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    state.appointments.cancel(id, &caller).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Appointment cancelled successfully",
    })))
}

pub async fn reschedule(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    Json(request): Json<RescheduleRequest>,
) -> Result<Json<Value>> {
    let appointment = state.appointments.reschedule(id, request, &caller).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Appointment rescheduled and confirmed successfully",
        "appointment": appointment,
    })))
}
