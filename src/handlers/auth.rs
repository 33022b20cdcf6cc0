use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::Caller;
use crate::error::Result;
use crate::handlers::AppState;
use crate::models::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
};

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let response = state.auth.register(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully",
            "token": response.token,
            "user": response.user,
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let response = state.auth.login(request).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "token": response.token,
        "user": response.user,
    })))
}

pub async fn me(State(state): State<AppState>, caller: Caller) -> Result<Json<Value>> {
    let user = state.auth.current_user(caller.id).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}

/// Token invalidation is client-side; the endpoint exists so clients have a
/// uniform logout call.
pub async fn logout(_caller: Caller) -> Json<Value> {
    Json(json!({ "success": true, "message": "Logged out successfully" }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Value>> {
    let user = state.auth.update_profile(caller.id, request).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "user": user,
    })))
}

pub async fn change_password(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<Value>> {
    state.auth.change_password(caller.id, request).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Password changed successfully",
    })))
}
