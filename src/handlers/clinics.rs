use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, Result};
use crate::handlers::AppState;
use crate::models::ClinicFilter;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// Public directory listing: active clinics only, optionally filtered by
/// category, ordered by name.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>> {
    let filter = ClinicFilter {
        category: query.category,
        active_only: Some(true),
    };
    let clinics = state.clinics.list(&filter).await?;
    Ok(Json(json!({
        "success": true,
        "count": clinics.len(),
        "clinics": clinics,
    })))
}

pub async fn get_one(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let clinic = state
        .clinics
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Clinic not found"))?;
    Ok(Json(json!({ "success": true, "clinic": clinic })))
}
