use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::Result;
use crate::models::validate::FieldValidator;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Clinic {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub rating: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateClinicRequest {
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub rating: Option<f64>,
    pub is_active: Option<bool>,
}

impl CreateClinicRequest {
    pub fn validate(&self) -> Result<()> {
        let mut v = FieldValidator::new();
        v.require("name", &self.name, "Clinic name is required")
            .require("category", &self.category, "Category is required");
        if self.rating.is_some_and(|r| r < 0.0) {
            v.push("rating", "Rating cannot be negative");
        }
        v.finish()
    }
}

/// Partial clinic update. Only present fields are written; unspecified
/// fields are left untouched, never reset to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ClinicPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub image: Option<Option<String>>,
    pub rating: Option<f64>,
    pub is_active: Option<bool>,
}

impl ClinicPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.address.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.image.is_none()
            && self.rating.is_none()
            && self.is_active.is_none()
    }
}

/// Listing filters. `active_only` restricts to `is_active = 1`; deactivation
/// is the preferred way to hide a clinic from public listings.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ClinicFilter {
    pub category: Option<String>,
    pub active_only: Option<bool>,
}
