use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::Result;
use crate::models::validate::FieldValidator;

/// Closed role set. Stored lowercase in the `role` column; exhaustive
/// matching replaces stringly-typed role comparisons at every gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    User,
    Clinic,
    Admin,
}

impl Role {
    /// `clinic` and `admin`, as opposed to plain `user`/anonymous.
    pub fn is_elevated(self) -> bool {
        matches!(self, Role::Clinic | Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// Full user row, including the bcrypt hash. Only the credential store and
/// the login/password flows ever see this; everything else gets
/// [`PublicUser`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: Role,
    pub clinic_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// User row with the secret stripped.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub clinic_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            clinic_id: user.clinic_id,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    pub clinic_id: Option<i64>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<()> {
        let mut v = FieldValidator::new();
        v.require("name", &self.name, "Name is required")
            .require_email("email", &self.email)
            .min_len(
                "password",
                &self.password,
                6,
                "Password must be at least 6 characters",
            );
        // Clinic affiliation is meaningful only for the clinic role, and
        // required for it.
        if self.role == Some(Role::Clinic) && self.clinic_id.is_none() {
            v.push("clinic_id", "Clinic ID is required for clinic role");
        }
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<()> {
        let mut v = FieldValidator::new();
        v.require_email("email", &self.email)
            .require("password", &self.password, "Password is required");
        v.finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub phone: Option<Option<String>>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<()> {
        let mut v = FieldValidator::new();
        if let Some(name) = &self.name {
            v.require("name", name, "Name cannot be empty");
        }
        if let Some(email) = &self.email {
            v.require_email("email", email);
        }
        v.finish()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<()> {
        let mut v = FieldValidator::new();
        v.require(
            "current_password",
            &self.current_password,
            "Current password is required",
        )
        .min_len(
            "new_password",
            &self.new_password,
            6,
            "New password must be at least 6 characters",
        );
        v.finish()
    }
}

/// Token plus the public identity it belongs to, returned by register/login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}
