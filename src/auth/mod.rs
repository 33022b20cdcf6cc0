//! Authorization gate: bearer-token verification, caller resolution, and
//! role checks.
//!
//! Verification fails closed. A bad signature, an expired claim, or a user
//! id that no longer resolves all collapse to `Unauthorized`; there is no
//! partial identity. The booking path alone uses [`MaybeCaller`], which
//! silently degrades to anonymous instead of rejecting the request.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::handlers::AppState;
use crate::models::Role;
use crate::store::UserStore;

const NOT_AUTHORIZED: &str = "Not authorized to access this route";

/// Signed claim carried by every bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub exp: i64,
    pub iat: i64,
}

/// Process-wide signing keys, built once from configuration.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiration_days: i64,
}

impl JwtKeys {
    pub fn new(secret: &str, expiration_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiration_days,
        }
    }

    pub fn issue(&self, user_id: i64) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            id: user_id,
            exp: (now + Duration::days(self.expiration_days)).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| ApiError::internal(format!("failed to sign token: {err}")))
    }

    /// Decode and validate a token. Signature mismatch and expiry both come
    /// back as `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ApiError::unauthorized(NOT_AUTHORIZED))
    }
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("expiration_days", &self.expiration_days)
            .finish_non_exhaustive()
    }
}

/// Identity resolved from a valid credential: the user row minus the secret,
/// flattened to what the gates need.
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub clinic_id: Option<i64>,
}

impl Caller {
    pub fn require_role(&self, allowed: &[Role]) -> Result<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            let roles: Vec<&str> = allowed
                .iter()
                .map(|role| match role {
                    Role::User => "user",
                    Role::Clinic => "clinic",
                    Role::Admin => "admin",
                })
                .collect();
            Err(ApiError::forbidden(format!(
                "Access denied. Required role: {}",
                roles.join(" or ")
            )))
        }
    }

    pub fn is_elevated(&self) -> bool {
        self.role.is_elevated()
    }

    /// Clinic role plus a clinic affiliation, or nothing.
    pub fn clinic_affiliation(&self) -> Result<i64> {
        self.require_role(&[Role::Clinic])?;
        self.clinic_id
            .ok_or_else(|| ApiError::invalid("clinic_id", "User is not associated with a clinic"))
    }
}

/// Resolve a bearer token to a caller. A token that verifies but points at a
/// deleted user is just as unauthenticated as a forged one.
pub async fn resolve_caller(jwt: &JwtKeys, users: &UserStore, token: &str) -> Result<Caller> {
    let claims = jwt.verify(token)?;
    let user = users
        .find_by_id(claims.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized(NOT_AUTHORIZED))?;
    Ok(Caller {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        clinic_id: user.clinic_id,
    })
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token =
            bearer_token(parts).ok_or_else(|| ApiError::unauthorized(NOT_AUTHORIZED))?;
        resolve_caller(&state.jwt, &state.users, &token).await
    }
}

/// Optional caller for routes that accept anonymous requests. An invalid or
/// expired token degrades to `None` rather than surfacing a failure.
#[derive(Debug, Clone)]
pub struct MaybeCaller(pub Option<Caller>);

impl FromRequestParts<AppState> for MaybeCaller {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(MaybeCaller(
            Caller::from_request_parts(parts, state).await.ok(),
        ))
    }
}
