use tracing::info;

use crate::auth::JwtKeys;
use crate::error::{ApiError, Result};
use crate::models::{
    AuthResponse, ChangePasswordRequest, LoginRequest, PublicUser, RegisterRequest,
    UpdateProfileRequest,
};
use crate::store::UserStore;

/// Registration, login, and account maintenance.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: UserStore,
    jwt: JwtKeys,
}

impl AuthService {
    pub fn new(users: UserStore, jwt: JwtKeys) -> Self {
        Self { users, jwt }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse> {
        request.validate()?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(ApiError::conflict("User already exists with this email"));
        }

        let user = self.users.create(&request).await?;
        let token = self.jwt.issue(user.id)?;
        info!("User registered: {}", user.email);
        Ok(AuthResponse { token, user })
    }

    /// Unknown email and wrong password produce the same message, so a
    /// caller cannot probe which addresses are registered.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse> {
        request.validate()?;

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

        if !UserStore::verify_password(&request.password, &user.password)? {
            return Err(ApiError::unauthorized("Invalid email or password"));
        }

        let token = self.jwt.issue(user.id)?;
        info!("User logged in: {}", user.email);
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    pub async fn current_user(&self, user_id: i64) -> Result<PublicUser> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> Result<PublicUser> {
        request.validate()?;

        if let Some(email) = &request.email {
            if let Some(existing) = self.users.find_by_email(email).await? {
                if existing.id != user_id {
                    return Err(ApiError::conflict("Email is already taken"));
                }
            }
        }

        self.users.update_profile(user_id, &request).await
    }

    pub async fn change_password(
        &self,
        user_id: i64,
        request: ChangePasswordRequest,
    ) -> Result<()> {
        request.validate()?;

        let user = self
            .users
            .find_by_id_with_password(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        if !UserStore::verify_password(&request.current_password, &user.password)? {
            return Err(ApiError::unauthorized("Current password is incorrect"));
        }

        self.users.update_password(user_id, &request.new_password).await?;
        info!("Password changed for user {}", user_id);
        Ok(())
    }
}
