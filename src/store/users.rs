use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use sqlx::QueryBuilder;

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::{PublicUser, RegisterRequest, UpdateProfileRequest, User};

const PUBLIC_COLUMNS: &str = "id, name, email, phone, role, clinic_id, created_at";

/// Credential store. Emails are normalized to lowercase on every write and
/// lookup, so uniqueness is case-insensitive. The bcrypt hash never leaves
/// this module except through [`UserStore::find_by_id_with_password`].
#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn create(&self, request: &RegisterRequest) -> Result<PublicUser> {
        let email = normalize_email(&request.email);
        let hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)?;
        let role = request.role.unwrap_or_default();

        let result = sqlx::query(
            "INSERT INTO users (name, email, password, phone, role, clinic_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(request.name.trim())
        .bind(&email)
        .bind(&hash)
        .bind(&request.phone)
        .bind(role)
        .bind(request.clinic_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        let result = match result {
            Ok(result) => result,
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                return Err(ApiError::conflict("User already exists with this email"));
            }
            Err(err) => return Err(err.into()),
        };

        self.find_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| ApiError::internal("user row missing after insert"))
    }

    /// Full row including the password hash, for login.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<PublicUser>> {
        let user = sqlx::query_as::<_, PublicUser>(&format!(
            "SELECT {PUBLIC_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Full row including the password hash, for the change-password flow.
    pub async fn find_by_id_with_password(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub fn verify_password(plain: &str, hashed: &str) -> Result<bool> {
        Ok(bcrypt::verify(plain, hashed)?)
    }

    /// Partial profile update; an empty patch returns the current row
    /// unchanged.
    pub async fn update_profile(
        &self,
        id: i64,
        patch: &UpdateProfileRequest,
    ) -> Result<PublicUser> {
        if patch.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| ApiError::not_found("User not found"));
        }

        let mut builder = QueryBuilder::new("UPDATE users SET ");
        let mut sets = builder.separated(", ");
        if let Some(name) = &patch.name {
            sets.push("name = ");
            sets.push_bind_unseparated(name.trim());
        }
        if let Some(email) = &patch.email {
            sets.push("email = ");
            sets.push_bind_unseparated(normalize_email(email));
        }
        if let Some(phone) = &patch.phone {
            sets.push("phone = ");
            sets.push_bind_unseparated(phone.clone());
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.build().execute(&self.pool).await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    pub async fn update_password(&self, id: i64, new_password: &str) -> Result<()> {
        let hash = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)?;
        sqlx::query("UPDATE users SET password = ? WHERE id = ?")
            .bind(&hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list(&self) -> Result<Vec<PublicUser>> {
        let users = sqlx::query_as::<_, PublicUser>(&format!(
            "SELECT {PUBLIC_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
