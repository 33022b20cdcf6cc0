use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use sqlx::QueryBuilder;

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::{Clinic, ClinicFilter, ClinicPatch, CreateClinicRequest};

/// Clinic directory. Name uniqueness is enforced here; deleting a clinic
/// nullifies any user or appointment reference through the FK policy, not
/// through application code.
#[derive(Debug, Clone)]
pub struct ClinicStore {
    pool: SqlitePool,
}

impl ClinicStore {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn create(&self, request: &CreateClinicRequest) -> Result<Clinic> {
        let result = sqlx::query(
            "INSERT INTO clinics (name, category, description, address, phone, email, image, rating, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(request.name.trim())
        .bind(request.category.trim())
        .bind(&request.description)
        .bind(&request.address)
        .bind(&request.phone)
        .bind(&request.email)
        .bind(&request.image)
        .bind(request.rating.unwrap_or(0.0))
        .bind(request.is_active.unwrap_or(true))
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        let result = match result {
            Ok(result) => result,
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                return Err(ApiError::conflict("A clinic with this name already exists"));
            }
            Err(err) => return Err(err.into()),
        };

        self.find_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| ApiError::internal("clinic row missing after insert"))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Clinic>> {
        let clinic = sqlx::query_as::<_, Clinic>("SELECT * FROM clinics WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(clinic)
    }

    /// Exact match, case-sensitive as stored.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Clinic>> {
        let clinic = sqlx::query_as::<_, Clinic>("SELECT * FROM clinics WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(clinic)
    }

    /// Clinics ordered by name ascending, optionally restricted by category
    /// and/or active flag.
    pub async fn list(&self, filter: &ClinicFilter) -> Result<Vec<Clinic>> {
        let mut builder = QueryBuilder::new("SELECT * FROM clinics WHERE 1=1");
        if let Some(category) = &filter.category {
            builder.push(" AND category = ");
            builder.push_bind(category);
        }
        if let Some(active) = filter.active_only {
            if active {
                builder.push(" AND is_active = 1");
            }
        }
        builder.push(" ORDER BY name ASC");

        let clinics = builder
            .build_query_as::<Clinic>()
            .fetch_all(&self.pool)
            .await?;
        Ok(clinics)
    }

    /// Partial update; an empty patch returns the current row unchanged.
    pub async fn update(&self, id: i64, patch: &ClinicPatch) -> Result<Clinic> {
        if patch.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| ApiError::not_found("Clinic not found"));
        }

        let mut builder = QueryBuilder::new("UPDATE clinics SET ");
        let mut sets = builder.separated(", ");
        if let Some(name) = &patch.name {
            sets.push("name = ");
            sets.push_bind_unseparated(name.trim());
        }
        if let Some(category) = &patch.category {
            sets.push("category = ");
            sets.push_bind_unseparated(category.trim());
        }
        if let Some(description) = &patch.description {
            sets.push("description = ");
            sets.push_bind_unseparated(description.clone());
        }
        if let Some(address) = &patch.address {
            sets.push("address = ");
            sets.push_bind_unseparated(address.clone());
        }
        if let Some(phone) = &patch.phone {
            sets.push("phone = ");
            sets.push_bind_unseparated(phone.clone());
        }
        if let Some(email) = &patch.email {
            sets.push("email = ");
            sets.push_bind_unseparated(email.clone());
        }
        if let Some(image) = &patch.image {
            sets.push("image = ");
            sets.push_bind_unseparated(image.clone());
        }
        if let Some(rating) = patch.rating {
            sets.push("rating = ");
            sets.push_bind_unseparated(rating);
        }
        if let Some(is_active) = patch.is_active {
            sets.push("is_active = ");
            sets.push_bind_unseparated(is_active);
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id);

        let result = builder.build().execute(&self.pool).await;
        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                return Err(ApiError::conflict("A clinic with this name already exists"));
            }
            Err(err) => return Err(err.into()),
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Clinic not found"))
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM clinics WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clinics")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
