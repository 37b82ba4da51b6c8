//! Administrator accounts.

use crate::auth::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::Admin;
use crate::store::{qualified_table, tables};
use sqlx::PgPool;

pub struct AdminService;

impl AdminService {
    pub async fn authenticate(pool: &PgPool, username: &str, password: &str) -> Result<Admin, AppError> {
        let admin: Option<Admin> = sqlx::query_as(&format!(
            "SELECT * FROM {} WHERE username = $1",
            qualified_table(tables::ADMINS)
        ))
        .bind(username.trim())
        .fetch_optional(pool)
        .await?;
        let invalid = || AppError::Unauthorized("Invalid credentials".into());
        let admin = admin.ok_or_else(invalid)?;
        if !verify_password(&admin.password, password)? {
            return Err(invalid());
        }
        Ok(admin)
    }

    pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Admin>, AppError> {
        let admin: Option<Admin> = sqlx::query_as(&format!("SELECT * FROM {} WHERE id = $1", qualified_table(tables::ADMINS)))
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(admin)
    }

    /// Create the admin if the username is free. Existing accounts are left untouched.
    pub async fn ensure(pool: &PgPool, username: &str, password: &str) -> Result<(), AppError> {
        let hash = hash_password(password)?;
        let created = sqlx::query(&format!(
            "INSERT INTO {} (username, password) VALUES ($1, $2) ON CONFLICT (username) DO NOTHING",
            qualified_table(tables::ADMINS)
        ))
        .bind(username)
        .bind(&hash)
        .execute(pool)
        .await?;
        if created.rows_affected() > 0 {
            tracing::info!(username, "admin account created");
        }
        Ok(())
    }
}
