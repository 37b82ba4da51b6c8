//! Seller accounts: registration, sign-in, profile and the approval lifecycle.

use crate::auth::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::{NewSeller, Seller, SellerProfileUpdate, SellerStatus};
use crate::store::{qualified_table, tables};
use sqlx::PgPool;

pub struct SellerService;

impl SellerService {
    /// Insert a PENDING seller with a hashed password.
    pub async fn register(pool: &PgPool, input: NewSeller) -> Result<Seller, AppError> {
        let table = qualified_table(tables::SELLERS);
        let taken: Option<(String, String)> = sqlx::query_as(&format!(
            "SELECT pic_email, pic_hp FROM {} WHERE pic_email = $1 OR pic_hp = $2 LIMIT 1",
            table
        ))
        .bind(&input.pic_email)
        .bind(&input.pic_hp)
        .fetch_optional(pool)
        .await?;
        if let Some((email, _)) = taken {
            return Err(AppError::Conflict(if email == input.pic_email {
                "Email already registered".into()
            } else {
                "Phone number already registered".into()
            }));
        }

        let password = hash_password(&input.password)?;
        let seller: Seller = sqlx::query_as(&format!(
            r#"INSERT INTO {} (store_name, description, pic_name, pic_hp, pic_email, password, address,
                pic_rt, pic_rw, pic_province, pic_city, pic_district, pic_village,
                pic_no_ktp, pic_url_ktp, pic_url_photo, status)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
               RETURNING *"#,
            table
        ))
        .bind(&input.store_name)
        .bind(&input.description)
        .bind(&input.pic_name)
        .bind(&input.pic_hp)
        .bind(&input.pic_email)
        .bind(&password)
        .bind(&input.address)
        .bind(input.pic_rt)
        .bind(input.pic_rw)
        .bind(&input.pic_province)
        .bind(&input.pic_city)
        .bind(&input.pic_district)
        .bind(&input.pic_village)
        .bind(&input.pic_no_ktp)
        .bind(&input.pic_url_ktp)
        .bind(&input.pic_url_photo)
        .bind(SellerStatus::Pending.as_str())
        .fetch_one(pool)
        .await?;
        tracing::info!(seller_id = seller.id, store = %seller.store_name, "seller registered");
        Ok(seller)
    }

    pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Seller>, AppError> {
        let seller: Option<Seller> = sqlx::query_as(&format!("SELECT * FROM {} WHERE id = $1", qualified_table(tables::SELLERS)))
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(seller)
    }

    pub async fn get(pool: &PgPool, id: i64) -> Result<Seller, AppError> {
        Self::find(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Seller not found".into()))
    }

    /// Sign in with PIC e-mail or phone. Only APPROVED sellers get through.
    pub async fn authenticate(pool: &PgPool, identifier: &str, password: &str) -> Result<Seller, AppError> {
        let seller: Option<Seller> = sqlx::query_as(&format!(
            "SELECT * FROM {} WHERE pic_email = $1 OR pic_hp = $1 LIMIT 1",
            qualified_table(tables::SELLERS)
        ))
        .bind(identifier.trim())
        .fetch_optional(pool)
        .await?;
        let invalid = || AppError::Unauthorized("Invalid credentials".into());
        let seller = seller.ok_or_else(invalid)?;
        if !verify_password(&seller.password, password)? {
            return Err(invalid());
        }
        if seller.status != SellerStatus::Approved {
            return Err(AppError::Forbidden("Your account is not yet approved".into()));
        }
        Ok(seller)
    }

    pub async fn update_profile(pool: &PgPool, id: i64, input: SellerProfileUpdate) -> Result<Seller, AppError> {
        let table = qualified_table(tables::SELLERS);
        let phone_taken: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE pic_hp = $1 AND id <> $2)",
            table
        ))
        .bind(&input.pic_hp)
        .bind(id)
        .fetch_one(pool)
        .await?;
        if phone_taken {
            return Err(AppError::Conflict("Phone number already registered".into()));
        }
        let seller: Option<Seller> = sqlx::query_as(&format!(
            r#"UPDATE {} SET store_name = $1, description = $2, pic_name = $3, pic_hp = $4, address = $5,
                pic_rt = $6, pic_rw = $7, pic_province = $8, pic_city = $9, pic_district = $10,
                pic_village = $11, updated_at = NOW()
               WHERE id = $12 RETURNING *"#,
            table
        ))
        .bind(&input.store_name)
        .bind(&input.description)
        .bind(&input.pic_name)
        .bind(&input.pic_hp)
        .bind(&input.address)
        .bind(input.pic_rt)
        .bind(input.pic_rw)
        .bind(&input.pic_province)
        .bind(&input.pic_city)
        .bind(&input.pic_district)
        .bind(&input.pic_village)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        seller.ok_or_else(|| AppError::NotFound("Seller not found".into()))
    }

    /// Replace the password after checking the current one.
    pub async fn change_password(pool: &PgPool, id: i64, current: &str, new: &str) -> Result<(), AppError> {
        let seller = Self::get(pool, id).await?;
        if !verify_password(&seller.password, current)? {
            return Err(AppError::BadRequest("Current password is incorrect".into()));
        }
        let hash = hash_password(new)?;
        sqlx::query(&format!(
            "UPDATE {} SET password = $1, updated_at = NOW() WHERE id = $2",
            qualified_table(tables::SELLERS)
        ))
        .bind(&hash)
        .bind(id)
        .execute(pool)
        .await?;
        tracing::info!(seller_id = id, "seller password changed");
        Ok(())
    }

    /// Newest first, optionally restricted to one status.
    pub async fn list(pool: &PgPool, status: Option<SellerStatus>) -> Result<Vec<Seller>, AppError> {
        let table = qualified_table(tables::SELLERS);
        let sellers: Vec<Seller> = match status {
            Some(status) => {
                sqlx::query_as(&format!(
                    "SELECT * FROM {} WHERE status = $1 ORDER BY created_at DESC, id DESC",
                    table
                ))
                .bind(status.as_str())
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!("SELECT * FROM {} ORDER BY created_at DESC, id DESC", table))
                    .fetch_all(pool)
                    .await?
            }
        };
        Ok(sellers)
    }

    /// Decide a pending seller. The row is locked so concurrent decisions cannot both apply.
    pub async fn update_status(pool: &PgPool, id: i64, next: SellerStatus) -> Result<Seller, AppError> {
        let table = qualified_table(tables::SELLERS);
        let mut tx = pool.begin().await?;
        let current: Option<Seller> = sqlx::query_as(&format!("SELECT * FROM {} WHERE id = $1 FOR UPDATE", table))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let current = current.ok_or_else(|| AppError::NotFound("Seller not found".into()))?;
        if !current.status.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "Seller status cannot change from {} to {}",
                current.status, next
            )));
        }
        let seller: Seller = sqlx::query_as(&format!(
            "UPDATE {} SET status = $1, verified_at = NOW(), updated_at = NOW() WHERE id = $2 RETURNING *",
            table
        ))
        .bind(next.as_str())
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        tracing::info!(seller_id = id, from = %current.status, to = %next, "seller status changed");
        Ok(seller)
    }
}
