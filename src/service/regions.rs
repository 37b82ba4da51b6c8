//! Region lookup tables and the locations of approved sellers.

use crate::error::AppError;
use crate::models::Region;
use crate::store::{qualified_table, tables};
use sqlx::PgPool;

pub struct RegionService;

impl RegionService {
    pub async fn provinces(pool: &PgPool) -> Result<Vec<Region>, AppError> {
        let rows: Vec<Region> = sqlx::query_as(&format!(
            "SELECT id, name FROM {} ORDER BY name",
            qualified_table(tables::PROVINCES)
        ))
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn regencies(pool: &PgPool, province_id: &str) -> Result<Vec<Region>, AppError> {
        Self::children(pool, tables::REGENCIES, "province_id", province_id).await
    }

    pub async fn districts(pool: &PgPool, regency_id: &str) -> Result<Vec<Region>, AppError> {
        Self::children(pool, tables::DISTRICTS, "regency_id", regency_id).await
    }

    pub async fn villages(pool: &PgPool, district_id: &str) -> Result<Vec<Region>, AppError> {
        Self::children(pool, tables::VILLAGES, "district_id", district_id).await
    }

    async fn children(pool: &PgPool, table: &str, parent_column: &str, parent_id: &str) -> Result<Vec<Region>, AppError> {
        let rows: Vec<Region> = sqlx::query_as(&format!(
            "SELECT id, name FROM {} WHERE {} = $1 ORDER BY name",
            qualified_table(table),
            parent_column
        ))
        .bind(parent_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Distinct provinces of APPROVED sellers, sorted.
    pub async fn seller_provinces(pool: &PgPool) -> Result<Vec<String>, AppError> {
        let rows: Vec<String> = sqlx::query_scalar(&format!(
            "SELECT DISTINCT pic_province FROM {} WHERE status = 'APPROVED' AND pic_province <> '' ORDER BY pic_province",
            qualified_table(tables::SELLERS)
        ))
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Distinct cities of APPROVED sellers in `province`, sorted.
    pub async fn seller_cities(pool: &PgPool, province: &str) -> Result<Vec<String>, AppError> {
        let rows: Vec<String> = sqlx::query_scalar(&format!(
            "SELECT DISTINCT pic_city FROM {} WHERE status = 'APPROVED' AND pic_province = $1 AND pic_city <> '' \
             ORDER BY pic_city",
            qualified_table(tables::SELLERS)
        ))
        .bind(province)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
