//! Apply the catalog schema: CREATE SCHEMA, tables with keys and checks, and indexes.
//! Order follows foreign-key dependencies (regions, admins, sellers, categories, products, images, reviews).
//! Every statement is idempotent so the server can run it on each start.

use crate::error::AppError;
use crate::store::{catalog_schema, qualified_table, tables};
use sqlx::PgPool;

/// One CREATE TABLE per table, parents before children.
fn table_ddl() -> Vec<String> {
    let t = qualified_table;
    vec![
        format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL
            )"#,
            t(tables::PROVINCES)
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                province_id TEXT NOT NULL REFERENCES {} (id),
                name TEXT NOT NULL
            )"#,
            t(tables::REGENCIES),
            t(tables::PROVINCES)
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                regency_id TEXT NOT NULL REFERENCES {} (id),
                name TEXT NOT NULL
            )"#,
            t(tables::DISTRICTS),
            t(tables::REGENCIES)
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                district_id TEXT NOT NULL REFERENCES {} (id),
                name TEXT NOT NULL
            )"#,
            t(tables::VILLAGES),
            t(tables::DISTRICTS)
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"#,
            t(tables::ADMINS)
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                store_name TEXT NOT NULL,
                description TEXT NOT NULL,
                pic_name TEXT NOT NULL,
                pic_hp TEXT NOT NULL UNIQUE,
                pic_email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                address TEXT NOT NULL,
                pic_rt INTEGER NOT NULL,
                pic_rw INTEGER NOT NULL,
                pic_province TEXT NOT NULL,
                pic_city TEXT NOT NULL,
                pic_district TEXT NOT NULL,
                pic_village TEXT NOT NULL,
                pic_no_ktp TEXT NOT NULL,
                pic_url_ktp TEXT NOT NULL,
                pic_url_photo TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'PENDING',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                verified_at TIMESTAMPTZ,
                CONSTRAINT sellers_status_check CHECK (status IN ('PENDING', 'APPROVED', 'CANCELLED'))
            )"#,
            t(tables::SELLERS)
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                slug TEXT NOT NULL UNIQUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"#,
            t(tables::CATEGORIES)
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                slug TEXT NOT NULL UNIQUE,
                stock INTEGER NOT NULL,
                price BIGINT NOT NULL,
                rating DOUBLE PRECISION NOT NULL DEFAULT 0,
                seller_id BIGINT NOT NULL REFERENCES {} (id) ON DELETE CASCADE,
                category_id BIGINT NOT NULL REFERENCES {} (id),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT products_stock_check CHECK (stock >= 0),
                CONSTRAINT products_price_check CHECK (price >= 0),
                CONSTRAINT products_rating_check CHECK (rating >= 0 AND rating <= 5)
            )"#,
            t(tables::PRODUCTS),
            t(tables::SELLERS),
            t(tables::CATEGORIES)
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                image_url TEXT NOT NULL,
                product_id BIGINT NOT NULL REFERENCES {} (id) ON DELETE CASCADE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"#,
            t(tables::PRODUCT_IMAGES),
            t(tables::PRODUCTS)
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                no_hp TEXT NOT NULL,
                email TEXT NOT NULL,
                rating INTEGER NOT NULL,
                comment TEXT,
                province TEXT NOT NULL DEFAULT '',
                product_id BIGINT NOT NULL REFERENCES {} (id) ON DELETE CASCADE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT reviews_rating_check CHECK (rating BETWEEN 1 AND 5)
            )"#,
            t(tables::REVIEWS),
            t(tables::PRODUCTS)
        ),
    ]
}

/// (index name, table, column list). Names are unqualified; PostgreSQL puts them in the table's schema.
const INDEXES: &[(&str, &str, &str)] = &[
    ("regencies_province_idx", tables::REGENCIES, "province_id"),
    ("districts_regency_idx", tables::DISTRICTS, "regency_id"),
    ("villages_district_idx", tables::VILLAGES, "district_id"),
    ("sellers_status_idx", tables::SELLERS, "status, pic_province, pic_city"),
    ("products_seller_idx", tables::PRODUCTS, "seller_id"),
    ("products_category_idx", tables::PRODUCTS, "category_id"),
    ("product_images_product_idx", tables::PRODUCT_IMAGES, "product_id, created_at"),
    ("product_images_url_idx", tables::PRODUCT_IMAGES, "image_url"),
    ("reviews_product_idx", tables::REVIEWS, "product_id, created_at"),
];

/// Create the schema, tables and indexes if missing.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    let schema = catalog_schema();
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
        .execute(pool)
        .await?;

    let mut tx = pool.begin().await?;
    for ddl in table_ddl() {
        sqlx::query(&ddl).execute(&mut *tx).await?;
    }
    for (name, table, columns) in INDEXES {
        let sql = format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
            name,
            qualified_table(table),
            columns
        );
        sqlx::query(&sql).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::info!(schema, "catalog schema up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_created_parent_first() {
        let ddl = table_ddl();
        let pos = |table: &str| {
            let needle = format!("EXISTS {} (", qualified_table(table));
            ddl.iter().position(|s| s.contains(&needle)).unwrap()
        };
        assert!(pos(tables::PROVINCES) < pos(tables::REGENCIES));
        assert!(pos(tables::SELLERS) < pos(tables::PRODUCTS));
        assert!(pos(tables::CATEGORIES) < pos(tables::PRODUCTS));
        assert!(pos(tables::PRODUCTS) < pos(tables::PRODUCT_IMAGES));
        assert!(pos(tables::PRODUCTS) < pos(tables::REVIEWS));
    }

    #[test]
    fn dependents_cascade_from_products() {
        let ddl = table_ddl().join("\n");
        let products = qualified_table(tables::PRODUCTS);
        assert_eq!(
            ddl.matches(&format!("REFERENCES {} (id) ON DELETE CASCADE", products)).count(),
            2
        );
    }
}
