//! Database bootstrap and table naming. All catalog tables live in one schema, `catalog` unless
//! configured otherwise via `CATALOG_SCHEMA`.

use crate::config::DEFAULT_SCHEMA;
use crate::error::AppError;
use sqlx::ConnectOptions;
use std::str::FromStr;
use std::sync::OnceLock;

static SCHEMA: OnceLock<String> = OnceLock::new();

/// Table names, unqualified.
pub mod tables {
    pub const ADMINS: &str = "admins";
    pub const SELLERS: &str = "sellers";
    pub const CATEGORIES: &str = "categories";
    pub const PRODUCTS: &str = "products";
    pub const PRODUCT_IMAGES: &str = "product_images";
    pub const REVIEWS: &str = "reviews";
    pub const PROVINCES: &str = "provinces";
    pub const REGENCIES: &str = "regencies";
    pub const DISTRICTS: &str = "districts";
    pub const VILLAGES: &str = "villages";
}

/// Fix the schema name for the process. First call wins; later calls are ignored with a warning.
pub fn init_schema(schema: &str) {
    if SCHEMA.set(schema.to_string()).is_err() && SCHEMA.get().map(String::as_str) != Some(schema) {
        tracing::warn!(schema, "catalog schema already initialised, ignoring");
    }
}

/// Schema name for catalog tables. Validated as an identifier when settings are loaded.
pub fn catalog_schema() -> &'static str {
    SCHEMA.get().map(String::as_str).unwrap_or(DEFAULT_SCHEMA)
}

/// Returns schema-qualified table name (e.g. "catalog.products").
pub fn qualified_table(table: &str) -> String {
    format!("{}.{}", catalog_schema(), table)
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await.map_err(AppError::Db)?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await
        .map_err(AppError::Db)?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await
            .map_err(AppError::Db)?;
    }
    Ok(())
}

/// Split a connection URL into (url of the `postgres` maintenance db, target db name).
fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url.rfind('/').ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))? + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let mut parts = path_and_query.splitn(2, '?');
    let db_name = parts.next().unwrap_or("").trim();
    let query = parts.next().map(|q| format!("?{}", q)).unwrap_or_default();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres{}", base, query), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_url() {
        let (admin, db) = parse_db_name_from_url("postgres://u:p@localhost:5432/catalog").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(db, "catalog");
    }

    #[test]
    fn keeps_query_string() {
        let (admin, db) = parse_db_name_from_url("postgres://localhost/shop?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://localhost/postgres?sslmode=disable");
        assert_eq!(db, "shop");
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("shop"), "\"shop\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn qualifies_with_default_schema() {
        assert!(qualified_table(tables::PRODUCTS).ends_with(".products"));
    }
}
