//! Product categories.

use crate::error::AppError;
use crate::models::{Category, CategoryUpdate, NewCategory};
use crate::sql::{update, PgBindValue};
use crate::store::{qualified_table, tables};
use sqlx::PgPool;

pub struct CategoryService;

/// Lowercase ASCII letters and digits, every other run of characters collapsed to one dash.
pub fn category_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

impl CategoryService {
    /// Newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, AppError> {
        let categories: Vec<Category> = sqlx::query_as(&format!(
            "SELECT * FROM {} ORDER BY created_at DESC, id DESC",
            qualified_table(tables::CATEGORIES)
        ))
        .fetch_all(pool)
        .await?;
        Ok(categories)
    }

    pub async fn create(pool: &PgPool, input: NewCategory) -> Result<Category, AppError> {
        let slug = Self::free_slug(pool, &input.name, None).await?;
        let category: Category = sqlx::query_as(&format!(
            "INSERT INTO {} (name, description, slug) VALUES ($1, $2, $3) RETURNING *",
            qualified_table(tables::CATEGORIES)
        ))
        .bind(input.name.trim())
        .bind(input.description.as_deref())
        .bind(&slug)
        .fetch_one(pool)
        .await?;
        tracing::info!(category_id = category.id, slug = %category.slug, "category created");
        Ok(category)
    }

    /// Renaming also regenerates the slug.
    pub async fn update(pool: &PgPool, id: i64, input: CategoryUpdate) -> Result<Category, AppError> {
        let mut sets: Vec<(&'static str, PgBindValue)> = Vec::new();
        if let Some(name) = input.name.as_deref() {
            let slug = Self::free_slug(pool, name, Some(id)).await?;
            sets.push(("name", name.trim().into()));
            sets.push(("slug", slug.into()));
        }
        if let Some(description) = input.description {
            sets.push(("description", description.into()));
        }
        let q = update(tables::CATEGORIES, sets, vec![("id", id.into())]);
        let category: Option<Category> = q.query_as::<Category>().fetch_optional(pool).await?;
        category.ok_or_else(|| AppError::NotFound("Category not found".into()))
    }

    /// Fails with 409 while products still use the category.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), AppError> {
        let in_use: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE category_id = $1)",
            qualified_table(tables::PRODUCTS)
        ))
        .bind(id)
        .fetch_one(pool)
        .await?;
        if in_use {
            return Err(AppError::Conflict("Category is still used by products".into()));
        }
        let deleted = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", qualified_table(tables::CATEGORIES)))
            .bind(id)
            .execute(pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Category not found".into()));
        }
        tracing::info!(category_id = id, "category deleted");
        Ok(())
    }

    async fn free_slug(pool: &PgPool, name: &str, except_id: Option<i64>) -> Result<String, AppError> {
        let slug = category_slug(name);
        if slug.is_empty() {
            return Err(AppError::invalid("name", "Category name must contain letters or digits"));
        }
        let taken: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE slug = $1 AND id <> COALESCE($2, 0))",
            qualified_table(tables::CATEGORIES)
        ))
        .bind(&slug)
        .bind(except_id)
        .fetch_one(pool)
        .await?;
        if taken {
            return Err(AppError::Conflict("Category already exists".into()));
        }
        Ok(slug)
    }
}
