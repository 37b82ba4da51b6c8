//! Products: seller-scoped management and the public catalog.

use crate::error::AppError;
use crate::models::{Category, NewProduct, Product, ProductDetail, ProductImage, ProductUpdate, Review};
use crate::sql::{select_products, update, PgBindValue, ProductFilter, PRODUCT_COLUMNS};
use crate::storage::{delete_orphans, ObjectStorage};
use crate::store::{qualified_table, tables};
use rand::Rng;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;

const SLUG_ATTEMPTS: usize = 5;

pub struct ProductService;

/// Lowercase name with spaces turned into dashes, immediately followed by the numeric suffix.
pub fn make_slug(name: &str, suffix: u32) -> String {
    format!("{}{}", name.trim().replace(' ', "-").to_lowercase(), suffix)
}

fn random_suffix() -> u32 {
    rand::thread_rng().gen_range(1..=100_000)
}

fn not_found() -> AppError {
    AppError::NotFound("Product not found".into())
}

/// Uploaded keys are prefixed with the uploader's id; a seller may only attach their own.
pub fn ensure_own_keys(seller_id: i64, keys: &[String]) -> Result<(), AppError> {
    let prefix = format!("{}/", seller_id);
    if keys.iter().any(|k| !k.starts_with(&prefix)) {
        return Err(AppError::invalid("imageKeys", "Image key does not belong to this seller"));
    }
    Ok(())
}

impl ProductService {
    /// Create a product and its images in one transaction.
    pub async fn create(pool: &PgPool, seller_id: i64, input: NewProduct) -> Result<ProductDetail, AppError> {
        ensure_own_keys(seller_id, &input.image_keys)?;
        let products = qualified_table(tables::PRODUCTS);
        let mut tx = pool.begin().await?;

        Self::ensure_name_free(&mut tx, seller_id, &input.name, None).await?;
        Self::ensure_category(&mut tx, input.category_id).await?;

        let mut slug = make_slug(&input.name, random_suffix());
        for _ in 1..SLUG_ATTEMPTS {
            let taken: bool = sqlx::query_scalar(&format!("SELECT EXISTS(SELECT 1 FROM {} WHERE slug = $1)", products))
                .bind(&slug)
                .fetch_one(&mut *tx)
                .await?;
            if !taken {
                break;
            }
            slug = make_slug(&input.name, random_suffix());
        }

        let product: Product = sqlx::query_as(&format!(
            r#"INSERT INTO {} (name, description, slug, stock, price, seller_id, category_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *"#,
            products
        ))
        .bind(&input.name)
        .bind(input.description.as_deref().unwrap_or(""))
        .bind(&slug)
        .bind(input.stock)
        .bind(input.price)
        .bind(seller_id)
        .bind(input.category_id)
        .fetch_one(&mut *tx)
        .await?;
        Self::insert_images(&mut tx, product.id, &input.image_keys).await?;
        tx.commit().await?;

        tracing::info!(product_id = product.id, seller_id, slug = %product.slug, "product created");
        let mut details = Self::with_details(pool, vec![product]).await?;
        details.pop().ok_or_else(not_found)
    }

    /// The seller's own products, newest first.
    pub async fn list_for_seller(
        pool: &PgPool,
        seller_id: i64,
        mut filter: ProductFilter,
    ) -> Result<Vec<ProductDetail>, AppError> {
        filter.seller_id = Some(seller_id);
        filter.approved_only = false;
        let q = select_products(&filter);
        let products: Vec<Product> = q.query_as::<Product>().fetch_all(pool).await?;
        Self::with_details(pool, products).await
    }

    pub async fn get_for_seller(pool: &PgPool, seller_id: i64, slug: &str) -> Result<ProductDetail, AppError> {
        let product: Option<Product> = sqlx::query_as(&format!(
            "SELECT * FROM {} WHERE slug = $1 AND seller_id = $2",
            qualified_table(tables::PRODUCTS)
        ))
        .bind(slug)
        .bind(seller_id)
        .fetch_optional(pool)
        .await?;
        let product = product.ok_or_else(not_found)?;
        let mut details = Self::with_details(pool, vec![product]).await?;
        details.pop().ok_or_else(not_found)
    }

    /// Partial update. New image keys are appended; removed keys must belong to this product and are
    /// deleted from storage once the transaction commits.
    pub async fn update(
        pool: &PgPool,
        storage: &dyn ObjectStorage,
        seller_id: i64,
        slug: &str,
        input: ProductUpdate,
    ) -> Result<ProductDetail, AppError> {
        ensure_own_keys(seller_id, &input.image_keys)?;
        let mut tx = pool.begin().await?;
        let current = Self::lock_own(&mut tx, seller_id, slug).await?;

        if let Some(name) = input.name.as_deref() {
            if name != current.name {
                Self::ensure_name_free(&mut tx, seller_id, name, Some(current.id)).await?;
            }
        }
        if let Some(category_id) = input.category_id {
            Self::ensure_category(&mut tx, category_id).await?;
        }

        let mut sets: Vec<(&'static str, PgBindValue)> = Vec::new();
        if let Some(name) = input.name {
            sets.push(("name", name.into()));
        }
        if let Some(description) = input.description {
            sets.push(("description", description.into()));
        }
        if let Some(stock) = input.stock {
            sets.push(("stock", stock.into()));
        }
        if let Some(price) = input.price {
            sets.push(("price", price.into()));
        }
        if let Some(category_id) = input.category_id {
            sets.push(("category_id", category_id.into()));
        }
        let q = update(tables::PRODUCTS, sets, vec![("id", current.id.into())]);
        let product: Product = q.query_as::<Product>().fetch_one(&mut *tx).await?;

        let removed: Vec<String> = if input.delete_image_keys.is_empty() {
            Vec::new()
        } else {
            sqlx::query_scalar(&format!(
                "DELETE FROM {} WHERE product_id = $1 AND image_url = ANY($2) RETURNING image_url",
                qualified_table(tables::PRODUCT_IMAGES)
            ))
            .bind(product.id)
            .bind(&input.delete_image_keys)
            .fetch_all(&mut *tx)
            .await?
        };
        Self::insert_images(&mut tx, product.id, &input.image_keys).await?;
        let orphans = Self::unreferenced(&mut tx, &removed).await?;
        tx.commit().await?;

        if removed.len() < input.delete_image_keys.len() {
            tracing::debug!(
                product_id = product.id,
                requested = input.delete_image_keys.len(),
                removed = removed.len(),
                "ignored image keys not owned by product"
            );
        }
        delete_orphans(storage, &orphans).await;

        let mut details = Self::with_details(pool, vec![product]).await?;
        details.pop().ok_or_else(not_found)
    }

    /// Delete the product; images and reviews go with it. Stored objects are removed after commit.
    pub async fn delete(pool: &PgPool, storage: &dyn ObjectStorage, seller_id: i64, slug: &str) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        let product = Self::lock_own(&mut tx, seller_id, slug).await?;
        let keys: Vec<String> = sqlx::query_scalar(&format!(
            "SELECT image_url FROM {} WHERE product_id = $1",
            qualified_table(tables::PRODUCT_IMAGES)
        ))
        .bind(product.id)
        .fetch_all(&mut *tx)
        .await?;
        sqlx::query(&format!("DELETE FROM {} WHERE id = $1", qualified_table(tables::PRODUCTS)))
            .bind(product.id)
            .execute(&mut *tx)
            .await?;
        let orphans = Self::unreferenced(&mut tx, &keys).await?;
        tx.commit().await?;
        tracing::info!(product_id = product.id, seller_id, images = keys.len(), "product deleted");
        delete_orphans(storage, &orphans).await;
        Ok(())
    }

    /// Products of APPROVED sellers.
    pub async fn list_public(pool: &PgPool, mut filter: ProductFilter) -> Result<Vec<ProductDetail>, AppError> {
        filter.seller_id = None;
        filter.approved_only = true;
        let q = select_products(&filter);
        let products: Vec<Product> = q.query_as::<Product>().fetch_all(pool).await?;
        Self::with_details(pool, products).await
    }

    pub async fn get_public(pool: &PgPool, slug: &str) -> Result<ProductDetail, AppError> {
        let product: Option<Product> = sqlx::query_as(&format!(
            "SELECT {} FROM {} p JOIN {} s ON s.id = p.seller_id WHERE p.slug = $1 AND s.status = 'APPROVED'",
            PRODUCT_COLUMNS,
            qualified_table(tables::PRODUCTS),
            qualified_table(tables::SELLERS)
        ))
        .bind(slug)
        .fetch_optional(pool)
        .await?;
        let product = product.ok_or_else(not_found)?;
        let mut details = Self::with_details(pool, vec![product]).await?;
        details.pop().ok_or_else(not_found)
    }

    /// Attach category, images and reviews with one query per relation.
    async fn with_details(pool: &PgPool, products: Vec<Product>) -> Result<Vec<ProductDetail>, AppError> {
        if products.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        let mut category_ids: Vec<i64> = products.iter().map(|p| p.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        let categories: Vec<Category> = sqlx::query_as(&format!(
            "SELECT * FROM {} WHERE id = ANY($1)",
            qualified_table(tables::CATEGORIES)
        ))
        .bind(&category_ids)
        .fetch_all(pool)
        .await?;
        let images: Vec<ProductImage> = sqlx::query_as(&format!(
            "SELECT * FROM {} WHERE product_id = ANY($1) ORDER BY created_at ASC, id ASC",
            qualified_table(tables::PRODUCT_IMAGES)
        ))
        .bind(&ids)
        .fetch_all(pool)
        .await?;
        let reviews: Vec<Review> = sqlx::query_as(&format!(
            "SELECT * FROM {} WHERE product_id = ANY($1) ORDER BY created_at DESC, id DESC",
            qualified_table(tables::REVIEWS)
        ))
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let categories: HashMap<i64, Category> = categories.into_iter().map(|c| (c.id, c)).collect();
        let mut images_by_product: HashMap<i64, Vec<ProductImage>> = HashMap::new();
        for image in images {
            images_by_product.entry(image.product_id).or_default().push(image);
        }
        let mut reviews_by_product: HashMap<i64, Vec<Review>> = HashMap::new();
        for review in reviews {
            reviews_by_product.entry(review.product_id).or_default().push(review);
        }
        Ok(products
            .into_iter()
            .map(|product| ProductDetail {
                category: categories.get(&product.category_id).cloned(),
                images: images_by_product.remove(&product.id).unwrap_or_default(),
                reviews: reviews_by_product.remove(&product.id).unwrap_or_default(),
                product,
            })
            .collect())
    }

    async fn lock_own(tx: &mut Transaction<'_, Postgres>, seller_id: i64, slug: &str) -> Result<Product, AppError> {
        let product: Option<Product> = sqlx::query_as(&format!(
            "SELECT * FROM {} WHERE slug = $1 AND seller_id = $2 FOR UPDATE",
            qualified_table(tables::PRODUCTS)
        ))
        .bind(slug)
        .bind(seller_id)
        .fetch_optional(&mut **tx)
        .await?;
        product.ok_or_else(not_found)
    }

    async fn ensure_name_free(
        tx: &mut Transaction<'_, Postgres>,
        seller_id: i64,
        name: &str,
        except_id: Option<i64>,
    ) -> Result<(), AppError> {
        let taken: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE seller_id = $1 AND name = $2 AND id <> COALESCE($3, 0))",
            qualified_table(tables::PRODUCTS)
        ))
        .bind(seller_id)
        .bind(name)
        .bind(except_id)
        .fetch_one(&mut **tx)
        .await?;
        if taken {
            return Err(AppError::invalid("name", "Product name already used"));
        }
        Ok(())
    }

    async fn ensure_category(tx: &mut Transaction<'_, Postgres>, category_id: i64) -> Result<(), AppError> {
        let exists: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            qualified_table(tables::CATEGORIES)
        ))
        .bind(category_id)
        .fetch_one(&mut **tx)
        .await?;
        if !exists {
            return Err(AppError::invalid("categoryId", "Category not found"));
        }
        Ok(())
    }

    /// Keys no image row refers to any more. Only these may be removed from storage.
    async fn unreferenced(tx: &mut Transaction<'_, Postgres>, keys: &[String]) -> Result<Vec<String>, AppError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let orphans: Vec<String> = sqlx::query_scalar(&format!(
            "SELECT DISTINCT k FROM UNNEST($1::text[]) AS k \
             WHERE NOT EXISTS (SELECT 1 FROM {} WHERE image_url = k)",
            qualified_table(tables::PRODUCT_IMAGES)
        ))
        .bind(keys)
        .fetch_all(&mut **tx)
        .await?;
        Ok(orphans)
    }

    async fn insert_images(tx: &mut Transaction<'_, Postgres>, product_id: i64, keys: &[String]) -> Result<(), AppError> {
        if keys.is_empty() {
            return Ok(());
        }
        sqlx::query(&format!(
            "INSERT INTO {} (image_url, product_id) SELECT key, $2 FROM UNNEST($1::text[]) AS key",
            qualified_table(tables::PRODUCT_IMAGES)
        ))
        .bind(keys)
        .bind(product_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
