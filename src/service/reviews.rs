//! Buyer reviews and the cached product rating.

use crate::error::AppError;
use crate::models::{NewReview, Review, ReviewReceipt};
use crate::store::{qualified_table, tables};
use sqlx::PgPool;

pub struct ReviewService;

impl ReviewService {
    /// Insert a review and recompute the product's rating in the same transaction.
    ///
    /// The product row is locked first, so concurrent reviews of one product apply one after another
    /// and the stored rating always equals the mean of the committed reviews.
    pub async fn add(pool: &PgPool, slug: &str, input: NewReview) -> Result<(Review, ReviewReceipt), AppError> {
        let products = qualified_table(tables::PRODUCTS);
        let mut tx = pool.begin().await?;

        let product_id: Option<i64> = sqlx::query_scalar(&format!(
            "SELECT p.id FROM {} p JOIN {} s ON s.id = p.seller_id \
             WHERE p.slug = $1 AND s.status = 'APPROVED' FOR UPDATE OF p",
            products,
            qualified_table(tables::SELLERS)
        ))
        .bind(slug)
        .fetch_optional(&mut *tx)
        .await?;
        let product_id = product_id.ok_or_else(|| AppError::NotFound("Product not found".into()))?;

        let review: Review = sqlx::query_as(&format!(
            r#"INSERT INTO {} (name, no_hp, email, rating, comment, province, product_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *"#,
            qualified_table(tables::REVIEWS)
        ))
        .bind(&input.name)
        .bind(&input.no_hp)
        .bind(&input.email)
        .bind(input.rating)
        .bind(input.comment.as_deref().map(str::trim).filter(|c| !c.is_empty()))
        .bind(input.province.trim())
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;

        let rating: f64 = sqlx::query_scalar(&format!(
            "UPDATE {} SET rating = (SELECT COALESCE(AVG(rating), 0)::float8 FROM {} WHERE product_id = $1) \
             WHERE id = $1 RETURNING rating",
            products,
            qualified_table(tables::REVIEWS)
        ))
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!(product_id, rating = review.rating, product_rating = rating, "review added");
        let receipt = ReviewReceipt {
            name: review.name.clone(),
            rating: review.rating,
            product_rating: rating,
        };
        Ok((review, receipt))
    }
}
