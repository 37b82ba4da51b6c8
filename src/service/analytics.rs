//! Dashboard statistics for admins (platform-wide, optionally windowed) and sellers (own products).

use crate::error::AppError;
use crate::stats::{rating_summary, round1, Period, RatingSummary};
use crate::store::{qualified_table, tables};
use chrono::Utc;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;

/// Reported for reviews without a province.
pub const UNKNOWN_PROVINCE: &str = "Tidak diketahui";

/// Products with fewer units than this count as low on stock.
pub const LOW_STOCK_THRESHOLD: i32 = 10;

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceCount {
    pub province: String,
    pub seller_count: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category_id: i64,
    pub category_name: Option<String>,
    pub product_count: i64,
}

#[derive(Debug, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_reviews: i64,
    pub reviews_with_comments: i64,
    pub reviews_with_rating_only: i64,
    pub one_star_rating: i64,
    pub two_star_rating: i64,
    pub three_star_rating: i64,
    pub four_star_rating: i64,
    pub five_star_rating: i64,
}

#[derive(Debug, Default, PartialEq, Serialize, ToSchema)]
pub struct SellerActivity {
    /// APPROVED sellers.
    pub active: i64,
    /// PENDING and CANCELLED sellers.
    pub inactive: i64,
}

#[derive(Debug, Default, PartialEq, Serialize, ToSchema)]
pub struct RatingCounts {
    pub rating1: i64,
    pub rating2: i64,
    pub rating3: i64,
    pub rating4: i64,
    pub rating5: i64,
}

impl RatingCounts {
    fn from_pairs(pairs: &[(i32, i64)]) -> Self {
        let mut counts = RatingCounts::default();
        for (rating, count) in pairs {
            match rating {
                1 => counts.rating1 += count,
                2 => counts.rating2 += count,
                3 => counts.rating3 += count,
                4 => counts.rating4 += count,
                5 => counts.rating5 += count,
                _ => {}
            }
        }
        counts
    }
}

#[derive(Debug, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerOverview {
    pub total_products: i64,
    pub total_stock: i64,
    pub low_stock_products: i64,
    pub total_reviews: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ProductRating {
    pub name: String,
    pub rating: f64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ProductStock {
    pub name: String,
    pub stock: i32,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceRating {
    pub province: String,
    pub count: i64,
    pub avg_rating: f64,
}

pub struct StatsService;

impl StatsService {
    pub async fn sellers_by_province(pool: &PgPool, period: Period) -> Result<Vec<ProvinceCount>, AppError> {
        let rows: Vec<ProvinceCount> = sqlx::query_as(&format!(
            "SELECT pic_province AS province, COUNT(*) AS seller_count FROM {} \
             WHERE ($1::timestamptz IS NULL OR created_at >= $1) \
             GROUP BY pic_province ORDER BY seller_count DESC, province",
            qualified_table(tables::SELLERS)
        ))
        .bind(period.cutoff(Utc::now()))
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn products_by_category(pool: &PgPool, period: Period) -> Result<Vec<CategoryCount>, AppError> {
        let rows: Vec<CategoryCount> = sqlx::query_as(&format!(
            "SELECT p.category_id, c.name AS category_name, COUNT(p.id) AS product_count \
             FROM {} p LEFT JOIN {} c ON c.id = p.category_id \
             WHERE ($1::timestamptz IS NULL OR p.created_at >= $1) \
             GROUP BY p.category_id, c.name ORDER BY product_count DESC, p.category_id",
            qualified_table(tables::PRODUCTS),
            qualified_table(tables::CATEGORIES)
        ))
        .bind(period.cutoff(Utc::now()))
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn review_summary(pool: &PgPool, period: Period) -> Result<ReviewStats, AppError> {
        let (total, with_comments): (i64, i64) = sqlx::query_as(&format!(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE comment IS NOT NULL AND comment <> '') FROM {} \
             WHERE ($1::timestamptz IS NULL OR created_at >= $1)",
            qualified_table(tables::REVIEWS)
        ))
        .bind(period.cutoff(Utc::now()))
        .fetch_one(pool)
        .await?;
        let stars = RatingCounts::from_pairs(&Self::rating_pairs(pool, period).await?);
        Ok(ReviewStats {
            total_reviews: total,
            reviews_with_comments: with_comments,
            reviews_with_rating_only: total - with_comments,
            one_star_rating: stars.rating1,
            two_star_rating: stars.rating2,
            three_star_rating: stars.rating3,
            four_star_rating: stars.rating4,
            five_star_rating: stars.rating5,
        })
    }

    pub async fn sellers_status(pool: &PgPool, period: Period) -> Result<SellerActivity, AppError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(&format!(
            "SELECT status, COUNT(*) FROM {} WHERE ($1::timestamptz IS NULL OR created_at >= $1) GROUP BY status",
            qualified_table(tables::SELLERS)
        ))
        .bind(period.cutoff(Utc::now()))
        .fetch_all(pool)
        .await?;
        let mut activity = SellerActivity::default();
        for (status, count) in rows {
            if status == "APPROVED" {
                activity.active += count;
            } else {
                activity.inactive += count;
            }
        }
        Ok(activity)
    }

    pub async fn reviews_by_rating(pool: &PgPool, period: Period) -> Result<RatingCounts, AppError> {
        Ok(RatingCounts::from_pairs(&Self::rating_pairs(pool, period).await?))
    }

    async fn rating_pairs(pool: &PgPool, period: Period) -> Result<Vec<(i32, i64)>, AppError> {
        let rows: Vec<(i32, i64)> = sqlx::query_as(&format!(
            "SELECT rating, COUNT(*) FROM {} WHERE ($1::timestamptz IS NULL OR created_at >= $1) \
             GROUP BY rating ORDER BY rating",
            qualified_table(tables::REVIEWS)
        ))
        .bind(period.cutoff(Utc::now()))
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn seller_overview(pool: &PgPool, seller_id: i64) -> Result<SellerOverview, AppError> {
        let overview: SellerOverview = sqlx::query_as(&format!(
            "SELECT COUNT(*) AS total_products, \
                    COALESCE(SUM(p.stock), 0)::int8 AS total_stock, \
                    COUNT(*) FILTER (WHERE p.stock < $2) AS low_stock_products, \
                    (SELECT COUNT(*) FROM {} r JOIN {} rp ON rp.id = r.product_id WHERE rp.seller_id = $1) \
                        AS total_reviews \
             FROM {} p WHERE p.seller_id = $1",
            qualified_table(tables::REVIEWS),
            qualified_table(tables::PRODUCTS),
            qualified_table(tables::PRODUCTS)
        ))
        .bind(seller_id)
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_one(pool)
        .await?;
        Ok(overview)
    }

    /// Lowest rated first.
    pub async fn seller_products_rating(pool: &PgPool, seller_id: i64) -> Result<Vec<ProductRating>, AppError> {
        let rows: Vec<ProductRating> = sqlx::query_as(&format!(
            "SELECT name, rating FROM {} WHERE seller_id = $1 ORDER BY rating ASC, name",
            qualified_table(tables::PRODUCTS)
        ))
        .bind(seller_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Lowest stock first.
    pub async fn seller_products_stock(pool: &PgPool, seller_id: i64) -> Result<Vec<ProductStock>, AppError> {
        let rows: Vec<ProductStock> = sqlx::query_as(&format!(
            "SELECT name, stock FROM {} WHERE seller_id = $1 ORDER BY stock ASC, name",
            qualified_table(tables::PRODUCTS)
        ))
        .bind(seller_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn seller_rating_distribution(pool: &PgPool, seller_id: i64) -> Result<RatingSummary, AppError> {
        let rows: Vec<(i32, i64)> = sqlx::query_as(&format!(
            "SELECT r.rating, COUNT(*) FROM {} r JOIN {} p ON p.id = r.product_id \
             WHERE p.seller_id = $1 GROUP BY r.rating",
            qualified_table(tables::REVIEWS),
            qualified_table(tables::PRODUCTS)
        ))
        .bind(seller_id)
        .fetch_all(pool)
        .await?;
        Ok(rating_summary(&rows))
    }

    /// Reviews of the seller's products grouped by reviewer province, most reviews first.
    pub async fn seller_rating_by_province(pool: &PgPool, seller_id: i64) -> Result<Vec<ProvinceRating>, AppError> {
        let rows: Vec<(String, i64, f64)> = sqlx::query_as(&format!(
            "SELECT r.province, COUNT(*) AS count, AVG(r.rating)::float8 FROM {} r JOIN {} p ON p.id = r.product_id \
             WHERE p.seller_id = $1 GROUP BY r.province ORDER BY count DESC, r.province",
            qualified_table(tables::REVIEWS),
            qualified_table(tables::PRODUCTS)
        ))
        .bind(seller_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(province_rating).collect())
    }
}

fn province_rating((province, count, avg): (String, i64, f64)) -> ProvinceRating {
    let province = province.trim();
    ProvinceRating {
        province: if province.is_empty() {
            UNKNOWN_PROVINCE.to_string()
        } else {
            province.to_string()
        },
        count,
        avg_rating: round1(avg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_counts_fill_missing_stars() {
        let c = RatingCounts::from_pairs(&[(1, 2), (5, 7)]);
        assert_eq!(
            c,
            RatingCounts {
                rating1: 2,
                rating2: 0,
                rating3: 0,
                rating4: 0,
                rating5: 7
            }
        );
    }

    #[test]
    fn blank_province_is_unknown() {
        let r = province_rating((" ".into(), 3, 4.333));
        assert_eq!(r.province, UNKNOWN_PROVINCE);
        assert_eq!(r.avg_rating, 4.3);
        let r = province_rating(("Bali".into(), 1, 5.0));
        assert_eq!(r.province, "Bali");
    }
}
