//! Printable reports as structured documents: a title, who generated it and when, and the rows.

use crate::error::AppError;
use crate::models::SellerStatus;
use crate::stats::Period;
use crate::store::{qualified_table, tables};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;

/// Products below this stock appear on the restock list.
pub const RESTOCK_BELOW: i32 = 2;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<T> {
    pub title: &'static str,
    pub generated_at: DateTime<Utc>,
    pub generated_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<&'static str>,
    pub total: usize,
    pub rows: Vec<T>,
}

impl<T> Report<T> {
    fn new(title: &'static str, generated_by: &str, period: Option<Period>, total: usize, rows: Vec<T>) -> Self {
        Report {
            title,
            generated_at: Utc::now(),
            generated_by: generated_by.to_string(),
            period: period.map(|p| p.as_str()),
            total,
            rows,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub enum RatingLabel {
    Excellent,
    Good,
    Average,
    Poor,
    None,
}

impl RatingLabel {
    pub fn for_rating(rating: f64) -> Self {
        if rating >= 4.5 {
            RatingLabel::Excellent
        } else if rating >= 4.0 {
            RatingLabel::Good
        } else if rating >= 3.0 {
            RatingLabel::Average
        } else if rating > 0.0 {
            RatingLabel::Poor
        } else {
            RatingLabel::None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub enum StockLabel {
    Out,
    Critical,
    Low,
    Medium,
    Good,
}

impl StockLabel {
    pub fn for_stock(stock: i32) -> Self {
        match stock {
            s if s <= 0 => StockLabel::Out,
            s if s < 2 => StockLabel::Critical,
            s if s < 10 => StockLabel::Low,
            s if s < 50 => StockLabel::Medium,
            _ => StockLabel::Good,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RestockPriority {
    Urgent,
    High,
}

/// Whole rupiah with dot thousands separators: `Rp 15.000`.
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerStatusRow {
    pub id: i64,
    pub pic_name: String,
    pub store_name: String,
    #[sqlx(try_from = "String")]
    pub status: SellerStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerLocationRow {
    pub id: i64,
    pub store_name: String,
    pub pic_name: String,
    pub pic_province: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceGroup {
    pub province: String,
    pub count: usize,
    pub sellers: Vec<SellerLocationRow>,
}

#[derive(Debug, FromRow)]
struct ReviewedProductRecord {
    review_id: i64,
    product_id: i64,
    name: String,
    rating: i32,
    price: i64,
    stock: i32,
    category_name: Option<String>,
    store_name: Option<String>,
    review_province: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewedProductRow {
    pub review_id: i64,
    pub product_id: i64,
    pub name: String,
    pub rating: i32,
    pub price: i64,
    pub price_label: String,
    pub stock: i32,
    pub category_name: Option<String>,
    pub store_name: Option<String>,
    pub review_province: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct SellerProductRecord {
    name: String,
    description: String,
    category_name: Option<String>,
    price: i64,
    stock: i32,
    rating: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRatingRow {
    pub name: String,
    pub category_name: Option<String>,
    pub price: i64,
    pub price_label: String,
    pub stock: i32,
    pub rating: f64,
    pub rating_label: RatingLabel,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductStockRow {
    pub name: String,
    pub category_name: Option<String>,
    pub price: i64,
    pub price_label: String,
    pub rating: f64,
    pub stock: i32,
    pub stock_label: StockLabel,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestockRow {
    pub name: String,
    pub description: String,
    pub category_name: Option<String>,
    pub price: i64,
    pub price_label: String,
    pub stock: i32,
    pub priority: RestockPriority,
}

/// APPROVED sellers first; the order inside each group is kept.
pub fn approved_first(rows: Vec<SellerStatusRow>) -> Vec<SellerStatusRow> {
    let (mut approved, rest): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .partition(|r| r.status == SellerStatus::Approved);
    approved.extend(rest);
    approved
}

/// Group rows already sorted by province.
pub fn group_by_province(rows: Vec<SellerLocationRow>) -> Vec<ProvinceGroup> {
    let mut groups: Vec<ProvinceGroup> = Vec::new();
    for row in rows {
        match groups.last_mut() {
            Some(group) if group.province == row.pic_province => {
                group.sellers.push(row);
                group.count += 1;
            }
            _ => groups.push(ProvinceGroup {
                province: row.pic_province.clone(),
                count: 1,
                sellers: vec![row],
            }),
        }
    }
    groups
}

pub struct ReportService;

impl ReportService {
    pub async fn sellers_status(
        pool: &PgPool,
        period: Period,
        generated_by: &str,
    ) -> Result<Report<SellerStatusRow>, AppError> {
        let rows: Vec<SellerStatusRow> = sqlx::query_as(&format!(
            "SELECT id, pic_name, store_name, status, created_at FROM {} \
             WHERE ($1::timestamptz IS NULL OR created_at >= $1) ORDER BY created_at DESC, id DESC",
            qualified_table(tables::SELLERS)
        ))
        .bind(period.cutoff(Utc::now()))
        .fetch_all(pool)
        .await?;
        let rows = approved_first(rows);
        Ok(Report::new(
            "Laporan Daftar Akun Penjual Berdasarkan Status",
            generated_by,
            Some(period),
            rows.len(),
            rows,
        ))
    }

    pub async fn sellers_by_province(
        pool: &PgPool,
        period: Period,
        generated_by: &str,
    ) -> Result<Report<ProvinceGroup>, AppError> {
        let rows: Vec<SellerLocationRow> = sqlx::query_as(&format!(
            "SELECT id, store_name, pic_name, pic_province, created_at FROM {} \
             WHERE ($1::timestamptz IS NULL OR created_at >= $1) ORDER BY pic_province, created_at DESC, id DESC",
            qualified_table(tables::SELLERS)
        ))
        .bind(period.cutoff(Utc::now()))
        .fetch_all(pool)
        .await?;
        let total = rows.len();
        Ok(Report::new(
            "Laporan Daftar Toko Berdasarkan Lokasi Provinsi",
            generated_by,
            Some(period),
            total,
            group_by_province(rows),
        ))
    }

    /// One row per review, best ratings first.
    pub async fn products_by_rating(
        pool: &PgPool,
        period: Period,
        generated_by: &str,
    ) -> Result<Report<ReviewedProductRow>, AppError> {
        let records: Vec<ReviewedProductRecord> = sqlx::query_as(&format!(
            "SELECT r.id AS review_id, p.id AS product_id, p.name, r.rating, p.price, p.stock, \
                    c.name AS category_name, s.store_name, r.province AS review_province, r.created_at \
             FROM {} r JOIN {} p ON p.id = r.product_id \
             LEFT JOIN {} c ON c.id = p.category_id LEFT JOIN {} s ON s.id = p.seller_id \
             WHERE ($1::timestamptz IS NULL OR r.created_at >= $1) \
             ORDER BY r.rating DESC, r.created_at DESC, r.id DESC",
            qualified_table(tables::REVIEWS),
            qualified_table(tables::PRODUCTS),
            qualified_table(tables::CATEGORIES),
            qualified_table(tables::SELLERS)
        ))
        .bind(period.cutoff(Utc::now()))
        .fetch_all(pool)
        .await?;
        let rows: Vec<ReviewedProductRow> = records
            .into_iter()
            .map(|r| ReviewedProductRow {
                review_id: r.review_id,
                product_id: r.product_id,
                name: r.name,
                rating: r.rating,
                price_label: format_rupiah(r.price),
                price: r.price,
                stock: r.stock,
                category_name: r.category_name,
                store_name: r.store_name,
                review_province: r.review_province,
                created_at: r.created_at,
            })
            .collect();
        Ok(Report::new(
            "Laporan Daftar Produk Berdasarkan Rating",
            generated_by,
            Some(period),
            rows.len(),
            rows,
        ))
    }

    pub async fn seller_products_rating(
        pool: &PgPool,
        seller_id: i64,
        generated_by: &str,
    ) -> Result<Report<ProductRatingRow>, AppError> {
        let records = Self::seller_products(pool, seller_id, "p.rating DESC, p.created_at DESC", None).await?;
        let rows: Vec<ProductRatingRow> = records
            .into_iter()
            .map(|r| ProductRatingRow {
                price_label: format_rupiah(r.price),
                rating_label: RatingLabel::for_rating(r.rating),
                name: r.name,
                category_name: r.category_name,
                price: r.price,
                stock: r.stock,
                rating: r.rating,
            })
            .collect();
        Ok(Report::new("Laporan Produk Berdasarkan Rating", generated_by, None, rows.len(), rows))
    }

    pub async fn seller_products_stock(
        pool: &PgPool,
        seller_id: i64,
        generated_by: &str,
    ) -> Result<Report<ProductStockRow>, AppError> {
        let records = Self::seller_products(pool, seller_id, "p.stock DESC, p.name", None).await?;
        let rows: Vec<ProductStockRow> = records
            .into_iter()
            .map(|r| ProductStockRow {
                price_label: format_rupiah(r.price),
                stock_label: StockLabel::for_stock(r.stock),
                name: r.name,
                category_name: r.category_name,
                price: r.price,
                rating: r.rating,
                stock: r.stock,
            })
            .collect();
        Ok(Report::new("Laporan Produk Berdasarkan Stok", generated_by, None, rows.len(), rows))
    }

    /// Products with fewer than two units, by category then name.
    pub async fn seller_restock(
        pool: &PgPool,
        seller_id: i64,
        generated_by: &str,
    ) -> Result<Report<RestockRow>, AppError> {
        let records =
            Self::seller_products(pool, seller_id, "c.name NULLS LAST, p.name", Some(RESTOCK_BELOW)).await?;
        let rows: Vec<RestockRow> = records
            .into_iter()
            .map(|r| RestockRow {
                price_label: format_rupiah(r.price),
                priority: if r.stock <= 0 {
                    RestockPriority::Urgent
                } else {
                    RestockPriority::High
                },
                name: r.name,
                description: r.description,
                category_name: r.category_name,
                price: r.price,
                stock: r.stock,
            })
            .collect();
        Ok(Report::new("Laporan Produk Perlu Restock", generated_by, None, rows.len(), rows))
    }

    /// `order_by` is a fixed clause from this module, never user input.
    async fn seller_products(
        pool: &PgPool,
        seller_id: i64,
        order_by: &'static str,
        stock_below: Option<i32>,
    ) -> Result<Vec<SellerProductRecord>, AppError> {
        let records: Vec<SellerProductRecord> = sqlx::query_as(&format!(
            "SELECT p.name, p.description, c.name AS category_name, p.price, p.stock, p.rating \
             FROM {} p LEFT JOIN {} c ON c.id = p.category_id \
             WHERE p.seller_id = $1 AND ($2::int4 IS NULL OR p.stock < $2) ORDER BY {}",
            qualified_table(tables::PRODUCTS),
            qualified_table(tables::CATEGORIES),
            order_by
        ))
        .bind(seller_id)
        .bind(stock_below)
        .fetch_all(pool)
        .await?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rupiah() {
        assert_eq!(format_rupiah(15_000), "Rp 15.000");
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(999), "Rp 999");
        assert_eq!(format_rupiah(1_250_000), "Rp 1.250.000");
        assert_eq!(format_rupiah(-5_000), "-Rp 5.000");
    }

    #[test]
    fn rating_labels() {
        assert_eq!(RatingLabel::for_rating(4.5), RatingLabel::Excellent);
        assert_eq!(RatingLabel::for_rating(4.49), RatingLabel::Good);
        assert_eq!(RatingLabel::for_rating(4.0), RatingLabel::Good);
        assert_eq!(RatingLabel::for_rating(3.0), RatingLabel::Average);
        assert_eq!(RatingLabel::for_rating(2.9), RatingLabel::Poor);
        assert_eq!(RatingLabel::for_rating(0.1), RatingLabel::Poor);
        assert_eq!(RatingLabel::for_rating(0.0), RatingLabel::None);
    }

    #[test]
    fn stock_labels() {
        assert_eq!(StockLabel::for_stock(0), StockLabel::Out);
        assert_eq!(StockLabel::for_stock(1), StockLabel::Critical);
        assert_eq!(StockLabel::for_stock(2), StockLabel::Low);
        assert_eq!(StockLabel::for_stock(9), StockLabel::Low);
        assert_eq!(StockLabel::for_stock(10), StockLabel::Medium);
        assert_eq!(StockLabel::for_stock(49), StockLabel::Medium);
        assert_eq!(StockLabel::for_stock(50), StockLabel::Good);
    }

    fn status_row(id: i64, status: SellerStatus) -> SellerStatusRow {
        SellerStatusRow {
            id,
            pic_name: format!("pic {}", id),
            store_name: format!("store {}", id),
            status,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn approved_sellers_lead_and_keep_order() {
        use SellerStatus::*;
        let rows = vec![
            status_row(5, Pending),
            status_row(4, Approved),
            status_row(3, Cancelled),
            status_row(2, Approved),
        ];
        let ids: Vec<i64> = approved_first(rows).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 2, 5, 3]);
    }

    fn location_row(id: i64, province: &str) -> SellerLocationRow {
        SellerLocationRow {
            id,
            store_name: format!("store {}", id),
            pic_name: format!("pic {}", id),
            pic_province: province.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn groups_consecutive_provinces() {
        let groups = group_by_province(vec![
            location_row(1, "Bali"),
            location_row(2, "Bali"),
            location_row(3, "Jawa Barat"),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].province, "Bali");
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[1].sellers[0].id, 3);
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = Report::new("t", "admin", Some(Period::Week), 0, Vec::<RestockRow>::new());
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["period"], "7d");
        assert_eq!(v["generatedBy"], "admin");
        assert!(v.get("generatedAt").is_some());
        assert_eq!(serde_json::to_value(RestockPriority::Urgent).unwrap(), "URGENT");
    }
}
