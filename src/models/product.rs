use super::{Category, Review};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub slug: String,
    pub stock: i32,
    /// Whole rupiah.
    pub price: i64,
    /// Mean of the product's review ratings, 0 without reviews.
    pub rating: f64,
    pub seller_id: i64,
    pub category_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: i64,
    /// Object-storage key.
    pub image_url: String,
    pub product_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product with its category, images (oldest first) and reviews (newest first).
#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
    pub images: Vec<ProductImage>,
    pub reviews: Vec<Review>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(alias = "category_id")]
    pub category_id: i64,
    pub stock: i32,
    #[serde(default)]
    pub description: Option<String>,
    pub price: i64,
    #[serde(default, deserialize_with = "crate::models::null_as_empty")]
    pub image_keys: Vec<String>,
}

/// Partial product update. Absent fields keep their value.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    #[serde(alias = "category_id")]
    pub category_id: Option<i64>,
    pub stock: Option<i32>,
    pub description: Option<String>,
    pub price: Option<i64>,
    /// Keys appended as new images.
    #[serde(default, deserialize_with = "crate::models::null_as_empty")]
    pub image_keys: Vec<String>,
    /// Keys of this product's images to remove from the database and storage.
    #[serde(default, deserialize_with = "crate::models::null_as_empty")]
    pub delete_image_keys: Vec<String>,
}

/// Query string for product listings.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub search: Option<String>,
    #[serde(default, alias = "category_id", deserialize_with = "crate::models::empty_as_none")]
    pub category_id: Option<i64>,
    pub province: Option<String>,
    pub city: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_accepts_snake_category() {
        let u: ProductUpdate = serde_json::from_str(r#"{"category_id": 4, "deleteImageKeys": ["1/a.jpeg"]}"#).unwrap();
        assert_eq!(u.category_id, Some(4));
        assert!(u.image_keys.is_empty());
        assert_eq!(u.delete_image_keys, vec!["1/a.jpeg"]);
    }

    #[test]
    fn null_image_lists_mean_none() {
        let u: ProductUpdate = serde_json::from_str(r#"{"imageKeys": null, "deleteImageKeys": null}"#).unwrap();
        assert!(u.image_keys.is_empty());
        assert!(u.delete_image_keys.is_empty());
        let p: NewProduct =
            serde_json::from_str(r#"{"name": "Kopi", "categoryId": 1, "stock": 3, "price": 1000, "imageKeys": null}"#)
                .unwrap();
        assert!(p.image_keys.is_empty());
    }

    #[test]
    fn query_treats_blank_category_as_unset() {
        let q: ProductQuery = serde_json::from_str(r#"{"categoryId": ""}"#).unwrap();
        assert_eq!(q.category_id, None);
        let q: ProductQuery = serde_json::from_str(r#"{"categoryId": "7"}"#).unwrap();
        assert_eq!(q.category_id, Some(7));
    }
}
