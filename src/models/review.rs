use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Buyer review. Contact fields are stored but never returned.
#[derive(Clone, Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing)]
    pub no_hp: String,
    #[serde(skip_serializing)]
    pub email: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub province: String,
    pub product_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub name: String,
    pub no_hp: String,
    pub email: String,
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
    pub province: String,
}

/// Result of adding a review: the reviewer, their rating and the product's new average.
#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReceipt {
    pub name: String,
    pub rating: i32,
    pub product_rating: f64,
}
