use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// One row of any region lookup table (province, regency, district, village).
#[derive(Clone, Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    pub name: String,
}
