use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// `description: null` clears it; an absent field leaves it unchanged.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::present")]
    pub description: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_absent_description_differ() {
        let cleared: CategoryUpdate = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));
        let untouched: CategoryUpdate = serde_json::from_str(r#"{"name": "Minuman"}"#).unwrap();
        assert_eq!(untouched.description, None);
    }
}
