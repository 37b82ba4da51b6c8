//! HTTP handlers. Bodies arrive as raw JSON, are checked against field rules, then deserialized.

pub mod admin;
pub mod catalog;
pub mod images;
pub mod products;
pub mod reports;
pub mod sellers;
pub mod stats;

use crate::error::AppError;
use crate::service::{RequestValidator, Rules};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Validate every rule (required fields enforced), then deserialize.
pub(crate) fn validated<T: DeserializeOwned>(mut body: Value, rules: Rules) -> Result<T, AppError> {
    RequestValidator::validate(&mut body, &rules)?;
    decode(body)
}

/// Validate only the fields present, then deserialize.
pub(crate) fn validated_partial<T: DeserializeOwned>(mut body: Value, rules: Rules) -> Result<T, AppError> {
    RequestValidator::validate_partial(&mut body, &rules)?;
    decode(body)
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(format!("invalid body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewProduct, NewReview};
    use crate::service::rules;
    use serde_json::json;

    #[test]
    fn coerced_integers_deserialize() {
        let p: NewProduct = validated(
            json!({ "name": "Kopi", "category_id": "3", "stock": "4", "price": "15000" }),
            rules::product_create(),
        )
        .unwrap();
        assert_eq!(p.category_id, 3);
        assert_eq!(p.stock, 4);
        assert_eq!(p.price, 15_000);
        assert!(p.image_keys.is_empty());
    }

    #[test]
    fn rule_failure_comes_before_decoding() {
        let err = validated::<NewReview>(
            json!({ "name": "Ani", "noHp": "081234567890", "email": "ani@example.com", "rating": 6, "province": "Bali" }),
            rules::review(),
        )
        .unwrap_err();
        match err {
            AppError::Validation { message, fields } => {
                assert_eq!(message, "Rating must be between 1 and 5");
                assert!(fields.contains_key("rating"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
