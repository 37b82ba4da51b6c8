//! OpenAPI document for the JSON API, served at `/api/openapi.json`.

use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        description = "Marketplace backend: sellers, products, reviews, statistics and reports."
    ),
    tags(
        (name = "Catalog", description = "Public product catalog, reviews and locations"),
        (name = "Seller", description = "Seller account, products, statistics and reports"),
        (name = "Admin", description = "Seller approval, categories, statistics and reports")
    ),
    components(
        schemas(
            crate::models::Seller,
            crate::models::SellerStatus,
            crate::models::NewSeller,
            crate::models::SellerProfileUpdate,
            crate::models::PasswordChange,
            crate::models::SellerLogin,
            crate::models::StatusUpdate,
            crate::models::Product,
            crate::models::ProductImage,
            crate::models::ProductDetail,
            crate::models::NewProduct,
            crate::models::ProductUpdate,
            crate::models::Review,
            crate::models::NewReview,
            crate::models::ReviewReceipt,
            crate::models::Category,
            crate::models::NewCategory,
            crate::models::CategoryUpdate,
            crate::models::Admin,
            crate::models::AdminLogin,
            crate::models::TokenResponse,
            crate::models::Region,
            crate::handlers::images::UploadedImage,
            crate::service::ProvinceCount,
            crate::service::CategoryCount,
            crate::service::ReviewStats,
            crate::service::SellerActivity,
            crate::service::RatingCounts,
            crate::service::SellerOverview,
            crate::service::ProductRating,
            crate::service::ProductStock,
            crate::service::ProvinceRating,
            crate::stats::RatingBucket,
            crate::stats::RatingSummary,
            crate::service::SellerStatusRow,
            crate::service::SellerLocationRow,
            crate::service::ProvinceGroup,
            crate::service::ReviewedProductRow,
            crate::service::ProductRatingRow,
            crate::service::ProductStockRow,
            crate::service::RestockRow,
            crate::service::RatingLabel,
            crate::service::StockLabel,
            crate::service::RestockPriority
        )
    ),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_schemas_and_auth() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();
        assert!(json.contains("Catalog API"));
        assert!(json.contains("ProductDetail"));
        assert!(json.contains("bearer_auth"));
    }
}
