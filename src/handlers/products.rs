//! Seller-scoped product management.

use crate::error::AppError;
use crate::extractors::SellerSession;
use crate::handlers::{validated, validated_partial};
use crate::models::{NewProduct, ProductQuery, ProductUpdate};
use crate::response;
use crate::service::{rules, ProductService};
use crate::sql::ProductFilter;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

/// Listing filter from the query string. Blank strings mean no filter.
pub(crate) fn filter_from(query: ProductQuery) -> ProductFilter {
    let non_blank = |s: Option<String>| s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    ProductFilter {
        search: non_blank(query.search),
        category_id: query.category_id,
        province: non_blank(query.province),
        city: non_blank(query.city),
        ..ProductFilter::default()
    }
}

pub async fn list(
    State(state): State<AppState>,
    SellerSession(seller): SellerSession,
    Query(query): Query<ProductQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = ProductFilter {
        province: None,
        city: None,
        ..filter_from(query)
    };
    let products = ProductService::list_for_seller(&state.pool, seller.id, filter).await?;
    Ok(response::list(products))
}

pub async fn create(
    State(state): State<AppState>,
    SellerSession(seller): SellerSession,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input: NewProduct = validated(body, rules::product_create())?;
    let product = ProductService::create(&state.pool, seller.id, input).await?;
    Ok(response::created(product))
}

pub async fn read(
    State(state): State<AppState>,
    SellerSession(seller): SellerSession,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = ProductService::get_for_seller(&state.pool, seller.id, &slug).await?;
    Ok(response::ok(product))
}

pub async fn update(
    State(state): State<AppState>,
    SellerSession(seller): SellerSession,
    Path(slug): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input: ProductUpdate = validated_partial(body, rules::product_update())?;
    let product = ProductService::update(&state.pool, state.storage.as_ref(), seller.id, &slug, input).await?;
    Ok(response::ok(product))
}

pub async fn delete(
    State(state): State<AppState>,
    SellerSession(seller): SellerSession,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    ProductService::delete(&state.pool, state.storage.as_ref(), seller.id, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_are_dropped() {
        let f = filter_from(ProductQuery {
            search: Some("  ".into()),
            category_id: Some(2),
            province: Some(" Bali ".into()),
            city: None,
        });
        assert_eq!(f.search, None);
        assert_eq!(f.category_id, Some(2));
        assert_eq!(f.province.as_deref(), Some("Bali"));
        assert!(!f.approved_only);
    }
}
