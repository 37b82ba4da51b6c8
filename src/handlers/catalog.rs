//! Public catalog: products of approved sellers, reviews, categories and locations.

use crate::error::AppError;
use crate::handlers::{products::filter_from, validated};
use crate::mail;
use crate::models::{NewReview, ProductQuery};
use crate::response;
use crate::service::{rules, CategoryService, ProductService, RegionService, ReviewService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<impl IntoResponse, AppError> {
    let products = ProductService::list_public(&state.pool, filter_from(query)).await?;
    Ok(response::list(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = ProductService::get_public(&state.pool, &slug).await?;
    Ok(response::ok(product))
}

/// Add a review; the reviewer gets a thank-you mail in the background.
pub async fn add_review(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input: NewReview = validated(body, rules::review())?;
    let (review, receipt) = ReviewService::add(&state.pool, &slug, input).await?;
    mail::send_detached(state.mailer.clone(), mail::review_thanks(&review.name, &review.email));
    Ok(response::created(receipt))
}

pub async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(response::list(CategoryService::list(&state.pool).await?))
}

pub async fn seller_provinces(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(response::list(RegionService::seller_provinces(&state.pool).await?))
}

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    pub province: Option<String>,
}

pub async fn seller_cities(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let province = query
        .province
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("Province is required".into()))?;
    Ok(response::list(RegionService::seller_cities(&state.pool, &province).await?))
}

pub async fn provinces(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(response::list(RegionService::provinces(&state.pool).await?))
}

pub async fn regencies(
    State(state): State<AppState>,
    Path(province_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::list(RegionService::regencies(&state.pool, &province_id).await?))
}

pub async fn districts(
    State(state): State<AppState>,
    Path(regency_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::list(RegionService::districts(&state.pool, &regency_id).await?))
}

pub async fn villages(
    State(state): State<AppState>,
    Path(district_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::list(RegionService::villages(&state.pool, &district_id).await?))
}
