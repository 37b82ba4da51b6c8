//! Dashboard statistics.

use crate::error::AppError;
use crate::extractors::{AdminSession, SellerSession};
use crate::response;
use crate::service::StatsService;
use crate::state::AppState;
use crate::stats::PeriodQuery;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

pub async fn sellers_by_province(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(q): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let period = q.period();
    let rows = StatsService::sellers_by_province(&state.pool, period).await?;
    Ok(response::list_for_period(rows, period))
}

pub async fn products_by_category(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(q): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let period = q.period();
    let rows = StatsService::products_by_category(&state.pool, period).await?;
    Ok(response::list_for_period(rows, period))
}

pub async fn reviews(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(q): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::ok(StatsService::review_summary(&state.pool, q.period()).await?))
}

pub async fn sellers_status(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(q): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::ok(StatsService::sellers_status(&state.pool, q.period()).await?))
}

pub async fn reviews_by_rating(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(q): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::ok(StatsService::reviews_by_rating(&state.pool, q.period()).await?))
}

pub async fn seller_overview(
    State(state): State<AppState>,
    SellerSession(seller): SellerSession,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::ok(StatsService::seller_overview(&state.pool, seller.id).await?))
}

pub async fn seller_products_rating(
    State(state): State<AppState>,
    SellerSession(seller): SellerSession,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::list(StatsService::seller_products_rating(&state.pool, seller.id).await?))
}

pub async fn seller_products_stock(
    State(state): State<AppState>,
    SellerSession(seller): SellerSession,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::list(StatsService::seller_products_stock(&state.pool, seller.id).await?))
}

pub async fn seller_rating_distribution(
    State(state): State<AppState>,
    SellerSession(seller): SellerSession,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::ok(StatsService::seller_rating_distribution(&state.pool, seller.id).await?))
}

pub async fn seller_rating_by_province(
    State(state): State<AppState>,
    SellerSession(seller): SellerSession,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::list(StatsService::seller_rating_by_province(&state.pool, seller.id).await?))
}
