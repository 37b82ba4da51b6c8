//! Report documents for admins and sellers.

use crate::error::AppError;
use crate::extractors::{AdminSession, SellerSession};
use crate::response;
use crate::service::ReportService;
use crate::state::AppState;
use crate::stats::PeriodQuery;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

pub async fn sellers_status(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Query(q): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::ok(ReportService::sellers_status(&state.pool, q.period(), &admin.username).await?))
}

pub async fn sellers_by_province(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Query(q): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::ok(ReportService::sellers_by_province(&state.pool, q.period(), &admin.username).await?))
}

pub async fn products_by_rating(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Query(q): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::ok(ReportService::products_by_rating(&state.pool, q.period(), &admin.username).await?))
}

pub async fn seller_products_rating(
    State(state): State<AppState>,
    SellerSession(seller): SellerSession,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::ok(ReportService::seller_products_rating(&state.pool, seller.id, &seller.store_name).await?))
}

pub async fn seller_products_stock(
    State(state): State<AppState>,
    SellerSession(seller): SellerSession,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::ok(ReportService::seller_products_stock(&state.pool, seller.id, &seller.store_name).await?))
}

pub async fn seller_restock(
    State(state): State<AppState>,
    SellerSession(seller): SellerSession,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::ok(ReportService::seller_restock(&state.pool, seller.id, &seller.store_name).await?))
}
