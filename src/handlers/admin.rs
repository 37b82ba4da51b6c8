//! Administration: sign-in, seller approval and category management.

use crate::auth::Role;
use crate::error::AppError;
use crate::extractors::AdminSession;
use crate::handlers::{validated, validated_partial};
use crate::mail;
use crate::models::{AdminLogin, CategoryUpdate, NewCategory, SellerStatus, TokenResponse};
use crate::response;
use crate::service::{rules, AdminService, CategoryService, SellerService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input: AdminLogin = validated(body, rules::admin_login())?;
    let admin = AdminService::authenticate(&state.pool, &input.username, &input.password).await?;
    let token = state.keys.issue(admin.id, Role::Admin)?;
    tracing::info!(admin_id = admin.id, "admin signed in");
    Ok(response::ok(TokenResponse {
        token,
        token_type: "Bearer".into(),
        expires_in: state.keys.ttl_secs(),
    }))
}

pub async fn me(AdminSession(admin): AdminSession) -> impl IntoResponse {
    response::ok(admin)
}

#[derive(Debug, Default, Deserialize)]
pub struct SellerListQuery {
    pub status: Option<String>,
}

pub async fn list_sellers(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<SellerListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(s.parse::<SellerStatus>()?),
    };
    Ok(response::list(SellerService::list(&state.pool, status).await?))
}

pub async fn get_seller(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(response::ok(SellerService::get(&state.pool, id).await?))
}

/// Approve or reject a pending seller, then notify them by mail. Body: [`crate::models::StatusUpdate`], case-insensitive.
pub async fn update_seller_status(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let status = body
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::invalid("status", "Status is required"))?;
    let next: SellerStatus = status.parse()?;
    let seller = SellerService::update_status(&state.pool, id, next).await?;
    tracing::info!(admin_id = admin.id, seller_id = seller.id, status = %seller.status, "seller decided");

    let email = match seller.status {
        SellerStatus::Approved => Some(mail::seller_approved(
            &seller.pic_name,
            &seller.store_name,
            &seller.pic_email,
            &state.app_public_url,
        )),
        SellerStatus::Cancelled => Some(mail::seller_rejected(&seller.pic_name, &seller.store_name, &seller.pic_email)),
        SellerStatus::Pending => None,
    };
    if let Some(email) = email {
        mail::send_detached(state.mailer.clone(), email);
    }
    Ok(response::ok(seller))
}

pub async fn create_category(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input: NewCategory = validated(body, rules::category_create())?;
    Ok(response::created(CategoryService::create(&state.pool, input).await?))
}

pub async fn update_category(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input: CategoryUpdate = validated_partial(body, rules::category_update())?;
    Ok(response::ok(CategoryService::update(&state.pool, id, input).await?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    CategoryService::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
