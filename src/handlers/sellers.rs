//! Seller registration, sign-in and account self-service.

use crate::auth::Role;
use crate::error::AppError;
use crate::extractors::SellerSession;
use crate::handlers::validated;
use crate::models::{NewSeller, PasswordChange, SellerLogin, SellerProfileUpdate, TokenResponse};
use crate::response;
use crate::service::{rules, SellerService};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::Value;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input: NewSeller = validated(body, rules::seller_registration())?;
    let seller = SellerService::register(&state.pool, input).await?;
    Ok(response::created(seller))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input: SellerLogin = validated(body, rules::seller_login())?;
    let seller = SellerService::authenticate(&state.pool, &input.identifier, &input.password).await?;
    let token = state.keys.issue(seller.id, Role::Seller)?;
    tracing::info!(seller_id = seller.id, "seller signed in");
    Ok(response::ok(TokenResponse {
        token,
        token_type: "Bearer".into(),
        expires_in: state.keys.ttl_secs(),
    }))
}

pub async fn me(SellerSession(seller): SellerSession) -> impl IntoResponse {
    response::ok(seller)
}

pub async fn update_profile(
    State(state): State<AppState>,
    SellerSession(seller): SellerSession,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input: SellerProfileUpdate = validated(body, rules::seller_profile())?;
    let seller = SellerService::update_profile(&state.pool, seller.id, input).await?;
    Ok(response::ok(seller))
}

pub async fn change_password(
    State(state): State<AppState>,
    SellerSession(seller): SellerSession,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let input: PasswordChange = validated(body, rules::password_change())?;
    if input.new_password != input.confirm_password {
        return Err(AppError::invalid("confirmPassword", "Passwords do not match"));
    }
    SellerService::change_password(&state.pool, seller.id, &input.current_password, &input.new_password).await?;
    Ok(response::ok(serde_json::json!({ "message": "Password updated" })))
}
