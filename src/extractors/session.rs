//! Authenticated callers, resolved from the `Authorization: Bearer <jwt>` header.

use crate::auth::{Claims, Role};
use crate::error::AppError;
use crate::models::{Admin, Seller, SellerStatus};
use crate::service::{AdminService, SellerService};
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

/// Token from an `Authorization: Bearer` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            let (scheme, token) = v.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
        })
        .filter(|t| !t.is_empty())
}

fn claims_for(parts: &Parts, state: &AppState, role: Role) -> Result<Claims, AppError> {
    let token = bearer_token(&parts.headers)
        .ok_or_else(|| AppError::Unauthorized("Authentication required".into()))?;
    let claims = state.keys.verify(token)?;
    if claims.role != role {
        return Err(AppError::Forbidden(format!("{} access required", role)));
    }
    Ok(claims)
}

/// A signed-in seller, re-loaded on every request so status changes apply immediately.
#[derive(Clone, Debug)]
pub struct SellerSession(pub Seller);

#[async_trait]
impl FromRequestParts<AppState> for SellerSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = claims_for(parts, state, Role::Seller)?;
        let seller = SellerService::find(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))?;
        if seller.status != SellerStatus::Approved {
            return Err(AppError::Forbidden("Your account is not yet approved".into()));
        }
        Ok(SellerSession(seller))
    }
}

#[derive(Clone, Debug)]
pub struct AdminSession(pub Admin);

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = claims_for(parts, state, Role::Admin)?;
        let admin = AdminService::find(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))?;
        Ok(AdminSession(admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn reads_bearer_scheme_case_insensitively() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("bearer  xyz")), Some("xyz"));
    }

    #[test]
    fn ignores_other_schemes_and_blanks() {
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
