//! Router assembly.

mod api;
mod common;

pub use api::{admin_routes, public_routes, seller_routes};
pub use common::common_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Upper bound for any request body; image uploads are checked against their own smaller limit.
pub const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// The full application: common routes at the root, JSON API under `/api`.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(public_routes())
        .nest("/seller", seller_routes())
        .nest("/admin", admin_routes());
    Router::new()
        .merge(common_routes())
        .nest("/api", api)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
