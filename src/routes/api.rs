//! `/api` routes: public catalog, seller area and admin area.

use crate::handlers::{admin, catalog, images, products, reports, sellers, stats};
use crate::openapi::openapi_json;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

/// Catalog, registration, sign-in and region lookups. No authentication.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/openapi.json", get(openapi_json))
        .route("/sellers", post(sellers::register))
        .route("/sellers/login", post(sellers::login))
        .route("/products", get(catalog::list_products))
        .route("/products/:slug", get(catalog::get_product))
        .route("/products/:slug/reviews", post(catalog::add_review))
        .route("/categories", get(catalog::list_categories))
        .route("/locations/provinces", get(catalog::seller_provinces))
        .route("/locations/cities", get(catalog::seller_cities))
        .route("/regions/provinces", get(catalog::provinces))
        .route("/regions/provinces/:id/regencies", get(catalog::regencies))
        .route("/regions/regencies/:id/districts", get(catalog::districts))
        .route("/regions/districts/:id/villages", get(catalog::villages))
}

/// Routes for signed-in, approved sellers (mounted at `/api/seller`).
pub fn seller_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(sellers::me))
        .route("/profile", put(sellers::update_profile))
        .route("/password", put(sellers::change_password))
        .route("/images", post(images::upload))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:slug",
            get(products::read).patch(products::update).delete(products::delete),
        )
        .route("/stats/overview", get(stats::seller_overview))
        .route("/stats/products-rating", get(stats::seller_products_rating))
        .route("/stats/products-stock", get(stats::seller_products_stock))
        .route("/stats/rating-distribution", get(stats::seller_rating_distribution))
        .route("/stats/rating-by-province", get(stats::seller_rating_by_province))
        .route("/reports/products-rating", get(reports::seller_products_rating))
        .route("/reports/products-stock", get(reports::seller_products_stock))
        .route("/reports/products-restock", get(reports::seller_restock))
}

/// Admin sign-in and admin-only routes (mounted at `/api/admin`).
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login))
        .route("/me", get(admin::me))
        .route("/sellers", get(admin::list_sellers))
        .route("/sellers/:id", get(admin::get_seller))
        .route("/sellers/:id/status", put(admin::update_seller_status))
        .route("/categories", post(admin::create_category))
        .route(
            "/categories/:id",
            axum::routing::patch(admin::update_category).delete(admin::delete_category),
        )
        .route("/stats/sellers-by-province", get(stats::sellers_by_province))
        .route("/stats/products-by-category", get(stats::products_by_category))
        .route("/stats/reviews", get(stats::reviews))
        .route("/stats/sellers-status", get(stats::sellers_status))
        .route("/stats/reviews-by-rating", get(stats::reviews_by_rating))
        .route("/reports/sellers-status", get(reports::sellers_status))
        .route("/reports/sellers-by-province", get(reports::sellers_by_province))
        .route("/reports/products-by-rating", get(reports::products_by_rating))
}
