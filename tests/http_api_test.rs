mod common;

use axum::http::{Method, StatusCode};
use catalog_api::auth::Role;
use common::{assert_error, json_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn health_and_version() {
    let app = TestApp::new();
    let res = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["status"], "ok");

    let res = app.request(Method::GET, "/version", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["name"], "catalog-api");
}

#[tokio::test]
async fn ready_reports_unavailable_database() {
    let app = TestApp::new();
    let res = app.request(Method::GET, "/ready", None, None).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(res).await["database"], "unavailable");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new();
    let res = app.request(Method::GET, "/api/openapi.json", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let doc = json_body(res).await;
    assert!(doc["components"]["schemas"].get("Seller").is_some());
}

#[tokio::test]
async fn seller_area_requires_token() {
    let app = TestApp::new();
    let res = app.request(Method::GET, "/api/seller/me", None, None).await;
    assert_error(res, StatusCode::UNAUTHORIZED, "unauthorized").await;

    let res = app.request(Method::GET, "/api/seller/products", Some("not-a-jwt"), None).await;
    assert_error(res, StatusCode::UNAUTHORIZED, "unauthorized").await;
}

#[tokio::test]
async fn roles_are_not_interchangeable() {
    let app = TestApp::new();
    let admin = app.token(1, Role::Admin);
    let seller = app.token(1, Role::Seller);

    let res = app.request(Method::GET, "/api/seller/stats/overview", Some(&admin), None).await;
    assert_error(res, StatusCode::FORBIDDEN, "forbidden").await;

    let res = app
        .request(Method::PUT, "/api/admin/sellers/1/status", Some(&seller), Some(json!({ "status": "APPROVED" })))
        .await;
    assert_error(res, StatusCode::FORBIDDEN, "forbidden").await;

    let res = app.request(Method::GET, "/api/admin/reports/sellers-status", Some(&seller), None).await;
    assert_error(res, StatusCode::FORBIDDEN, "forbidden").await;
}

#[tokio::test]
async fn token_from_other_secret_is_rejected() {
    let app = TestApp::new();
    let other = catalog_api::auth::TokenKeys::new(&catalog_api::config::AuthSettings {
        jwt_secret: "another_secret_key_that_is_also_32_chars_long".into(),
        token_ttl: std::time::Duration::from_secs(3600),
    });
    let forged = other.issue(1, Role::Admin).unwrap();
    let res = app.request(Method::GET, "/api/admin/me", Some(&forged), None).await;
    assert_error(res, StatusCode::UNAUTHORIZED, "unauthorized").await;
}

#[tokio::test]
async fn registration_is_validated_before_database() {
    let app = TestApp::new();
    let res = app
        .request(
            Method::POST,
            "/api/sellers",
            None,
            Some(json!({ "storeName": "Toko Maju", "picHp": "0812", "picEmail": "not-an-email" })),
        )
        .await;
    let body = assert_error(res, StatusCode::UNPROCESSABLE_ENTITY, "validation_error").await;
    let details = &body["error"]["details"];
    assert_eq!(details["picHp"], "Phone number must be at least 11 characters");
    assert_eq!(details["picEmail"], "Invalid email address");
    assert_eq!(details["picNoKTP"], "KTP is required");
}

#[tokio::test]
async fn review_rating_out_of_range() {
    let app = TestApp::new();
    let res = app
        .request(
            Method::POST,
            "/api/products/kopi-susu42/reviews",
            None,
            Some(json!({
                "name": "Budi",
                "noHp": "081234567890",
                "email": "budi@example.com",
                "rating": 7,
                "province": "Jawa Barat"
            })),
        )
        .await;
    let body = assert_error(res, StatusCode::UNPROCESSABLE_ENTITY, "validation_error").await;
    assert_eq!(body["error"]["message"], "Rating must be between 1 and 5");
}

#[tokio::test]
async fn login_needs_identifier() {
    let app = TestApp::new();
    let res = app
        .request(Method::POST, "/api/sellers/login", None, Some(json!({ "password": "x" })))
        .await;
    let body = assert_error(res, StatusCode::UNPROCESSABLE_ENTITY, "validation_error").await;
    assert_eq!(body["error"]["message"], "Email or phone number is required");
}

#[tokio::test]
async fn cities_need_a_province() {
    let app = TestApp::new();
    let res = app.request(Method::GET, "/api/locations/cities", None, None).await;
    assert_error(res, StatusCode::BAD_REQUEST, "bad_request").await;
}
