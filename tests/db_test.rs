//! Service and HTTP behavior against a real PostgreSQL. Skipped unless `DATABASE_URL` is set.

mod common;

use axum::http::{Method, StatusCode};
use catalog_api::auth::Role;
use catalog_api::models::{Category, NewCategory, NewProduct, NewReview, ProductDetail, ProductUpdate, Seller, SellerStatus};
use catalog_api::service::{CategoryService, ProductService, ReviewService, SellerService};
use catalog_api::storage::ObjectStorage;
use catalog_api::store::{qualified_table, tables};
use catalog_api::AppError;
use common::{assert_error, json_body, unique, TestApp};
use serde_json::json;

async fn seller(app: &TestApp, status: SellerStatus) -> Seller {
    let n = unique();
    let seller = SellerService::register(
        &app.state.pool,
        catalog_api::models::NewSeller {
            store_name: format!("Toko {}", n),
            description: "Sembako".into(),
            pic_name: "Budi".into(),
            pic_hp: format!("08{:011}", n),
            pic_email: format!("seller{}@example.com", n),
            password: "Rahasia#123".into(),
            address: "Jl. Merdeka 1".into(),
            pic_rt: 3,
            pic_rw: 5,
            pic_province: "Jawa Barat".into(),
            pic_city: "Bandung".into(),
            pic_district: "Coblong".into(),
            pic_village: "Dago".into(),
            pic_no_ktp: format!("{:016}", n),
            pic_url_ktp: "ktp/1.jpeg".into(),
            pic_url_photo: "photo/1.jpeg".into(),
        },
    )
    .await
    .unwrap();
    match status {
        SellerStatus::Pending => seller,
        next => SellerService::update_status(&app.state.pool, seller.id, next).await.unwrap(),
    }
}

async fn category(app: &TestApp) -> Category {
    CategoryService::create(
        &app.state.pool,
        NewCategory {
            name: format!("Minuman {}", unique()),
            description: None,
        },
    )
    .await
    .unwrap()
}

async fn product(app: &TestApp, seller_id: i64, category_id: i64, image_keys: Vec<String>) -> ProductDetail {
    ProductService::create(
        &app.state.pool,
        seller_id,
        NewProduct {
            name: format!("Kopi {}", unique()),
            category_id,
            stock: 10,
            description: None,
            price: 15_000,
            image_keys,
        },
    )
    .await
    .unwrap()
}

fn review(rating: i32) -> NewReview {
    NewReview {
        name: "Ani".into(),
        no_hp: "081234567890".into(),
        email: "ani@example.com".into(),
        rating,
        comment: Some("Mantap".into()),
        province: "Bali".into(),
    }
}

async fn image_rows(app: &TestApp, product_id: i64) -> i64 {
    sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM {} WHERE product_id = $1",
        qualified_table(tables::PRODUCT_IMAGES)
    ))
    .bind(product_id)
    .fetch_one(&app.state.pool)
    .await
    .unwrap()
}

async fn stored(app: &TestApp, keys: &[&str]) {
    for key in keys {
        app.storage.put(key, vec![0xff, 0xd8], "image/jpeg").await.unwrap();
    }
}

#[tokio::test]
async fn product_rating_is_mean_of_reviews() {
    let Some(app) = TestApp::with_database().await else { return };
    let seller = seller(&app, SellerStatus::Approved).await;
    let category = category(&app).await;
    let product = product(&app, seller.id, category.id, vec![]).await;
    assert_eq!(product.product.rating, 0.0);

    let mut expected = Vec::new();
    for rating in [5, 4, 4] {
        let (review, receipt) = ReviewService::add(&app.state.pool, &product.product.slug, review(rating)).await.unwrap();
        assert_eq!(review.rating, rating);
        expected.push(rating as f64);
        let mean = expected.iter().sum::<f64>() / expected.len() as f64;
        assert!((receipt.product_rating - mean).abs() < 1e-9, "{} != {}", receipt.product_rating, mean);
    }

    let detail = ProductService::get_public(&app.state.pool, &product.product.slug).await.unwrap();
    assert!((detail.product.rating - 13.0 / 3.0).abs() < 1e-9);
    assert_eq!(detail.reviews.len(), 3);
}

#[tokio::test]
async fn unapproved_sellers_products_cannot_be_reviewed() {
    let Some(app) = TestApp::with_database().await else { return };
    let pending = seller(&app, SellerStatus::Pending).await;
    let category = category(&app).await;
    let product = product(&app, pending.id, category.id, vec![]).await;

    let err = ReviewService::add(&app.state.pool, &product.product.slug, review(5)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "unexpected {:?}", err);

    let uri = format!("/api/products/{}/reviews", product.product.slug);
    let body = json!({
        "name": "Ani",
        "noHp": "081234567890",
        "email": "ani@example.com",
        "rating": 5,
        "province": "Bali"
    });
    let res = app.request(Method::POST, &uri, None, Some(body)).await;
    assert_error(res, StatusCode::NOT_FOUND, "not_found").await;
}

#[tokio::test]
async fn seller_status_is_decided_once() {
    let Some(app) = TestApp::with_database().await else { return };
    let pending = seller(&app, SellerStatus::Pending).await;
    assert!(pending.verified_at.is_none());

    let approved = SellerService::update_status(&app.state.pool, pending.id, SellerStatus::Approved).await.unwrap();
    assert_eq!(approved.status, SellerStatus::Approved);
    assert!(approved.verified_at.is_some());

    let err = SellerService::update_status(&app.state.pool, pending.id, SellerStatus::Cancelled).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "unexpected {:?}", err);
    let current = SellerService::get(&app.state.pool, pending.id).await.unwrap();
    assert_eq!(current.status, SellerStatus::Approved);
}

#[tokio::test]
async fn session_ends_when_seller_is_no_longer_approved() {
    let Some(app) = TestApp::with_database().await else { return };
    let seller = seller(&app, SellerStatus::Approved).await;
    let token = app.token(seller.id, Role::Seller);

    let res = app.request(Method::GET, "/api/seller/me", Some(&token), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["data"]["id"], seller.id);

    sqlx::query(&format!("UPDATE {} SET status = 'CANCELLED' WHERE id = $1", qualified_table(tables::SELLERS)))
        .bind(seller.id)
        .execute(&app.state.pool)
        .await
        .unwrap();
    let res = app.request(Method::GET, "/api/seller/me", Some(&token), None).await;
    assert_error(res, StatusCode::FORBIDDEN, "forbidden").await;
}

#[tokio::test]
async fn deleting_product_removes_its_images_and_objects() {
    let Some(app) = TestApp::with_database().await else { return };
    let seller = seller(&app, SellerStatus::Approved).await;
    let category = category(&app).await;
    let keys = [format!("{}/a.jpeg", seller.id), format!("{}/b.jpeg", seller.id)];
    stored(&app, &[keys[0].as_str(), keys[1].as_str()]).await;
    let product = product(&app, seller.id, category.id, keys.to_vec()).await;
    assert_eq!(product.images.len(), 2);

    let token = app.token(seller.id, Role::Seller);
    let uri = format!("/api/seller/products/{}", product.product.slug);
    let res = app.request(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    assert_eq!(image_rows(&app, product.product.id).await, 0);
    assert!(!app.storage.contains(&keys[0]).await);
    assert!(!app.storage.contains(&keys[1]).await);
    let res = app.request(Method::GET, &uri, Some(&token), None).await;
    assert_error(res, StatusCode::NOT_FOUND, "not_found").await;
}

#[tokio::test]
async fn image_keys_of_other_sellers_are_rejected() {
    let Some(app) = TestApp::with_database().await else { return };
    let owner = seller(&app, SellerStatus::Approved).await;
    let other = seller(&app, SellerStatus::Approved).await;
    let category = category(&app).await;
    let key = format!("{}/a.jpeg", owner.id);
    stored(&app, &[key.as_str()]).await;
    let owned = product(&app, owner.id, category.id, vec![key.clone()]).await;

    let token = app.token(other.id, Role::Seller);
    let body = json!({
        "name": "Kopi Tiruan",
        "categoryId": category.id,
        "stock": 1,
        "price": 1000,
        "imageKeys": [key]
    });
    let res = app.request(Method::POST, "/api/seller/products", Some(&token), Some(body)).await;
    let body = assert_error(res, StatusCode::UNPROCESSABLE_ENTITY, "validation_error").await;
    assert_eq!(body["error"]["details"]["imageKeys"], "Image key does not belong to this seller");

    let mine = product(&app, other.id, category.id, vec![]).await;
    let update = ProductUpdate {
        image_keys: vec![key.clone()],
        ..ProductUpdate::default()
    };
    let err = ProductService::update(&app.state.pool, app.storage.as_ref(), other.id, &mine.product.slug, update)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }), "unexpected {:?}", err);

    assert_eq!(image_rows(&app, owned.product.id).await, 1);
    assert!(app.storage.contains(&key).await);
}

#[tokio::test]
async fn shared_image_key_survives_until_last_reference_goes() {
    let Some(app) = TestApp::with_database().await else { return };
    let seller = seller(&app, SellerStatus::Approved).await;
    let category = category(&app).await;
    let key = format!("{}/shared.jpeg", seller.id);
    stored(&app, &[key.as_str()]).await;
    let first = product(&app, seller.id, category.id, vec![key.clone()]).await;
    let second = product(&app, seller.id, category.id, vec![key.clone()]).await;

    ProductService::delete(&app.state.pool, app.storage.as_ref(), seller.id, &first.product.slug)
        .await
        .unwrap();
    assert!(app.storage.contains(&key).await);

    let update = ProductUpdate {
        delete_image_keys: vec![key.clone()],
        ..ProductUpdate::default()
    };
    let updated = ProductService::update(&app.state.pool, app.storage.as_ref(), seller.id, &second.product.slug, update)
        .await
        .unwrap();
    assert!(updated.images.is_empty());
    assert!(!app.storage.contains(&key).await);
}
