// Detail and mutation routes: id validation, not-found handling and health product CRUD

use axum::http::{Method, StatusCode};
use pharmacy_api::entities::user::UserRole;
use serde_json::json;

mod common;
use common::{
    ProductSeed, get, insert_health_product, insert_product, insert_user, send, setup_test_app, setup_test_db,
    token_for,
};

#[tokio::test]
async fn test_product_id_validation() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let product = insert_product(&db, ProductSeed::default()).await;
    let app = setup_test_app(&db);

    let (status, body) = get(&app, "/api/products/not-a-valid-id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Invalid id" }));

    let (status, body) = get(&app, &format!("/api/products/{}", uuid::Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Not found" }));

    let (status, body) = get(&app, &format!("/api/products/{}", product.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Product");
    assert_eq!(body["type"], "medicine");
    assert_eq!(body["inStock"], true);
}

#[tokio::test]
async fn test_health_product_crud() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let admin = insert_user(&db, "Admin", "admin@pharmacy.test", UserRole::Admin, 0).await;
    let token = token_for(&admin);
    let app = setup_test_app(&db);

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/health-products",
        Some(&token),
        Some(json!({
            "name": "Vitamin C",
            "description": "Immune support",
            "price": 9.5,
            "category": "Vitamins",
            "stock": 3,
            "tags": ["daily", " immune "]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["inStock"], true);
    assert_eq!(created["tags"], json!(["daily", "immune"]));
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/health-products/{id}"),
        Some(&token),
        Some(json!({ "price": "11", "rating": 9, "category": "<b>" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 11.0);
    assert_eq!(updated["rating"], 5.0);
    assert_eq!(updated["category"], "Vitamins", "unusable fields are left untouched");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/health-products/{id}"),
        Some(&token),
        Some(json!({ "category": "all" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No valid fields to update");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/health-products/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);

    let (status, _) = get(&app, &format!("/api/health-products/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_product_mutations_validate_id_then_existence() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let admin = insert_user(&db, "Admin", "admin@pharmacy.test", UserRole::Admin, 0).await;
    let token = token_for(&admin);
    let app = setup_test_app(&db);
    let missing = uuid::Uuid::new_v4();

    let (status, body) = send(&app, Method::DELETE, "/api/health-products/123", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid id");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/health-products/{missing}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not found");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/health-products/%7B%22%24gt%22%3A%22%22%7D",
        Some(&token),
        Some(json!({ "price": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid id");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/health-products/{missing}"),
        Some(&token),
        Some(json!({ "price": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_requires_fields() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let admin = insert_user(&db, "Admin", "admin@pharmacy.test", UserRole::Admin, 0).await;
    let token = token_for(&admin);
    let app = setup_test_app(&db);

    for uri in ["/api/products", "/api/health-products"] {
        let (status, body) = send(
            &app,
            Method::POST,
            uri,
            Some(&token),
            Some(json!({ "name": "No price", "description": "x", "category": "Vitamins" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["message"], "Missing or invalid required fields");
    }

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(&token),
        Some(json!({
            "name": "Cetirizine",
            "description": "Antihistamine",
            "price": 3,
            "category": "Allergy",
            "type": "medicine",
            "prescription": false
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["type"], "medicine");
    assert_eq!(created["inStock"], false);
}

#[tokio::test]
async fn test_health_listing_and_categories() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    insert_health_product(&db, "Sunscreen", "Skin Care", 15.0).await;
    insert_health_product(&db, "Toothpaste", "oral", 3.0).await;
    insert_health_product(&db, "Bandages", "Aids", 5.0).await;
    insert_health_product(&db, "Lip Balm", "Skin Care", 2.0).await;
    let app = setup_test_app(&db);

    let (status, body) = get(&app, "/api/health-products/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Aids", "oral", "Skin Care"]));

    let (_, body) = get(&app, "/api/health-products?category=Skin%20Care&sort=price_asc").await;
    assert_eq!(common::names(&body), ["Lip Balm", "Sunscreen"]);

    let (_, body) = get(&app, "/api/health-products?prescription=required&type=medicine").await;
    assert_eq!(body["total"], 4, "health products have no kind or prescription filter");
}
