#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use pharmacy::{PrescriptionStatus, ProductKind};
use pharmacy_api::{
    AppState, app,
    auth::{Claims, TokenVerifier},
    entities::{TagList, health_product, prescription, product, user},
    migration::Migrator,
};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, DbErr, Set};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-suite-secret";

// Helper function to get database URL from environment or default to SQLite
fn get_test_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string())
}

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(&get_test_database_url()).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn setup_test_app(db: &DatabaseConnection) -> Router {
    app(&AppState::new(db.clone(), TEST_SECRET))
}

/// A fixed instant so seeded rows sort deterministically
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
}

#[derive(Debug, Clone)]
pub struct ProductSeed {
    pub name: &'static str,
    pub generic_name: Option<&'static str>,
    pub category: &'static str,
    pub price: f64,
    pub kind: ProductKind,
    pub in_stock: bool,
    pub prescription: bool,
    pub rating: f64,
    /// Seconds after [`base_time`]
    pub age: i64,
}

impl Default for ProductSeed {
    fn default() -> Self {
        Self {
            name: "Product",
            generic_name: None,
            category: "General",
            price: 10.0,
            kind: ProductKind::Medicine,
            in_stock: true,
            prescription: false,
            rating: 4.0,
            age: 0,
        }
    }
}

pub async fn insert_product(db: &DatabaseConnection, seed: ProductSeed) -> product::Model {
    let created_at = base_time() + Duration::seconds(seed.age);
    product::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(seed.name.to_string()),
        description: Set(format!("{} description", seed.name)),
        generic_name: Set(seed.generic_name.map(str::to_string)),
        price: Set(seed.price),
        kind: Set(seed.kind),
        category: Set(seed.category.to_string()),
        tags: Set(TagList::default()),
        image_url: Set(None),
        in_stock: Set(seed.in_stock),
        stock: Set(if seed.in_stock { 10 } else { 0 }),
        prescription: Set(seed.prescription),
        rating: Set(seed.rating),
        created_at: Set(created_at),
        updated_at: Set(created_at),
    }
    .insert(db)
    .await
    .expect("Failed to insert product")
}

pub async fn insert_health_product(
    db: &DatabaseConnection,
    name: &str,
    category: &str,
    price: f64,
) -> health_product::Model {
    let now = Utc::now();
    health_product::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(format!("{name} description")),
        generic_name: Set(None),
        price: Set(price),
        category: Set(category.to_string()),
        tags: Set(TagList(vec!["wellness".to_string()])),
        image_url: Set(None),
        in_stock: Set(true),
        stock: Set(5),
        rating: Set(0.0),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert health product")
}

pub async fn insert_user(db: &DatabaseConnection, name: &str, email: &str, role: user::UserRole, age: i64) -> user::Model {
    let created_at = base_time() + Duration::seconds(age);
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        role: Set(role),
        created_at: Set(created_at),
        updated_at: Set(created_at),
    }
    .insert(db)
    .await
    .expect("Failed to insert user")
}

pub async fn insert_prescription(
    db: &DatabaseConnection,
    user_id: Uuid,
    name: &str,
    status: PrescriptionStatus,
    refills_left: i32,
    age: i64,
) -> prescription::Model {
    let at = base_time() + Duration::seconds(age);
    prescription::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        name: Set(name.to_string()),
        doctor: Set("Dr. Reyes".to_string()),
        rx_number: Set(format!("RX-{}", 1000 + age)),
        prescribed_at: Set(at),
        next_refill_at: Set(None),
        expired_at: Set(None),
        refills_left: Set(refills_left),
        status: Set(status),
        note: Set(None),
        created_at: Set(at),
        updated_at: Set(at),
    }
    .insert(db)
    .await
    .expect("Failed to insert prescription")
}

pub fn token_for(user: &user::Model) -> String {
    let role = match user.role {
        user::UserRole::Admin => "admin",
        user::UserRole::User => "user",
    };
    TokenVerifier::new(TEST_SECRET)
        .sign(&Claims::new(user.id, user.email.clone(), role, 3600))
        .expect("Failed to sign token")
}

/// Send one request and decode the JSON body (`Null` when empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    send_raw(app, method, uri, token, body.map(|body| body.to_string())).await
}

/// Like [`send`], but the JSON body goes out exactly as written
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<String>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body)),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_as(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Some(token), None).await
}

/// Names of the items in a list response, in order
pub fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("list response must carry a data array")
        .iter()
        .map(|item| item["name"].as_str().unwrap_or_default().to_string())
        .collect()
}
