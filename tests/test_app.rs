use axum::{
    body,
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shop_monitor::app_state::AppState;
use shop_monitor::auth::AuthService;
use shop_monitor::configuration::DatabaseSettings;
use shop_monitor::create_app;
use shop_monitor::db::product::{MonitoredProduct, SyncStatus};
use shop_monitor::db::Database;
use shop_monitor::events::ChangeEvent;
use std::env;
use tower::ServiceExt;

pub async fn read_body(body: Body) -> String {
    let bytes = body::to_bytes(body, usize::MAX).await.expect("Failed");
    String::from_utf8(bytes.to_vec()).expect("response was not valid utf-8")
}

fn create_seeded_db() -> Database {
    let directory = env::current_dir().expect("Failed to find current directory");
    let settings = DatabaseSettings {
        seed_path: Some(format!("{}/tests/data.json", directory.to_str().unwrap())),
    };
    Database::try_from(&settings).expect("Failed to create seeded db")
}

fn create_empty_app() -> (Router, AppState) {
    create_app(Database::default(), AuthService::demo()).expect("Failed to create an app")
}

fn create_seeded_app() -> (Router, AppState) {
    create_app(create_seeded_db(), AuthService::demo()).expect("Failed to create an app")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("Failed to build request")
}

fn put_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("Failed to build request")
}

#[tokio::test]
async fn health_check_works() {
    let (app, _) = create_empty_app();

    let response = app.oneshot(get("/health_check")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn products_empty_works() {
    let (app, _) = create_empty_app();

    let response = app.oneshot(get("/products")).await.unwrap();

    let (parts, body) = response.into_parts();
    let text = read_body(body).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert!(serde_json::from_str::<Vec<MonitoredProduct>>(&text)
        .expect("Failed to convert string to vec")
        .is_empty());
}

#[tokio::test]
async fn n_products_counts_the_seed() {
    let (app, _) = create_seeded_app();

    let response = app.oneshot(get("/n_products")).await.unwrap();

    let (parts, body) = response.into_parts();
    let text = read_body(body).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(text.parse::<i32>().expect("Failed to parse to integer"), 2);
}

#[tokio::test]
async fn login_works() {
    let (app, _) = create_empty_app();

    let payload = json!({
        "email": "demo@shopmonitor.com",
        "password": "demo123",
        "remember_me": false
    });
    let response = app.oneshot(post_json("/auth/login", &payload)).await.unwrap();

    let (parts, body) = response.into_parts();
    let text = read_body(body).await;
    assert_eq!(parts.status, StatusCode::OK);
    let login: Value = serde_json::from_str(&text).expect("Failed to parse login response");
    assert!(!login["token"].as_str().expect("token missing").is_empty());
    assert_eq!(login["user"]["role"], "user");
    assert_eq!(login["user"]["email"], "demo@shopmonitor.com");
}

#[tokio::test]
async fn login_wrong_password_fails_generically() {
    let (app, _) = create_empty_app();

    let payload = json!({
        "email": "demo@shopmonitor.com",
        "password": "wrong-password"
    });
    let response = app.oneshot(post_json("/auth/login", &payload)).await.unwrap();

    let (parts, body) = response.into_parts();
    let text = read_body(body).await;
    assert_eq!(parts.status, StatusCode::UNAUTHORIZED);
    assert!(text.contains("Invalid email or password"));
    assert!(!text.contains("password was wrong"));
}

#[tokio::test]
async fn login_with_malformed_email_fails_validation() {
    let (app, _) = create_empty_app();

    let payload = json!({
        "email": "not-an-email",
        "password": "demo123"
    });
    let response = app.oneshot(post_json("/auth/login", &payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn session_lifecycle_works() {
    let (app, _) = create_empty_app();

    let payload = json!({
        "email": "demo@shopmonitor.com",
        "password": "demo123",
        "remember_me": true
    });
    let response = app
        .clone()
        .oneshot(post_json("/auth/login", &payload))
        .await
        .unwrap();
    let login: Value = serde_json::from_str(&read_body(response.into_body()).await)
        .expect("Failed to parse login response");
    let token = login["token"].as_str().expect("token missing").to_string();

    let response = app
        .clone()
        .oneshot(get(&format!("/auth/session/{token}")))
        .await
        .unwrap();
    let (parts, body) = response.into_parts();
    let session: Value =
        serde_json::from_str(&read_body(body).await).expect("Failed to parse session");
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(session["remember_me"], true);

    let response = app
        .clone()
        .oneshot(post_json("/auth/logout", &json!({ "token": token })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get(&format!("/auth/session/{token}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_extends_the_session() {
    let (app, _) = create_empty_app();

    let payload = json!({
        "email": "demo@shopmonitor.com",
        "password": "demo123"
    });
    let response = app
        .clone()
        .oneshot(post_json("/auth/login", &payload))
        .await
        .unwrap();
    let login: Value = serde_json::from_str(&read_body(response.into_body()).await)
        .expect("Failed to parse login response");
    let token = login["token"].as_str().expect("token missing");

    let response = app
        .oneshot(post_json("/auth/refresh", &json!({ "token": token })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn demo_users_lists_accounts() {
    let (app, _) = create_empty_app();

    let response = app.oneshot(get("/auth/demo_users")).await.unwrap();

    let (parts, body) = response.into_parts();
    let accounts: Value =
        serde_json::from_str(&read_body(body).await).expect("Failed to parse accounts");
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(accounts.as_array().expect("not an array").len(), 3);
}

#[tokio::test]
async fn add_manual_product_works() {
    let (app, _) = create_empty_app();

    let payload = json!({
        "input_method": "manual",
        "name": "Standing Desk",
        "price": 329.5,
        "retailer": "IKEA",
        "alert_settings": {
            "target_price": 250.0,
            "enable_price_drop": true,
            "notification_methods": ["email"]
        }
    });
    let response = app
        .clone()
        .oneshot(post_json("/products", &payload))
        .await
        .unwrap();
    let (parts, body) = response.into_parts();
    let added: Value = serde_json::from_str(&read_body(body).await).expect("Failed to parse");
    assert_eq!(parts.status, StatusCode::OK);
    let id = added["id"].as_str().expect("id missing");
    assert!(id.starts_with("product_"));

    let response = app.oneshot(get("/products")).await.unwrap();
    let products: Vec<MonitoredProduct> =
        serde_json::from_str(&read_body(response.into_body()).await)
            .expect("Failed to parse products");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].data.name, "Standing Desk");
    assert_eq!(products[0].status, SyncStatus::Pending);
    assert_eq!(products[0].version, 1);
}

#[tokio::test]
async fn add_product_from_url_extracts_the_catalog_entry() {
    let (app, _) = create_empty_app();

    let payload = json!({
        "input_method": "url",
        "product_url": "https://www.amazon.com/dp/B0CHX1W1XY"
    });
    let response = app
        .clone()
        .oneshot(post_json("/products", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/products")).await.unwrap();
    let products: Vec<MonitoredProduct> =
        serde_json::from_str(&read_body(response.into_body()).await)
            .expect("Failed to parse products");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].data.name, "iPhone 15 Pro Max 256GB");
    assert_eq!(
        products[0].data.source_url.as_deref(),
        Some("https://www.amazon.com/dp/B0CHX1W1XY")
    );
}

#[tokio::test]
async fn add_product_from_unsupported_url_fails() {
    let (app, _) = create_empty_app();

    let payload = json!({
        "input_method": "url",
        "product_url": "https://www.ebay.com/itm/1234"
    });
    let response = app.oneshot(post_json("/products", &payload)).await.unwrap();

    let (parts, body) = response.into_parts();
    let text = read_body(body).await;
    assert_eq!(parts.status, StatusCode::BAD_REQUEST);
    assert!(text.contains("supported platform"));
}

#[tokio::test]
async fn adding_n_products_yields_n_unique_ids() {
    let (app, _) = create_empty_app();

    for n in 0..5 {
        let payload = json!({
            "input_method": "manual",
            "name": format!("Product {n}"),
            "price": 10.0 + n as f64,
            "retailer": "Amazon"
        });
        let response = app
            .clone()
            .oneshot(post_json("/products", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(get("/products")).await.unwrap();
    let products: Vec<MonitoredProduct> =
        serde_json::from_str(&read_body(response.into_body()).await)
            .expect("Failed to parse products");
    assert_eq!(products.len(), 5);
    let mut ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}

#[tokio::test]
async fn delete_missing_product_works() {
    let (app, _) = create_seeded_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/product/product_0_missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // the store is unchanged
    let response = app.oneshot(get("/n_products")).await.unwrap();
    let text = read_body(response.into_body()).await;
    assert_eq!(text.parse::<i32>().expect("Failed to parse to integer"), 2);
}

#[tokio::test]
async fn update_status_bumps_the_version() {
    let (app, _) = create_empty_app();

    let payload = json!({
        "input_method": "manual",
        "name": "Robot Vacuum",
        "price": 499.0,
        "retailer": "Walmart"
    });
    let response = app
        .clone()
        .oneshot(post_json("/products", &payload))
        .await
        .unwrap();
    let added: Value = serde_json::from_str(&read_body(response.into_body()).await)
        .expect("Failed to parse response");
    let id = added["id"].as_str().expect("id missing");

    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/product/{id}/status"),
            &json!({ "status": "synced" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/products")).await.unwrap();
    let products: Vec<MonitoredProduct> =
        serde_json::from_str(&read_body(response.into_body()).await)
            .expect("Failed to parse products");
    assert_eq!(products[0].status, SyncStatus::Synced);
    assert_eq!(products[0].version, 2);
}

#[tokio::test]
async fn update_status_rejects_unknown_status() {
    let (app, _) = create_seeded_app();

    let response = app
        .oneshot(put_json(
            "/product/product_1717243200000_a1b2c3d4e/status",
            &json!({ "status": "done" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn extract_works() {
    let (app, _) = create_empty_app();

    let payload = json!({ "url": "https://www.target.com/p/airpods-pro" });
    let response = app.oneshot(post_json("/extract", &payload)).await.unwrap();

    let (parts, body) = response.into_parts();
    let product: Value =
        serde_json::from_str(&read_body(body).await).expect("Failed to parse product");
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(product["name"], "AirPods Pro 2nd Gen");
    assert_eq!(product["retailer"], "Target");
    assert_eq!(product["is_available"], true);
}

#[tokio::test]
async fn dashboard_reflects_an_added_product() {
    let (app, _) = create_empty_app();

    let before = app.clone().oneshot(get("/dashboard")).await.unwrap();
    let before: Value = serde_json::from_str(&read_body(before.into_body()).await)
        .expect("Failed to parse dashboard");
    assert_eq!(before["stats"]["monitored_products"], 0);
    assert_eq!(before["is_first_time_user"], true);

    let payload = json!({
        "input_method": "manual",
        "name": "Espresso Machine",
        "price": 649.0,
        "retailer": "Best Buy"
    });
    let response = app
        .clone()
        .oneshot(post_json("/products", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let after = app.oneshot(get("/dashboard")).await.unwrap();
    let after: Value = serde_json::from_str(&read_body(after.into_body()).await)
        .expect("Failed to parse dashboard");
    assert_eq!(after["stats"]["monitored_products"], 1);
    assert_eq!(after["is_first_time_user"], false);
    let activity = after["recent_activity"]
        .as_array()
        .expect("activity missing");
    assert!(activity
        .iter()
        .any(|item| item["title"] == "Added Espresso Machine"));
}

#[tokio::test]
async fn add_product_publishes_a_change_event() {
    let (app, state) = create_empty_app();
    let mut receiver = state.events.subscribe();

    let payload = json!({
        "input_method": "manual",
        "name": "Monitor Arm",
        "price": 89.0,
        "retailer": "Amazon"
    });
    let response = app.oneshot(post_json("/products", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let event = receiver.recv().await.expect("Failed to receive event");
    assert_eq!(event, ChangeEvent::ProductsChanged);
}

#[tokio::test]
async fn price_sync_stub_accepts() {
    let (app, _) = create_empty_app();

    let response = app
        .oneshot(post_json("/api/prices/sync", &json!({ "products": [] })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}
