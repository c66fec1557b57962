//! End-to-end API tests
//!
//! Drives the full router against the in-memory store: login, catalog
//! management, order placement with stock reservation, dashboard stats and
//! upload.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use atelier_server::auth::JwtConfig;
use atelier_server::core::{Config, ServerState, build_app};

// Minimal PNG header, enough for format sniffing
const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00,
];

fn test_config(upload_dir: &std::path::Path) -> Config {
    Config {
        http_port: 0,
        public_url: "http://localhost:8000".to_string(),
        allowed_origins: vec!["http://localhost:3000".to_string()],
        store_url: None,
        store_service_key: String::new(),
        storage_url: None,
        storage_bucket: None,
        upload_dir: upload_dir.to_string_lossy().to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret-key-of-sufficient-length".to_string(),
            expiration_minutes: 60,
            issuer: "atelier-server".to_string(),
        },
        admin_email: "admin@atelier.shop".to_string(),
        admin_password: "admin123".to_string(),
        sync_admin_password: false,
        environment: "development".to_string(),
    }
}

async fn spawn_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let state = ServerState::initialize(&config).await.unwrap();
    (build_app(&config).with_state(state), dir)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_authed(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn json_authed(method: &str, uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn login(app: &Router) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/admin/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=admin%40atelier.shop&password=admin123"))
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_full_storefront_flow() {
    let (app, _dir) = spawn_app().await;
    let token = login(&app).await;

    // identity endpoint reflects the bootstrapped admin
    let (status, me) = send(&app, get_authed("/admin/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "admin@atelier.shop");
    assert_eq!(me["is_active"], true);

    // create a product
    let (status, product) = send(
        &app,
        json_authed(
            "POST",
            "/admin/products",
            &token,
            &json!({
                "name": "Tote",
                "description": "Hand-stitched canvas tote",
                "price": 20.0,
                "category": "Bags",
                "stock_quantity": 2
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let product_id = product["id"].as_i64().unwrap();
    assert_eq!(product["is_available"], true);

    // public listing sees it
    let (status, products) = send(&app, get("/products")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(products.as_array().unwrap().len(), 1);

    // place an order for the full stock
    let order_body = json!({
        "customer_info": {
            "name": "Nour",
            "email": "nour@example.com",
            "phone": "+20100000000",
            "address": "12 Market Street"
        },
        "items": [{ "product_id": product_id, "quantity": 2 }]
    });
    let request = Request::builder()
        .method("POST")
        .uri("/orders")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(order_body.to_string()))
        .unwrap();
    let (status, order) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total_amount"], 40.0);
    let order_id = order["id"].as_i64().unwrap();

    // stock is now zero
    let (_, product) = send(&app, get(&format!("/products/{}", product_id))).await;
    assert_eq!(product["stock_quantity"], 0);

    // a second order cannot oversell
    let second = json!({
        "customer_info": {
            "name": "Nour",
            "email": "nour@example.com",
            "phone": "+20100000000",
            "address": "12 Market Street"
        },
        "items": [{ "product_id": product_id, "quantity": 1 }]
    });
    let request = Request::builder()
        .method("POST")
        .uri("/orders")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(second.to_string()))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("Insufficient stock")
    );

    // confirm the order
    let (status, updated) = send(
        &app,
        json_authed(
            "PUT",
            &format!("/admin/orders/{}/status", order_id),
            &token,
            &json!({ "status": "confirmed" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["success"], true);
    assert_eq!(updated["order"]["status"], "confirmed");

    // order listing attaches items
    let (status, orders) = send(&app, get_authed("/admin/orders", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["items"].as_array().unwrap().len(), 1);
    assert_eq!(orders[0]["items"][0]["price_per_unit"], 20.0);

    // dashboard: the confirmed order is revenue, the empty shelf is low stock
    let (status, stats) = send(&app, get_authed("/admin/dashboard/stats", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_products"], 1);
    assert_eq!(stats["total_orders"], 1);
    assert_eq!(stats["pending_orders"], 0);
    assert_eq!(stats["total_revenue"], 40.0);
    assert_eq!(stats["low_stock_products"], 1);
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let (app, _dir) = spawn_app().await;

    let (status, body) = send(&app, get("/admin/orders")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, get_authed("/admin/orders", "not-a-real-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_authed(
            "POST",
            "/admin/products",
            "garbage",
            &json!({ "name": "X", "price": 1.0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_failure_is_generic() {
    let (app, _dir) = spawn_app().await;

    // wrong password and unknown user produce the same response
    for body in [
        "username=admin%40atelier.shop&password=wrong",
        "username=nobody%40atelier.shop&password=admin123",
    ] {
        let request = Request::builder()
            .method("POST")
            .uri("/admin/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        let (status, response) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(response["success"], false);
        assert_eq!(response["message"], "Incorrect email or password");
    }
}

#[tokio::test]
async fn test_product_validation_at_the_boundary() {
    let (app, _dir) = spawn_app().await;
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        json_authed(
            "POST",
            "/admin/products",
            &token,
            &json!({ "name": "Broken", "price": -5.0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &app,
        json_authed("PUT", "/admin/products/999", &token, &json!({ "price": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_stores_content_addressed_file() {
    let (app, dir) = spawn_app().await;
    let token = login(&app).await;

    let boundary = "X-ATELIER-BOUNDARY";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"photo.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(PNG_BYTES);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/admin/upload")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, response) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], true);

    let filename = response["filename"].as_str().unwrap();
    assert!(filename.ends_with(".png"));
    assert_eq!(
        response["url"].as_str().unwrap(),
        format!("http://localhost:8000/uploads/{}", filename)
    );

    // the blob landed in the local upload dir under its content hash
    assert!(dir.path().join(filename).exists());
}
