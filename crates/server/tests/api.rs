use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use server::routes::{api_router, ServerState};
use service::RecordStore;

async fn build_app() -> anyhow::Result<(Router, std::path::PathBuf)> {
    let dir = std::env::temp_dir().join(format!("server_api_{}", Uuid::new_v4()));
    let store = RecordStore::open(&dir).await?;
    Ok((api_router(ServerState::new(store)), dir))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

fn cart() -> Value {
    json!([{"id": "p-1", "name": "Hoodie", "price": 120000, "quantity": 1}])
}

#[tokio::test]
async fn health_reports_ok() -> anyhow::Result<()> {
    let (app, dir) = build_app().await?;
    let (status, body) = send(&app, "GET", "/api/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
    let _ = tokio::fs::remove_dir_all(&dir).await;
    Ok(())
}

#[tokio::test]
async fn register_twice_updates_in_place() -> anyhow::Result<()> {
    let (app, dir) = build_app().await?;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({"name": "Camila", "email": "camila@example.com", "phone": "310"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let id = body["user"]["id"].as_str().unwrap_or_default().to_string();
    assert!(!id.is_empty());
    assert_eq!(body["user"]["address"], "");

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({"name": "Camila R", "email": "camila@example.com", "address": "calle 1 # 2 - 3"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], id.as_str());
    assert_eq!(body["user"]["name"], "Camila R");
    assert_eq!(body["user"]["phone"], "310");

    let (_, body) = send(&app, "GET", "/api/users", None).await?;
    assert_eq!(body["users"].as_array().map(Vec::len), Some(1));

    let (status, body) = send(&app, "GET", &format!("/api/users/{id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "camila@example.com");

    let _ = tokio::fs::remove_dir_all(&dir).await;
    Ok(())
}

#[tokio::test]
async fn register_without_email_is_400() -> anyhow::Result<()> {
    let (app, dir) = build_app().await?;
    let (status, body) = send(&app, "POST", "/api/users", Some(json!({"name": "No Mail"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "POST", "/api/users", Some(json!({"email": ""}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // no body at all
    let (status, _) = send(&app, "POST", "/api/users", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", "/api/users", None).await?;
    assert_eq!(body["users"], json!([]));
    let _ = tokio::fs::remove_dir_all(&dir).await;
    Ok(())
}

#[tokio::test]
async fn order_validation() -> anyhow::Result<()> {
    let (app, dir) = build_app().await?;

    let (status, _) = send(&app, "POST", "/api/orders", Some(json!({"userId": "u1", "items": []}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/orders", Some(json!({"userId": "u1"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/orders", Some(json!({"items": cart()}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({"userId": "u1", "items": cart(), "subtotal": 120000, "shippingCost": 25000, "total": 145000})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let order = &body["order"];
    assert!(order["id"].as_str().is_some_and(|id| id.starts_with("ORDER-")));
    assert_eq!(order["paymentStatus"], "pending");
    assert_eq!(order["total"].as_f64(), Some(145000.0));
    assert_eq!(order["items"][0]["name"], "Hoodie");
    assert_eq!(order["shippingAddress"], "");

    let _ = tokio::fs::remove_dir_all(&dir).await;
    Ok(())
}

#[tokio::test]
async fn orders_filtered_by_user_newest_first() -> anyhow::Result<()> {
    let (app, dir) = build_app().await?;
    let mut mine = Vec::new();
    for user in ["u1", "u2", "u1", "u1"] {
        let (_, body) = send(&app, "POST", "/api/orders", Some(json!({"userId": user, "items": cart()}))).await?;
        if user == "u1" {
            mine.push(body["order"]["id"].as_str().unwrap_or_default().to_string());
        }
        tokio::time::sleep(std::time::Duration::from_millis(3)).await;
    }

    let (status, body) = send(&app, "GET", "/api/orders?userId=u1", None).await?;
    assert_eq!(status, StatusCode::OK);
    let orders = body["orders"].as_array().cloned().unwrap_or_default();
    assert!(orders.iter().all(|o| o["userId"] == "u1"));
    let ids: Vec<String> = orders.iter().map(|o| o["id"].as_str().unwrap_or_default().to_string()).collect();
    mine.reverse();
    assert_eq!(ids, mine);

    let (_, body) = send(&app, "GET", "/api/orders", None).await?;
    assert_eq!(body["orders"].as_array().map(Vec::len), Some(4));

    let (_, body) = send(&app, "GET", "/api/orders?userId=", None).await?;
    assert_eq!(body["orders"].as_array().map(Vec::len), Some(4));

    let _ = tokio::fs::remove_dir_all(&dir).await;
    Ok(())
}

#[tokio::test]
async fn unknown_ids_are_404() -> anyhow::Result<()> {
    let (app, dir) = build_app().await?;
    let (status, body) = send(&app, "GET", "/api/users/does-not-exist", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
    let (status, _) = send(&app, "GET", "/api/orders/ORDER-does-not-exist", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let _ = tokio::fs::remove_dir_all(&dir).await;
    Ok(())
}

#[tokio::test]
async fn openapi_document_lists_routes() -> anyhow::Result<()> {
    let (app, dir) = build_app().await?;
    let (status, body) = send(&app, "GET", "/api/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/orders"].is_object());
    assert!(body["paths"]["/api/users/{id}"].is_object());
    let _ = tokio::fs::remove_dir_all(&dir).await;
    Ok(())
}

#[tokio::test]
async fn production_router_serves_storefront_and_allows_cross_origin() -> anyhow::Result<()> {
    let root = std::env::temp_dir().join(format!("server_app_{}", Uuid::new_v4()));
    let static_dir = root.join("public");
    tokio::fs::create_dir_all(&static_dir).await?;
    tokio::fs::write(static_dir.join("index.html"), "<h1>tienda</h1>").await?;

    let mut cfg = configs::AppConfig::default();
    cfg.server.static_dir = static_dir.display().to_string();
    cfg.storage.data_dir = root.join("data").display().to_string();
    let app = server::startup::build_app(&cfg).await?;

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/index.html").body(Body::empty())?)
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = to_bytes(resp.into_body(), usize::MAX).await?;
    assert_eq!(&page[..], b"<h1>tienda</h1>");

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("origin", "http://shop.example")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("access-control-allow-origin"));

    let (status, _) = send(&app, "GET", "/api/orders", None).await?;
    assert_eq!(status, StatusCode::OK);

    let _ = tokio::fs::remove_dir_all(&root).await;
    Ok(())
}

#[tokio::test]
async fn new_order_keeps_existing_records_and_items_verbatim() -> anyhow::Result<()> {
    let (app, dir) = build_app().await?;
    let existing = json!([
        {
            "id": "ORDER-legacy-1",
            "userId": "u1",
            "items": [{"id": "p-9", "price": "25000", "quantity": 1}],
            "subtotal": 25000,
            "discount": 0,
            "shippingCost": 0,
            "total": 25000,
            "shippingAddress": "",
            "notes": "",
            "paymentStatus": "pending",
            "createdAt": "2024-05-02T15:04:05.000Z"
        },
        {"id": "ORDER-legacy-2", "userId": "u1", "items": [{"sku": "X1"}], "total": "25000"}
    ]);
    tokio::fs::write(dir.join("orders.json"), serde_json::to_vec_pretty(&existing)?).await?;

    let items = json!([{"sku": "X1"}, {"price": 9900, "quantity": 1.5}]);
    let (status, body) = send(&app, "POST", "/api/orders", Some(json!({"userId": "u2", "items": items}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["items"], items);

    let stored: Vec<Value> = serde_json::from_slice(&tokio::fs::read(dir.join("orders.json")).await?)?;
    let ids: Vec<&str> = stored.iter().filter_map(|o| o["id"].as_str()).collect();
    assert_eq!(ids[..2], ["ORDER-legacy-1", "ORDER-legacy-2"]);
    assert_eq!(ids.len(), 3);
    assert_eq!(stored[1], existing[1]);
    assert_eq!(stored[2]["items"], items);

    let (status, body) = send(&app, "GET", "/api/orders/ORDER-legacy-1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["items"][0]["price"], "25000");

    let _ = tokio::fs::remove_dir_all(&dir).await;
    Ok(())
}
