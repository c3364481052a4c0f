//! Test support: an in-process stub of the remote catalog API.

#![allow(dead_code)]

use axum::{Json, Router, extract::Path, http::StatusCode, routing::get};
use serde_json::{Value, json};

/// The fixture catalog served by the stub.
pub fn fixture_products() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "title": "Walnut Serving Board",
            "price": 10.0,
            "description": "End-grain walnut board for bread and cheese",
            "category": "kitchen",
            "image": "https://example.com/board.jpg",
            "rating": { "rate": 4.6, "count": 212 }
        }),
        json!({
            "id": 2,
            "title": "Stoneware Mug",
            "price": 5.5,
            "description": "Hand-thrown 12oz stoneware mug",
            "category": "kitchen",
            "image": "https://example.com/mug.jpg",
            "rating": { "rate": 4.1, "count": 87 }
        }),
        json!({
            "id": 3,
            "title": "Canvas Tote",
            "price": 18.25,
            "description": "Heavy canvas tote with leather straps",
            "category": "fine goods",
            "image": "https://example.com/tote.jpg",
            "rating": { "rate": 3.9, "count": 40 }
        }),
    ]
}

async fn products() -> Json<Value> {
    Json(Value::Array(fixture_products()))
}

async fn product(Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    fixture_products()
        .into_iter()
        .find(|p| p["id"] == json!(id))
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn categories() -> Json<Value> {
    Json(json!(["kitchen", "fine goods"]))
}

async fn products_by_category(Path(name): Path<String>) -> Json<Value> {
    let matching = fixture_products()
        .into_iter()
        .filter(|p| p["category"] == json!(name))
        .collect();
    Json(Value::Array(matching))
}

/// Serve the stub catalog on an ephemeral port, returning its base URL.
pub async fn spawn_catalog_stub() -> String {
    let router = Router::new()
        .route("/products", get(products))
        .route("/products/categories", get(categories))
        .route("/products/category/{name}", get(products_by_category))
        .route("/products/{id}", get(product));

    spawn(router).await
}

/// Serve a catalog whose every endpoint fails with HTTP 500.
pub async fn spawn_failing_catalog_stub() -> String {
    let router = Router::new().fallback(|| async { StatusCode::INTERNAL_SERVER_ERROR });

    spawn(router).await
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve stub");
    });

    format!("http://{addr}")
}
