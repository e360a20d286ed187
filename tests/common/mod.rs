#![allow(dead_code)]

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

/// Starts the app on a random port over a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    // One connection: every pooled SQLite memory connection is its own database.
    let db = catalog_backend::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to prepare test database");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        axum::serve(listener, catalog_backend::app(db))
            .await
            .expect("Test server failed");
    });

    TestApp {
        address: format!("http://{}", addr),
        client: Client::new(),
    }
}

pub struct TestApp {
    pub address: String,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create_category(&self, name: &str, parent_id: Option<i64>) -> i64 {
        let response = self
            .client
            .post(self.url("/categories/"))
            .json(&json!({ "name": name, "parent_id": parent_id }))
            .send()
            .await
            .expect("Failed to send create category request");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = response
            .json::<Value>()
            .await
            .expect("Failed to parse create category response JSON");
        body["id"].as_i64().expect("Category id not found")
    }

    pub async fn deactivate_category(&self, id: i64) {
        let response = self
            .client
            .delete(self.url(&format!("/categories/{}", id)))
            .send()
            .await
            .expect("Failed to send delete category request");
        assert_eq!(response.status(), StatusCode::OK);
    }

    pub async fn create_product(&self, payload: &Value) -> Value {
        let response = self
            .client
            .post(self.url("/products/"))
            .json(payload)
            .send()
            .await
            .expect("Failed to send create product request");
        assert_eq!(response.status(), StatusCode::CREATED);

        response
            .json::<Value>()
            .await
            .expect("Failed to parse create product response JSON")
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");
        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .unwrap_or(Value::Null);
        (status, body)
    }
}

pub fn widget(category_id: i64) -> Value {
    json!({
        "name": "Widget",
        "price": 9.99,
        "stock": 5,
        "category_id": category_id
    })
}
