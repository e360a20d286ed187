mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

use common::spawn_app;

#[tokio::test]
async fn test_create_and_list_categories() {
    let app = spawn_app().await;

    let (status, body) = app.get("/categories/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(vec![]));

    let parent = app.create_category("Electronics", None).await;
    let child = app.create_category("Phones", Some(parent)).await;

    let (status, body) = app.get(&format!("/categories/{}", child)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Phones");
    assert_eq!(body["parent_id"], parent);
    assert_eq!(body["is_active"], true);

    let (_, body) = app.get("/categories").await;
    let categories = body.as_array().expect("Expected a JSON array");
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["parent_id"], Value::Null);
}

#[tokio::test]
async fn test_create_category_rejects_bad_input() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/categories/"))
        .json(&json!({ "name": "ab" }))
        .send()
        .await
        .expect("Failed to send create category request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .client
        .post(app.url("/categories/"))
        .json(&json!({ "name": "Orphans", "parent_id": 42 }))
        .send()
        .await
        .expect("Failed to send create category request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body["detail"], "Parent category not found");

    let retired = app.create_category("Retired", None).await;
    app.deactivate_category(retired).await;
    let response = app
        .client
        .post(app.url("/categories/"))
        .json(&json!({ "name": "Orphans", "parent_id": retired }))
        .send()
        .await
        .expect("Failed to send create category request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_category() {
    let app = spawn_app().await;
    let parent = app.create_category("Electronics", None).await;
    let id = app.create_category("Phones", None).await;
    let path = format!("/categories/{}", id);

    let response = app
        .client
        .put(app.url(&path))
        .json(&json!({ "name": "Smartphones", "parent_id": parent }))
        .send()
        .await
        .expect("Failed to send update category request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body["name"], "Smartphones");
    assert_eq!(body["parent_id"], parent);

    let response = app
        .client
        .put(app.url(&path))
        .json(&json!({ "name": "Smartphones", "parent_id": id }))
        .send()
        .await
        .expect("Failed to send update category request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body["detail"], "Category cannot be its own parent");

    let response = app
        .client
        .put(app.url("/categories/999"))
        .json(&json!({ "name": "Ghosts" }))
        .send()
        .await
        .expect("Failed to send update category request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body["detail"], "Category not found");
}

#[tokio::test]
async fn test_delete_category_is_soft() {
    let app = spawn_app().await;
    let id = app.create_category("Seasonal", None).await;
    let path = format!("/categories/{}", id);

    let response = app
        .client
        .delete(app.url(&path))
        .send()
        .await
        .expect("Failed to send delete category request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Category marked as inactive");

    let (status, body) = app.get(&path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Category not found");

    let (_, body) = app.get("/categories/").await;
    assert_eq!(body, Value::Array(vec![]));

    let response = app
        .client
        .delete(app.url(&path))
        .send()
        .await
        .expect("Failed to send delete category request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_category_id_is_unprocessable() {
    let app = spawn_app().await;

    let (status, body) = app.get("/categories/abc").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["path", "id"]));
}
