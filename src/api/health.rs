use axum::{extract::Extension, routing::get, Json, Router};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::ApiResult;

pub fn health_router() -> Router {
    Router::new().route("/health", get(health))
}

async fn health(Extension(db): Extension<Arc<DatabaseConnection>>) -> ApiResult<Json<Value>> {
    db.ping().await?;
    Ok(Json(json!({ "status": "ok" })))
}
