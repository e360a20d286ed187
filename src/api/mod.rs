pub mod categories;
pub mod health;
pub mod products;
pub mod users;

use axum::{middleware::from_fn, Extension, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use categories::category_router;
use health::health_router;
use products::product_router;
use users::user_router;

use crate::middleware::logging::logging_middleware;

pub fn create_api_router(shared_db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .merge(product_router())
        .merge(category_router())
        .merge(user_router())
        .merge(health_router())
        .layer(from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(shared_db))
}
