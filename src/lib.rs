pub mod api;
pub mod config;
pub mod entities;
pub mod error;
pub mod middleware;
pub mod schemas;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::sync::Arc;

use crate::api::create_api_router;
use crate::entities::setup_schema;

pub use crate::config::Config;

/// Connects, makes sure the tables exist and hands back the shared handle.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<Arc<DatabaseConnection>, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(max_connections)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    setup_schema(&db).await?;
    Ok(Arc::new(db))
}

pub fn app(db: Arc<DatabaseConnection>) -> axum::Router {
    create_api_router(db)
}
