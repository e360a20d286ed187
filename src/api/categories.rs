use axum::{
    extract::Extension,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::entities::category::{self, Entity as CategoryEntity};
use crate::error::{ApiError, ApiResult};
use crate::middleware::validation::{ValidatedJson, ValidatedPath};
use crate::schemas::{Category, CategoryCreate};

//ROUTERS
pub fn category_router() -> Router {
    Router::new()
        .route("/categories", get(get_categories).post(create_category))
        .route("/categories/", get(get_categories).post(create_category))
        .route(
            "/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

//ROUTES
async fn get_categories(
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<Vec<Category>>> {
    let txn = db.begin().await?;
    let categories = CategoryEntity::find()
        .filter(category::Column::IsActive.eq(true))
        .order_by_asc(category::Column::Id)
        .all(&txn)
        .await?;
    txn.commit().await?;

    Ok(Json(categories.into_iter().map(Category::from).collect()))
}

async fn create_category(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    ValidatedJson(payload): ValidatedJson<CategoryCreate>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let txn = db.begin().await?;

    if let Some(parent_id) = payload.parent_id {
        if find_active_category(&txn, parent_id).await?.is_none() {
            return Err(ApiError::bad_request("Parent category not found"));
        }
    }

    let new_category = category::ActiveModel {
        name: Set(payload.name),
        parent_id: Set(payload.parent_id),
        is_active: Set(true),
        ..Default::default()
    };
    let created = new_category.insert(&txn).await?;
    txn.commit().await?;

    info!(category_id = created.id, "Created category");
    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn get_category(
    ValidatedPath(id): ValidatedPath<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<Category>> {
    let txn = db.begin().await?;
    let category = find_active_category(&txn, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;
    txn.commit().await?;

    Ok(Json(category.into()))
}

async fn update_category(
    ValidatedPath(id): ValidatedPath<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    ValidatedJson(payload): ValidatedJson<CategoryCreate>,
) -> ApiResult<Json<Category>> {
    let txn = db.begin().await?;

    let existing = find_active_category(&txn, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;

    if let Some(parent_id) = payload.parent_id {
        if parent_id == id {
            return Err(ApiError::bad_request("Category cannot be its own parent"));
        }
        if find_active_category(&txn, parent_id).await?.is_none() {
            return Err(ApiError::bad_request("Parent category not found"));
        }
    }

    let mut category: category::ActiveModel = existing.into();
    category.name = Set(payload.name);
    category.parent_id = Set(payload.parent_id);

    let updated = category.update(&txn).await?;
    txn.commit().await?;

    info!(category_id = updated.id, "Updated category");
    Ok(Json(updated.into()))
}

async fn delete_category(
    ValidatedPath(id): ValidatedPath<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<Value>> {
    let txn = db.begin().await?;

    if find_active_category(&txn, id).await?.is_none() {
        return Err(ApiError::not_found("Category not found"));
    }

    CategoryEntity::update_many()
        .col_expr(category::Column::IsActive, Expr::value(false))
        .filter(category::Column::Id.eq(id))
        .exec(&txn)
        .await?;
    txn.commit().await?;

    info!(category_id = id, "Deactivated category");
    Ok(Json(json!({
        "status": "success",
        "message": "Category marked as inactive"
    })))
}

//UTILS
/// Active-scoped lookup shared by every route that accepts a category reference.
pub(crate) async fn find_active_category<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<Option<category::Model>, DbErr> {
    CategoryEntity::find_by_id(id)
        .filter(category::Column::IsActive.eq(true))
        .one(conn)
        .await
}
