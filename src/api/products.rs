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
use std::sync::Arc;
use tracing::info;

use crate::api::categories::find_active_category;
use crate::entities::product::{self, Entity as ProductEntity};
use crate::error::{ApiError, ApiResult};
use crate::middleware::validation::{ValidatedJson, ValidatedPath};
use crate::schemas::{Product, ProductCreate};

//ROUTERS
pub fn product_router() -> Router {
    Router::new()
        .route("/products", get(get_products).post(create_product))
        .route("/products/", get(get_products).post(create_product))
        .route("/products/category/:category_id", get(get_products_by_category))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

//ROUTES
async fn get_products(
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<Vec<Product>>> {
    let txn = db.begin().await?;
    let products = ProductEntity::find()
        .filter(product::Column::IsActive.eq(true))
        .order_by_asc(product::Column::Id)
        .all(&txn)
        .await?;
    txn.commit().await?;

    Ok(Json(products.into_iter().map(Product::from).collect()))
}

async fn create_product(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    ValidatedJson(payload): ValidatedJson<ProductCreate>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let txn = db.begin().await?;

    if find_active_category(&txn, payload.category_id).await?.is_none() {
        return Err(ApiError::not_found("Category not found"));
    }

    let new_product = product::ActiveModel {
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        image_url: Set(payload.image_url),
        stock: Set(payload.stock),
        category_id: Set(payload.category_id),
        is_active: Set(true),
        ..Default::default()
    };
    let created = new_product.insert(&txn).await?;
    txn.commit().await?;

    info!(product_id = created.id, category_id = created.category_id, "Created product");
    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn get_products_by_category(
    ValidatedPath(category_id): ValidatedPath<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<Vec<Product>>> {
    let txn = db.begin().await?;

    if find_active_category(&txn, category_id).await?.is_none() {
        return Err(ApiError::not_found("Category not found or inactive"));
    }

    let products = ProductEntity::find()
        .filter(product::Column::CategoryId.eq(category_id))
        .filter(product::Column::IsActive.eq(true))
        .order_by_asc(product::Column::Id)
        .all(&txn)
        .await?;
    txn.commit().await?;

    Ok(Json(products.into_iter().map(Product::from).collect()))
}

async fn get_product(
    ValidatedPath(id): ValidatedPath<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<Product>> {
    let txn = db.begin().await?;

    let product = find_active_product(&txn, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    // The product exists, so a missing category is an integrity problem, not a 404.
    if find_active_category(&txn, product.category_id).await?.is_none() {
        return Err(ApiError::bad_request("Category not found"));
    }
    txn.commit().await?;

    Ok(Json(product.into()))
}

async fn update_product(
    ValidatedPath(id): ValidatedPath<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    ValidatedJson(payload): ValidatedJson<ProductCreate>,
) -> ApiResult<Json<Product>> {
    let txn = db.begin().await?;

    let existing = find_active_product(&txn, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    if find_active_category(&txn, payload.category_id).await?.is_none() {
        return Err(ApiError::bad_request("Category not found"));
    }

    let mut product: product::ActiveModel = existing.into();
    product.name = Set(payload.name);
    product.description = Set(payload.description);
    product.price = Set(payload.price);
    product.image_url = Set(payload.image_url);
    product.stock = Set(payload.stock);
    product.category_id = Set(payload.category_id);

    let updated = product.update(&txn).await?;
    txn.commit().await?;

    info!(product_id = updated.id, "Updated product");
    Ok(Json(updated.into()))
}

async fn delete_product(
    ValidatedPath(id): ValidatedPath<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<Product>> {
    let txn = db.begin().await?;

    let snapshot = find_active_product(&txn, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    ProductEntity::update_many()
        .col_expr(product::Column::IsActive, Expr::value(false))
        .filter(product::Column::Id.eq(id))
        .filter(product::Column::IsActive.eq(true))
        .exec(&txn)
        .await?;
    txn.commit().await?;

    info!(product_id = id, "Deactivated product");
    // Returned as loaded, before deactivation.
    Ok(Json(snapshot.into()))
}

//UTILS
async fn find_active_product<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<Option<product::Model>, DbErr> {
    ProductEntity::find_by_id(id)
        .filter(product::Column::IsActive.eq(true))
        .one(conn)
        .await
}
