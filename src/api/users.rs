use axum::{
    extract::Extension,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr, TransactionTrait,
};
use std::sync::Arc;
use tracing::info;

use crate::entities::user::{self, hash_password, Entity as UserEntity};
use crate::error::{ApiError, ApiResult};
use crate::middleware::validation::{ValidatedJson, ValidatedPath};
use crate::schemas::{User, UserCreate};

//ROUTERS
pub fn user_router() -> Router {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/", post(create_user))
        .route("/users/:id", get(get_user))
}

//ROUTES
async fn create_user(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    ValidatedJson(payload): ValidatedJson<UserCreate>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let role = payload.parsed_role();
    let txn = db.begin().await?;

    let taken = UserEntity::find()
        .filter(user::Column::Email.eq(payload.email.as_str()))
        .one(&txn)
        .await?;
    if taken.is_some() {
        return Err(email_taken());
    }

    let hashed_password = hash_password(&payload.password)
        .map_err(|err| ApiError::PasswordHashFailed(err.to_string()))?;

    let new_user = user::ActiveModel {
        email: Set(payload.email),
        hashed_password: Set(hashed_password),
        is_active: Set(true),
        role: Set(role),
        ..Default::default()
    };
    // A concurrent registration can still win the race to the unique index.
    let created = new_user.insert(&txn).await.map_err(registration_error)?;
    txn.commit().await?;

    info!(user_id = created.id, role = ?created.role, "Registered user");
    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn get_user(
    ValidatedPath(id): ValidatedPath<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> ApiResult<Json<User>> {
    let txn = db.begin().await?;
    let user = UserEntity::find_by_id(id)
        .filter(user::Column::IsActive.eq(true))
        .one(&txn)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    txn.commit().await?;

    Ok(Json(user.into()))
}

//UTILS
fn email_taken() -> ApiError {
    ApiError::Conflict("Email already registered".to_string())
}

fn registration_error(err: DbErr) -> ApiError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => email_taken(),
        _ => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user::Role;

    fn new_user(email: &str) -> user::ActiveModel {
        user::ActiveModel {
            email: Set(email.to_string()),
            hashed_password: Set("not-a-real-hash".to_string()),
            is_active: Set(true),
            role: Set(Role::Buyer),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn duplicate_email_insert_maps_to_conflict() {
        let db = crate::connect("sqlite::memory:", 1)
            .await
            .expect("Failed to prepare test database");

        new_user("twin@example.com")
            .insert(&*db)
            .await
            .expect("First insert should succeed");
        let err = new_user("twin@example.com")
            .insert(&*db)
            .await
            .expect_err("Second insert should hit the unique index");

        match registration_error(err) {
            ApiError::Conflict(detail) => assert_eq!(detail, "Email already registered"),
            other => panic!("Expected a conflict, got {:?}", other),
        }
    }

    #[test]
    fn other_database_errors_stay_internal() {
        let err = registration_error(DbErr::Custom("disk full".to_string()));
        assert!(matches!(err, ApiError::Database(_)));
    }
}
