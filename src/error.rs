use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Clone, Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Failed to validate request body: {} problem(s)", .0.len())]
    Validation(Vec<ValidationDetail>),
    #[error("Failed to hash password: {0}")]
    PasswordHashFailed(String),
    #[error("Database error: {0}")]
    Database(String),
}

/// One entry of a 422 response body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationDetail {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ApiError {
    pub fn not_found(detail: impl Into<String>) -> Self {
        ApiError::NotFound(detail.into())
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        ApiError::BadRequest(detail.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PasswordHashFailed(_) | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        ApiError::Database(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::NotFound(detail) | ApiError::BadRequest(detail) | ApiError::Conflict(detail) => {
                json!({ "detail": detail })
            }
            ApiError::Validation(details) => json!({ "detail": details }),
            ApiError::PasswordHashFailed(_) | ApiError::Database(_) => {
                json!({ "detail": "Internal server error" })
            }
        };

        let mut response = (self.status(), Json(body)).into_response();
        // Picked up by the logging middleware.
        response.extensions_mut().insert(self);
        response
    }
}
