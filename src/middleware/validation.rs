//! Extractors that turn malformed input into 422 `ApiError::Validation`.

use axum::{
    async_trait,
    extract::{
        path::ErrorKind, rejection::PathRejection, FromRequest, FromRequestParts, Json, Path,
        RawPathParams, Request,
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::{ApiError, ValidationDetail};

/// Rejects with `ApiError::Validation` (422) when the body is not valid JSON
/// for `T` or when any field rule fails.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(vec![ValidationDetail {
                    loc: vec!["body".to_string()],
                    msg: rejection.body_text(),
                    kind: "json_invalid".to_string(),
                }])
            })?;

        data.validate()
            .map_err(|errors| ApiError::Validation(to_details(&errors)))?;

        Ok(ValidatedJson(data))
    }
}

/// `Path<T>` whose rejection is a 422 pointing at the offending path parameter.
pub struct ValidatedPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ValidatedPath(value)),
            Err(rejection) => {
                let key = match rejected_key(&rejection) {
                    Some(key) => Some(key),
                    // Single-value paths report no key; take it from the route.
                    None => RawPathParams::from_request_parts(parts, state)
                        .await
                        .ok()
                        .and_then(|params| params.iter().next().map(|(key, _)| key.to_string())),
                };

                let mut loc = vec!["path".to_string()];
                loc.extend(key);
                Err(ApiError::Validation(vec![ValidationDetail {
                    loc,
                    msg: rejection.body_text(),
                    kind: "path_invalid".to_string(),
                }]))
            }
        }
    }
}

fn rejected_key(rejection: &PathRejection) -> Option<String> {
    match rejection {
        PathRejection::FailedToDeserializePathParams(err) => match err.kind() {
            ErrorKind::ParseErrorAtKey { key, .. } | ErrorKind::InvalidUtf8InPathParam { key } => {
                Some(key.clone())
            }
            _ => None,
        },
        _ => None,
    }
}

fn to_details(errors: &ValidationErrors) -> Vec<ValidationDetail> {
    let mut details: Vec<ValidationDetail> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |err| ValidationDetail {
                loc: vec!["body".to_string(), field.to_string()],
                msg: err
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {field}")),
                kind: err.code.to_string(),
            })
        })
        .collect();
    details.sort_by(|a, b| a.loc.cmp(&b.loc));
    details
}
