//! Extractors that deserialize and validate request data in one step.
//!
//! Both reject with a [`ValidationExceptionResponse`]: a single message when
//! the payload cannot be parsed at all, one message per violated rule when it
//! parses but fails validation.

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;
use venuebook_core::validation::ValidationExceptionResponse;

use crate::error::AppError;

/// JSON body deserialized into `T` and checked with [`Validate`].
///
/// ```ignore
/// async fn register(ValidatedJson(input): ValidatedJson<RegisterRequest>) -> AppResult<()> {
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            AppError::Validation(ValidationExceptionResponse::single(rejection.body_text()))
        })?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string deserialized into `T` and checked with [`Validate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::Validation(ValidationExceptionResponse::single(rejection.body_text()))
            })?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}
