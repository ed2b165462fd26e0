use crate::domain::requests::validation_messages;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use shared::errors::{ErrorResponse, HttpError, ServiceError};
use validator::Validate;

pub struct SimpleValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for SimpleValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                HttpError::BadRequest(ErrorResponse::new(
                    "VALIDATION_ERROR",
                    format!("Invalid JSON: {}", rejection.body_text()),
                ))
            })?;

        value
            .validate()
            .map_err(|errors| ServiceError::Validation(validation_messages(&errors)))?;

        Ok(Self(value))
    }
}
