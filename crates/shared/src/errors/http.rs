use crate::errors::{error::ErrorResponse, repository::RepositoryError, service::ServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

#[derive(Debug)]
pub enum HttpError {
    BadRequest(ErrorResponse),
    Unauthorized(ErrorResponse),
    Forbidden(ErrorResponse),
    NotFound(ErrorResponse),
    Conflict(ErrorResponse),
    BadGateway(ErrorResponse),
    ServiceUnavailable(ErrorResponse),
    Internal(ErrorResponse),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        let code = err.code();

        match err {
            ServiceError::Validation(errors) => HttpError::BadRequest(ErrorResponse::new(
                code,
                format!("Validation failed: {}", errors.join("; ")),
            )),

            ServiceError::PaymentVerificationFailed => HttpError::BadRequest(ErrorResponse::new(
                code,
                "Payment could not be verified",
            )),

            ServiceError::Unauthenticated(msg) => {
                HttpError::Unauthorized(ErrorResponse::new(code, msg))
            }

            ServiceError::Jwt(_) => {
                HttpError::Unauthorized(ErrorResponse::new(code, "Invalid token"))
            }

            ServiceError::Forbidden(msg) => HttpError::Forbidden(ErrorResponse::new(code, msg)),

            ServiceError::NotFound(what) => {
                HttpError::NotFound(ErrorResponse::new(code, format!("{what} not found")))
            }

            ServiceError::ProductNotFound(product_id) => HttpError::NotFound(
                ErrorResponse::new(code, format!("Product {product_id} not found"))
                    .with_product(product_id),
            ),

            ServiceError::OutOfStock {
                product_id,
                requested,
                available,
            } => HttpError::Conflict(
                ErrorResponse::new(
                    code,
                    format!(
                        "Insufficient stock for product {product_id}: requested={requested}, available={available}"
                    ),
                )
                .with_product(product_id),
            ),

            ServiceError::InvalidState(msg) => HttpError::Conflict(ErrorResponse::new(code, msg)),

            ServiceError::AlreadyAssigned(order_id) => HttpError::Conflict(ErrorResponse::new(
                code,
                format!("Order {order_id} is already assigned"),
            )),

            ServiceError::WorkerBusy(_) => HttpError::Conflict(ErrorResponse::new(
                code,
                "Worker already holds an active order",
            )),

            ServiceError::Gateway { message, retryable } => {
                let body = ErrorResponse::new(code, format!("Payment provider error: {message}"));
                if retryable {
                    HttpError::ServiceUnavailable(body)
                } else {
                    HttpError::BadGateway(body)
                }
            }

            ServiceError::Repo(repo_err) => match repo_err {
                RepositoryError::NotFound => {
                    HttpError::NotFound(ErrorResponse::new(code, "Not found"))
                }
                RepositoryError::Conflict(msg) | RepositoryError::AlreadyExists(msg) => {
                    HttpError::Conflict(ErrorResponse::new(code, msg))
                }
                other => {
                    error!("❌ Repository failure surfaced to HTTP: {other}");
                    HttpError::Internal(ErrorResponse::new(code, "Repository error"))
                }
            },

            ServiceError::Kafka(msg) | ServiceError::Internal(msg) => {
                error!("❌ Internal failure surfaced to HTTP: {msg}");
                HttpError::Internal(ErrorResponse::new(code, "Internal server error"))
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            HttpError::BadRequest(body) => (StatusCode::BAD_REQUEST, body),
            HttpError::Unauthorized(body) => (StatusCode::UNAUTHORIZED, body),
            HttpError::Forbidden(body) => (StatusCode::FORBIDDEN, body),
            HttpError::NotFound(body) => (StatusCode::NOT_FOUND, body),
            HttpError::Conflict(body) => (StatusCode::CONFLICT, body),
            HttpError::BadGateway(body) => (StatusCode::BAD_GATEWAY, body),
            HttpError::ServiceUnavailable(body) => (StatusCode::SERVICE_UNAVAILABLE, body),
            HttpError::Internal(body) => (StatusCode::INTERNAL_SERVER_ERROR, body),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_out_of_stock_maps_to_conflict_with_product() {
        let product_id = Uuid::new_v4();
        let err = HttpError::from(ServiceError::OutOfStock {
            product_id,
            requested: 3,
            available: 2,
        });

        match err {
            HttpError::Conflict(body) => {
                assert_eq!(body.code, "OUT_OF_STOCK");
                assert_eq!(body.product_id, Some(product_id));
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn test_verification_failure_hides_details() {
        let err = HttpError::from(ServiceError::PaymentVerificationFailed);

        match err {
            HttpError::BadRequest(body) => {
                assert_eq!(body.code, "PAYMENT_VERIFICATION_FAILED");
                assert_eq!(body.message, "Payment could not be verified");
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn test_retryable_gateway_error_is_service_unavailable() {
        let err = HttpError::from(ServiceError::Gateway {
            message: "timed out".into(),
            retryable: true,
        });

        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
