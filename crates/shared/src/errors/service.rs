use crate::errors::repository::RepositoryError;
use jsonwebtoken::errors::Error as JwtError;
use rdkafka::error::KafkaError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepositoryError),

    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Product {0} not found")]
    ProductNotFound(Uuid),

    #[error("Product {product_id} is out of stock: requested={requested}, available={available}")]
    OutOfStock {
        product_id: Uuid,
        requested: i32,
        available: i32,
    },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Order {0} is already assigned")]
    AlreadyAssigned(Uuid),

    #[error("Worker {0} already holds an active order")]
    WorkerBusy(Uuid),

    #[error("Payment verification failed")]
    PaymentVerificationFailed,

    #[error("Payment gateway error: {message}")]
    Gateway { message: String, retryable: bool },

    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),

    #[error("Kafka error: {0}")]
    Kafka(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable machine-readable code, safe to expose to clients.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Repo(RepositoryError::NotFound) => "NOT_FOUND",
            ServiceError::Repo(RepositoryError::Conflict(_)) => "CONFLICT",
            ServiceError::Repo(RepositoryError::AlreadyExists(_)) => "CONFLICT",
            ServiceError::Repo(_) => "INTERNAL_ERROR",
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::Unauthenticated(_) | ServiceError::Jwt(_) => "UNAUTHENTICATED",
            ServiceError::Forbidden(_) => "FORBIDDEN",
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            ServiceError::OutOfStock { .. } => "OUT_OF_STOCK",
            ServiceError::InvalidState(_) => "INVALID_STATE",
            ServiceError::AlreadyAssigned(_) => "ALREADY_ASSIGNED",
            ServiceError::WorkerBusy(_) => "WORKER_BUSY",
            ServiceError::PaymentVerificationFailed => "PAYMENT_VERIFICATION_FAILED",
            ServiceError::Gateway { .. } => "GATEWAY_ERROR",
            ServiceError::Kafka(_) | ServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ServiceError::Gateway {
                retryable: true,
                ..
            }
        )
    }
}

impl From<KafkaError> for ServiceError {
    fn from(error: KafkaError) -> Self {
        ServiceError::Kafka(error.to_string())
    }
}
