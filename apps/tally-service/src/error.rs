//! Error types for the Tally service.

use tonic::Status;

use tally_core::{Outcome, ValidationError};
use tally_store::StoreError;

/// Service operation errors.
///
/// Every variant is a synchronous return signal; nothing is retried and the
/// store is left as it was before the failed call.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    #[error("Todo not found: {id}")]
    NotFound { id: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Metric outcome label for this error.
    pub fn outcome(&self) -> Outcome {
        match self {
            ServiceError::InvalidArgument(_) => Outcome::Error,
            ServiceError::NotFound { .. } => Outcome::NotFound,
            ServiceError::Internal(_) => Outcome::Internal,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { id } => ServiceError::NotFound { id },
            err @ (StoreError::IdGeneration(_) | StoreError::IdCollision { .. }) => {
                ServiceError::Internal(err.to_string())
            }
        }
    }
}

impl From<ServiceError> for Status {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::InvalidArgument(err) => Status::invalid_argument(err.to_string()),
            ServiceError::NotFound { id } => Status::not_found(format!("Todo not found: {}", id)),
            ServiceError::Internal(msg) => Status::internal(msg),
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
