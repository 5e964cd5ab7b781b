//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  IdGenerationError (id.rs)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError (in app) → tonic::Status                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error leaves the store exactly as it was before the call.

use thiserror::Error;

use crate::id::IdGenerationError;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No todo with this id.
    ///
    /// ## When This Occurs
    /// - The id was never returned by a successful insert
    /// - The todo has been deleted
    #[error("Todo not found: {id}")]
    NotFound { id: String },

    /// The identifier generator failed.
    #[error("Identifier generation failed: {0}")]
    IdGeneration(#[from] IdGenerationError),

    /// The generator produced an id that is already stored.
    ///
    /// ## When This Occurs
    /// - A custom generator that is not unique enough
    #[error("Generated identifier already in use: {id}")]
    IdCollision { id: String },
}

impl StoreError {
    /// Creates a NotFound error for the given id.
    pub fn not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound { id: id.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
