//! # tally-core: Pure Domain Types for Tally
//!
//! The todo record, the request/response shapes the service speaks, and the
//! validation rules that run before any lock is taken.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Tally Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Transport (gRPC / HTTP, not in this repo)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CreateTodoRequest, ...                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tally-service (operations + metrics)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                tally-store (RwLock<HashMap<id, Todo>>)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ★ tally-core (THIS CRATE) is used by every layer above ★              │
//! │     types • validation • error   NO I/O • NO LOCKS                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Todo, TodoCounts, requests, responses, labels)
//! - [`error`] - Validation error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{CreateTodoRequest, NewTodo};
//!
//! let request = CreateTodoRequest {
//!     title: "Learn Rust".to_string(),
//!     description: Some(String::new()),
//! };
//!
//! let new_todo = NewTodo::from_request(request).unwrap();
//! assert_eq!(new_todo.title, "Learn Rust");
//! // Empty descriptions are treated as absent
//! assert_eq!(new_todo.description, None);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ValidationError, ValidationResult};
pub use types::*;
