//! # tally-store: In-Memory Store for Tally
//!
//! Holds every todo behind a single `tokio::sync::RwLock` and derives the
//! aggregate counts from it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Data Flow                                  │
//! │                                                                         │
//! │  TodoService::update_todo                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    tally-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   TodoStore   │    │  IdGenerator  │    │CountsObserver│  │   │
//! │  │   │  (store.rs)   │───►│   (id.rs)     │    │(observer.rs) │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ RwLock<Map>   │    │ UuidGenerator │    │ gauges, fed  │  │   │
//! │  │   │ full-scan     │───────────────────────►│ under write  │  │   │
//! │  │   │ counts        │    │               │    │ lock         │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The store itself
//! - [`id`] - Identifier generation seam
//! - [`observer`] - Aggregate count publication seam
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust
//! use tally_core::NewTodo;
//! use tally_store::TodoStore;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = TodoStore::new();
//!
//! let todo = store
//!     .insert(NewTodo { title: "Learn X".to_string(), description: None })
//!     .await?;
//!
//! assert_eq!(store.get(&todo.id).await?, todo);
//! assert_eq!(store.counts().await.total, 1);
//! # Ok::<(), tally_store::StoreError>(())
//! # }).unwrap();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod id;
pub mod observer;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use id::{IdGenerationError, IdGenerator, UuidGenerator};
pub use observer::{CountsObserver, NoopObserver};
pub use store::TodoStore;
