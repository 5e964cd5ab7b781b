//! # Todo Store
//!
//! The authoritative map from id to todo.
//!
//! ## Locking Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Single Writer / Multiple Readers                       │
//! │                                                                         │
//! │  insert / update / delete          get / list / counts                 │
//! │  ─────────────────────────         ───────────────────                 │
//! │  write().await                     read().await                        │
//! │       │                                 │                               │
//! │       ▼                                 ▼                               │
//! │  mutate map                        clone out of map                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TodoCounts::scan (full)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  observer.publish(counts)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  guard dropped                                                         │
//! │                                                                         │
//! │  Readers never see a map whose counts have not been published yet.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing ever leaves the store by reference: every read returns a clone.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use tally_core::{NewTodo, Todo, TodoCounts, TodoUpdate};

use crate::error::{StoreError, StoreResult};
use crate::id::{IdGenerator, UuidGenerator};
use crate::observer::{CountsObserver, NoopObserver};

/// In-memory todo store.
///
/// ## Usage
/// ```rust,ignore
/// let store = TodoStore::new().with_observer(metrics.clone());
///
/// let todo = store.insert(new_todo).await?;
/// let todos = store.list().await;
/// ```
pub struct TodoStore {
    todos: RwLock<HashMap<String, Todo>>,
    ids: Arc<dyn IdGenerator>,
    observer: Arc<dyn CountsObserver>,
}

impl Default for TodoStore {
    fn default() -> Self {
        TodoStore::new()
    }
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore").finish_non_exhaustive()
    }
}

impl TodoStore {
    /// Creates an empty store with UUID ids and no observer.
    pub fn new() -> Self {
        TodoStore {
            todos: RwLock::new(HashMap::new()),
            ids: Arc::new(UuidGenerator),
            observer: Arc::new(NoopObserver),
        }
    }

    /// Replaces the identifier generator.
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Replaces the counts observer.
    pub fn with_observer(mut self, observer: Arc<dyn CountsObserver>) -> Self {
        self.observer = observer;
        self
    }

    // =========================================================================
    // Mutations (exclusive access)
    // =========================================================================

    /// Inserts a new todo and returns the stored record.
    ///
    /// The id comes from the generator; `completed` starts false and both
    /// timestamps are set from a single clock reading.
    ///
    /// ## Errors
    /// - `IdGeneration` if the generator fails
    /// - `IdCollision` if the generated id is already stored
    pub async fn insert(&self, new_todo: NewTodo) -> StoreResult<Todo> {
        let id = self.ids.generate()?;

        let mut todos = self.todos.write().await;

        let todo = match todos.entry(id) {
            Entry::Occupied(entry) => {
                return Err(StoreError::IdCollision {
                    id: entry.key().clone(),
                });
            }
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let todo = Todo {
                    id: slot.key().clone(),
                    title: new_todo.title,
                    description: new_todo.description,
                    completed: false,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(todo.clone());
                todo
            }
        };

        debug!(id = %todo.id, "Inserted todo");
        self.publish(&todos);

        Ok(todo)
    }

    /// Overwrites every mutable field of a todo and bumps `updated_at`.
    ///
    /// `updated_at` never moves backwards, even if the wall clock does.
    pub async fn update(&self, id: &str, update: TodoUpdate) -> StoreResult<Todo> {
        let mut todos = self.todos.write().await;

        let todo = todos.get_mut(id).ok_or_else(|| StoreError::not_found(id))?;
        todo.title = update.title;
        todo.description = update.description;
        todo.completed = update.completed;
        todo.updated_at = Utc::now().max(todo.updated_at);
        let updated = todo.clone();

        debug!(id = %id, completed = updated.completed, "Updated todo");
        self.publish(&todos);

        Ok(updated)
    }

    /// Removes a todo, returning the record as it was.
    pub async fn delete(&self, id: &str) -> StoreResult<Todo> {
        let mut todos = self.todos.write().await;

        let removed = todos.remove(id).ok_or_else(|| StoreError::not_found(id))?;

        debug!(id = %id, "Deleted todo");
        self.publish(&todos);

        Ok(removed)
    }

    // =========================================================================
    // Reads (shared access)
    // =========================================================================

    /// Point lookup.
    pub async fn get(&self, id: &str) -> StoreResult<Todo> {
        self.todos
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    /// Snapshot of every todo. Order is unspecified.
    pub async fn list(&self) -> Vec<Todo> {
        self.todos.read().await.values().cloned().collect()
    }

    /// Aggregate counts by full scan.
    pub async fn counts(&self) -> TodoCounts {
        TodoCounts::scan(self.todos.read().await.values())
    }

    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.todos.read().await.is_empty()
    }

    /// Recounts and publishes. Callers must hold the write guard.
    fn publish(&self, todos: &HashMap<String, Todo>) {
        let counts = TodoCounts::scan(todos.values());
        self.observer.publish(counts);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
