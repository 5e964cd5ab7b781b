//! # Domain Types
//!
//! Core domain types used throughout Tally.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Todo       │   │    NewTodo      │   │   TodoUpdate    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (opaque)    │   │  title          │   │  title          │       │
//! │  │  title          │   │  description    │   │  description    │       │
//! │  │  description    │   └─────────────────┘   │  completed      │       │
//! │  │  completed      │                         └─────────────────┘       │
//! │  │  created_at     │   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  updated_at     │   │   TodoCounts    │   │ Operation       │       │
//! │  └─────────────────┘   │  total          │   │ Outcome         │       │
//! │                        │  completed      │   │ (metric labels) │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! `id` is assigned by the store at creation and never changes. Its format is
//! whatever the configured generator produces (UUID v4 by default).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationResult;
use crate::validation::{normalize_description, validate_title};

// =============================================================================
// Todo
// =============================================================================

/// A todo item as held by the store.
///
/// Values of this type handed out by the store are copies; mutating one has
/// no effect on the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Opaque unique identifier.
    pub id: String,

    /// Non-empty title.
    pub title: String,

    /// Optional free text.
    pub description: Option<String>,

    /// Whether the todo is done.
    pub completed: bool,

    /// Set once at creation.
    pub created_at: DateTime<Utc>,

    /// Set at creation and on every successful update.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Mutation Inputs
// =============================================================================

/// Validated input for creating a todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
}

impl NewTodo {
    /// Validates a create request.
    ///
    /// ## Errors
    /// `ValidationError::Required` when the title is empty.
    pub fn from_request(request: CreateTodoRequest) -> ValidationResult<Self> {
        validate_title(&request.title)?;

        Ok(NewTodo {
            title: request.title,
            description: normalize_description(request.description),
        })
    }
}

/// Replacement for every mutable field of a todo.
///
/// This is not a patch: all three fields are written even if unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

// =============================================================================
// Aggregate Counts
// =============================================================================

/// Aggregate counts derived from the store contents.
///
/// ## Invariant
/// `completed <= total`, and both equal a full scan of the store at the
/// instant they were taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoCounts {
    /// Number of stored todos.
    pub total: usize,

    /// Number of stored todos with `completed = true`.
    pub completed: usize,
}

impl TodoCounts {
    /// Counts by full traversal.
    pub fn scan<'a>(todos: impl IntoIterator<Item = &'a Todo>) -> Self {
        todos.into_iter().fold(TodoCounts::default(), |mut counts, todo| {
            counts.total += 1;
            if todo.completed {
                counts.completed += 1;
            }
            counts
        })
    }
}

// =============================================================================
// Requests
// =============================================================================

/// CreateTodo request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// GetTodo request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTodoRequest {
    pub id: String,
}

/// UpdateTodo request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl UpdateTodoRequest {
    /// Splits the request into the target id and the replacement fields.
    pub fn into_parts(self) -> (String, TodoUpdate) {
        (
            self.id,
            TodoUpdate {
                title: self.title,
                description: normalize_description(self.description),
                completed: self.completed,
            },
        )
    }
}

/// DeleteTodo request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTodoRequest {
    pub id: String,
}

/// ListTodos request. Carries no fields; listings are not paginated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTodosRequest {}

// =============================================================================
// Responses
// =============================================================================

/// CreateTodo response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodoResponse {
    pub todo: Todo,
}

/// GetTodo response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTodoResponse {
    pub todo: Todo,
}

/// UpdateTodo response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodoResponse {
    pub todo: Todo,
}

/// DeleteTodo response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTodoResponse {
    pub success: bool,
}

/// ListTodos response.
///
/// Order of `todos` is unspecified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTodosResponse {
    pub todos: Vec<Todo>,
    /// Always equal to `todos.len()`.
    pub total: usize,
}

impl ListTodosResponse {
    pub fn new(todos: Vec<Todo>) -> Self {
        let total = todos.len();
        ListTodosResponse { todos, total }
    }
}

// =============================================================================
// Metric Labels
// =============================================================================

/// Service operation, used as the `method` metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateTodo,
    GetTodo,
    UpdateTodo,
    DeleteTodo,
    ListTodos,
}

impl Operation {
    /// All operations, in declaration order.
    pub const ALL: [Operation; 5] = [
        Operation::CreateTodo,
        Operation::GetTodo,
        Operation::UpdateTodo,
        Operation::DeleteTodo,
        Operation::ListTodos,
    ];

    /// Label value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateTodo => "CreateTodo",
            Operation::GetTodo => "GetTodo",
            Operation::UpdateTodo => "UpdateTodo",
            Operation::DeleteTodo => "DeleteTodo",
            Operation::ListTodos => "ListTodos",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result class of an operation, used as the `status` metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    NotFound,
    /// Rejected input.
    Error,
    /// Identifier generation failed.
    Internal,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [
        Outcome::Success,
        Outcome::NotFound,
        Outcome::Error,
        Outcome::Internal,
    ];

    /// Label value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::NotFound => "not_found",
            Outcome::Error => "error",
            Outcome::Internal => "internal",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
