//! # Todo Service
//!
//! The five todo operations, each wrapped in the same instrumentation.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         One Request                                     │
//! │                                                                         │
//! │  start timer                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate (no lock) ──── invalid ──────────────────────┐               │
//! │       │                                                │               │
//! │       ▼                                                │               │
//! │  TodoStore (read or write lock)                        │               │
//! │       │   mutations publish todos_total /              │               │
//! │       │   todos_completed_total before unlocking       │               │
//! │       ▼                                                ▼               │
//! │  classify outcome: success | not_found | error | internal              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  grpc_requests_total{method,status} += 1                               │
//! │  grpc_request_duration_seconds{method} observe(elapsed)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cancellation
//! Operations carry no timeout or cancellation token. Callers that need one
//! wrap the future themselves; dropping it before completion skips the
//! metrics for that call.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, warn};

use tally_core::{
    CreateTodoRequest, CreateTodoResponse, DeleteTodoRequest, DeleteTodoResponse,
    GetTodoRequest, GetTodoResponse, ListTodosRequest, ListTodosResponse, NewTodo, Operation,
    Outcome, TodoCounts, UpdateTodoRequest, UpdateTodoResponse,
};
use tally_store::{IdGenerator, TodoStore};

use crate::config::{MetricsConfig, ServiceConfig};
use crate::error::{ServiceError, ServiceResult};
use crate::metrics::{MetricsResult, TodoMetrics};

/// Todo service implementation.
#[derive(Debug)]
pub struct TodoService {
    store: TodoStore,
    metrics: Arc<TodoMetrics>,
}

impl TodoService {
    /// Create a new todo service with an empty store and its own metrics.
    ///
    /// The metrics instance belongs to this service's store alone, so the
    /// gauges always equal a full scan of this store.
    pub fn new(config: &MetricsConfig) -> MetricsResult<Self> {
        Self::build(config, TodoStore::new())
    }

    /// Create a service whose store takes ids from `ids`.
    pub fn with_id_generator(
        config: &MetricsConfig,
        ids: Arc<dyn IdGenerator>,
    ) -> MetricsResult<Self> {
        Self::build(config, TodoStore::new().with_id_generator(ids))
    }

    /// Create a service from the full service configuration.
    pub fn from_config(config: &ServiceConfig) -> MetricsResult<Self> {
        Self::new(&config.metrics)
    }

    fn build(config: &MetricsConfig, store: TodoStore) -> MetricsResult<Self> {
        let metrics = Arc::new(TodoMetrics::new(config)?);
        let store = store.with_observer(metrics.clone());
        Ok(TodoService { store, metrics })
    }

    pub fn metrics(&self) -> &TodoMetrics {
        &self.metrics
    }

    /// Aggregate counts by full scan of the store.
    pub async fn counts(&self) -> TodoCounts {
        self.store.counts().await
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Create a todo.
    ///
    /// The title is checked before the store is touched.
    pub async fn create_todo(
        &self,
        request: CreateTodoRequest,
    ) -> ServiceResult<CreateTodoResponse> {
        self.instrumented(Operation::CreateTodo, async {
            let new_todo = NewTodo::from_request(request)?;
            let todo = self.store.insert(new_todo).await?;
            Ok::<_, ServiceError>(CreateTodoResponse { todo })
        })
        .await
    }

    /// Fetch one todo.
    pub async fn get_todo(&self, request: GetTodoRequest) -> ServiceResult<GetTodoResponse> {
        self.instrumented(Operation::GetTodo, async {
            let todo = self.store.get(&request.id).await?;
            Ok::<_, ServiceError>(GetTodoResponse { todo })
        })
        .await
    }

    /// Overwrite title, description and completion of a todo.
    pub async fn update_todo(
        &self,
        request: UpdateTodoRequest,
    ) -> ServiceResult<UpdateTodoResponse> {
        self.instrumented(Operation::UpdateTodo, async {
            let (id, update) = request.into_parts();
            let todo = self.store.update(&id, update).await?;
            Ok::<_, ServiceError>(UpdateTodoResponse { todo })
        })
        .await
    }

    /// Remove a todo.
    pub async fn delete_todo(
        &self,
        request: DeleteTodoRequest,
    ) -> ServiceResult<DeleteTodoResponse> {
        self.instrumented(Operation::DeleteTodo, async {
            self.store.delete(&request.id).await?;
            Ok::<_, ServiceError>(DeleteTodoResponse { success: true })
        })
        .await
    }

    /// List every todo. Never fails.
    pub async fn list_todos(
        &self,
        _request: ListTodosRequest,
    ) -> ServiceResult<ListTodosResponse> {
        self.instrumented(Operation::ListTodos, async {
            let todos = self.store.list().await;
            Ok::<_, ServiceError>(ListTodosResponse::new(todos))
        })
        .await
    }

    /// Times `call`, then records its outcome and latency.
    async fn instrumented<T, F>(&self, operation: Operation, call: F) -> ServiceResult<T>
    where
        F: Future<Output = ServiceResult<T>>,
    {
        let started = Instant::now();
        let result = call.await;
        let elapsed = started.elapsed();

        let outcome = match &result {
            Ok(_) => Outcome::Success,
            Err(err) => err.outcome(),
        };
        self.metrics.observe(operation, outcome, elapsed);

        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        match &result {
            Ok(_) => debug!(method = %operation, elapsed_ms, "Request completed"),
            Err(err) if outcome == Outcome::Internal => {
                error!(method = %operation, status = %outcome, error = %err, elapsed_ms, "Request failed")
            }
            Err(err) => {
                warn!(method = %operation, status = %outcome, error = %err, elapsed_ms, "Request rejected")
            }
        }

        result
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use tally_core::Todo;
    use tally_store::IdGenerationError;

    use super::*;

    struct BrokenGenerator;

    impl IdGenerator for BrokenGenerator {
        fn generate(&self) -> Result<String, IdGenerationError> {
            Err(IdGenerationError::new("no entropy"))
        }
    }

    fn service() -> TodoService {
        TodoService::from_config(&ServiceConfig::default()).unwrap()
    }

    fn create(title: &str, description: Option<&str>) -> CreateTodoRequest {
        CreateTodoRequest {
            title: title.to_string(),
            description: description.map(str::to_string),
        }
    }

    fn update(id: &str, title: &str, completed: bool) -> UpdateTodoRequest {
        UpdateTodoRequest {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            completed,
        }
    }

    fn gauges(service: &TodoService) -> (i64, i64) {
        (
            service.metrics().total_gauge(),
            service.metrics().completed_gauge(),
        )
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let service = service();

        let created = service
            .create_todo(create("Learn X", Some("d")))
            .await
            .unwrap()
            .todo;
        assert!(!created.completed);
        assert!(!created.id.is_empty());
        assert_eq!(created.description.as_deref(), Some("d"));
        assert_eq!(gauges(&service), (1, 0));

        let fetched = service
            .get_todo(GetTodoRequest { id: created.id.clone() })
            .await
            .unwrap()
            .todo;
        assert_eq!(fetched, created);

        let updated = service
            .update_todo(update(&created.id, "Learn X v2", true))
            .await
            .unwrap()
            .todo;
        assert_eq!(updated.title, "Learn X v2");
        assert!(updated.completed);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(gauges(&service), (1, 1));
        assert_eq!(service.counts().await.completed, 1);

        let deleted = service
            .delete_todo(DeleteTodoRequest { id: created.id.clone() })
            .await
            .unwrap();
        assert!(deleted.success);

        let listed = service.list_todos(ListTodosRequest {}).await.unwrap();
        assert!(listed.todos.is_empty());
        assert_eq!(listed.total, 0);
        assert_eq!(gauges(&service), (0, 0));

        let metrics = service.metrics();
        for operation in Operation::ALL {
            assert_eq!(metrics.request_count(operation, Outcome::Success), 1);
            assert_eq!(metrics.duration_sample_count(operation), 1);
        }
    }

    #[tokio::test]
    async fn test_empty_title_is_rejected_without_state_change() {
        let service = service();
        service.create_todo(create("existing", None)).await.unwrap();
        let before = service.counts().await;

        let err = service.create_todo(create("", Some("d"))).await.unwrap_err();

        assert!(matches!(err, ServiceError::InvalidArgument(_)));
        assert_eq!(service.counts().await, before);
        assert_eq!(gauges(&service), (1, 0));

        let metrics = service.metrics();
        assert_eq!(metrics.request_count(Operation::CreateTodo, Outcome::Error), 1);
        assert_eq!(metrics.request_count(Operation::CreateTodo, Outcome::Success), 1);
        assert_eq!(metrics.duration_sample_count(Operation::CreateTodo), 2);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found_everywhere() {
        let service = service();
        service.create_todo(create("present", None)).await.unwrap();

        let get_err = service
            .get_todo(GetTodoRequest { id: "nope".to_string() })
            .await
            .unwrap_err();
        let update_err = service
            .update_todo(update("nope", "t", true))
            .await
            .unwrap_err();
        let delete_err = service
            .delete_todo(DeleteTodoRequest { id: "nope".to_string() })
            .await
            .unwrap_err();

        for err in [get_err, update_err, delete_err] {
            assert!(matches!(err, ServiceError::NotFound { ref id } if id == "nope"));
        }

        let metrics = service.metrics();
        assert_eq!(metrics.request_count(Operation::GetTodo, Outcome::NotFound), 1);
        assert_eq!(metrics.request_count(Operation::UpdateTodo, Outcome::NotFound), 1);
        assert_eq!(metrics.request_count(Operation::DeleteTodo, Outcome::NotFound), 1);
        assert_eq!(metrics.duration_sample_count(Operation::UpdateTodo), 1);
        assert_eq!(service.counts().await.total, 1);
        assert_eq!(gauges(&service), (1, 0));
    }

    #[tokio::test]
    async fn test_creates_get_distinct_ids_and_counts() {
        let service = service();
        let mut ids = HashSet::new();

        for i in 0..25 {
            let todo = service
                .create_todo(create(&format!("todo {}", i), None))
                .await
                .unwrap()
                .todo;
            ids.insert(todo.id);
        }

        assert_eq!(ids.len(), 25);
        assert_eq!(service.counts().await.total, 25);
        assert_eq!(gauges(&service), (25, 0));

        let listed = service.list_todos(ListTodosRequest::default()).await.unwrap();
        assert_eq!(listed.total, 25);
        let listed_ids: HashSet<_> = listed.todos.into_iter().map(|t| t.id).collect();
        assert_eq!(listed_ids, ids);
    }

    #[tokio::test]
    async fn test_update_twice_differs_only_in_updated_at() {
        let service = service();
        let id = service
            .create_todo(create("Learn X", None))
            .await
            .unwrap()
            .todo
            .id;

        let first = service.update_todo(update(&id, "same", false)).await.unwrap().todo;
        let second = service.update_todo(update(&id, "same", false)).await.unwrap().todo;

        assert!(second.updated_at >= first.updated_at);
        assert_eq!(
            Todo {
                updated_at: first.updated_at,
                ..second
            },
            first
        );
    }

    #[tokio::test]
    async fn test_deleted_todo_is_gone() {
        let service = service();
        let keep = service.create_todo(create("keep", None)).await.unwrap().todo;
        let gone = service.create_todo(create("gone", None)).await.unwrap().todo;

        service
            .delete_todo(DeleteTodoRequest { id: gone.id.clone() })
            .await
            .unwrap();

        let err = service
            .get_todo(GetTodoRequest { id: gone.id.clone() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));

        let listed = service.list_todos(ListTodosRequest {}).await.unwrap();
        assert_eq!(listed.todos, vec![keep]);
        assert!(listed.todos.iter().all(|t| t.id != gone.id));
    }

    #[tokio::test]
    async fn test_id_generator_failure_is_internal() {
        let service =
            TodoService::with_id_generator(&MetricsConfig::default(), Arc::new(BrokenGenerator))
                .unwrap();

        let err = service.create_todo(create("t", None)).await.unwrap_err();

        assert!(matches!(err, ServiceError::Internal(_)));
        assert_eq!(
            service.metrics().request_count(Operation::CreateTodo, Outcome::Internal),
            1
        );
        assert_eq!(service.counts().await.total, 0);
    }

    #[tokio::test]
    async fn test_services_do_not_share_state() {
        let a = service();
        let b = service();

        a.create_todo(create("only in a", None)).await.unwrap();

        assert_eq!(b.list_todos(ListTodosRequest {}).await.unwrap().total, 0);
        assert_eq!(gauges(&b), (0, 0));
        assert_eq!(
            b.metrics().request_count(Operation::CreateTodo, Outcome::Success),
            0
        );
    }

    #[tokio::test]
    async fn test_gauges_follow_only_their_own_store() {
        let a = service();
        for i in 0..3 {
            a.create_todo(create(&format!("a{}", i), None)).await.unwrap();
        }

        let b = service();
        assert_eq!(gauges(&b), (0, 0));
        assert_eq!(b.counts().await.total, 0);

        b.create_todo(create("b0", None)).await.unwrap();

        assert_eq!(gauges(&a), (3, 0));
        assert_eq!(a.counts().await.total, 3);
        assert_eq!(gauges(&b), (1, 0));
        assert_eq!(b.counts().await.total, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_keep_counts_consistent() {
        let service = Arc::new(service());

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let service = service.clone();
                tokio::spawn(async move {
                    let mut owned: Vec<String> = Vec::new();
                    let mut requests = 0u64;
                    for step in 0..60 {
                        let roll = uuid::Uuid::new_v4().as_bytes()[0];
                        requests += 1;
                        match (roll % 4, owned.is_empty()) {
                            (0, _) | (_, true) => {
                                let todo = service
                                    .create_todo(create(&format!("w{}-{}", worker, step), None))
                                    .await
                                    .unwrap()
                                    .todo;
                                owned.push(todo.id);
                            }
                            (1, false) => {
                                let id = owned[roll as usize % owned.len()].clone();
                                service
                                    .update_todo(update(&id, "flip", roll % 2 == 0))
                                    .await
                                    .unwrap();
                            }
                            (2, false) => {
                                let id = owned.swap_remove(roll as usize % owned.len());
                                service
                                    .delete_todo(DeleteTodoRequest { id })
                                    .await
                                    .unwrap();
                            }
                            _ => {
                                service.list_todos(ListTodosRequest {}).await.unwrap();
                            }
                        }

                        let counts = service.counts().await;
                        assert!(counts.completed <= counts.total);
                    }
                    (owned.len(), requests)
                })
            })
            .collect();

        let mut remaining = 0;
        let mut requests = 0;
        for handle in handles {
            let (left, sent) = handle.await.unwrap();
            remaining += left;
            requests += sent;
        }

        let counts = service.counts().await;
        assert_eq!(counts.total, remaining);
        assert_eq!(
            gauges(&service),
            (counts.total as i64, counts.completed as i64)
        );

        let metrics = service.metrics();
        let recorded: u64 = Operation::ALL
            .iter()
            .map(|op| metrics.duration_sample_count(*op))
            .sum();
        assert_eq!(recorded, requests);
    }
}
