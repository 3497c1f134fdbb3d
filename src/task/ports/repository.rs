//! Repository ports for task and category persistence.

use crate::task::domain::{Category, CategoryId, Task, TaskId, TaskQuery, TaskStatus};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

/// Result type for repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists or [`TaskRepositoryError::CategoryNotFound`] when its category
    /// does not exist.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task (fields, status, timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Permanently removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the tasks selected by `query`, in query order.
    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns tasks with `status` due between `from` and `to`, inclusive.
    async fn list_due_between(
        &self,
        status: TaskStatus,
        from: NaiveDate,
        to: NaiveDate,
    ) -> TaskRepositoryResult<Vec<Task>>;
}

/// Category persistence contract.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Stores a new category.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateCategory`] when the category ID
    /// already exists.
    async fn store_category(&self, category: &Category) -> TaskRepositoryResult<()>;

    /// Finds a category by identifier.
    ///
    /// Returns `None` when the category does not exist.
    async fn find_category(&self, id: CategoryId) -> TaskRepositoryResult<Option<Category>>;

    /// Returns every category ordered by name.
    async fn list_categories(&self) -> TaskRepositoryResult<Vec<Category>>;
}

/// Storage backend offering both task and category persistence.
pub trait TaskStore: TaskRepository + CategoryRepository {}

impl<T> TaskStore for T where T: TaskRepository + CategoryRepository {}

/// Errors returned by repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// A category with the same identifier already exists.
    #[error("duplicate category identifier: {0}")]
    DuplicateCategory(CategoryId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The referenced category was not found.
    #[error("category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
