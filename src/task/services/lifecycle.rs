//! Service layer for task creation, edits, status transitions and deletion.

use crate::task::{
    domain::{Category, CategoryId, FormMode, Task, TaskFormInput, TaskId, TaskStatus},
    ports::TaskStore,
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

use super::{TaskServiceError, TaskServiceResult};

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns the current local date according to the service clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.local().date_naive()
    }

    /// Validates a task form and stores a new pending task.
    ///
    /// Whatever status the submission implies, the new task is pending.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Validation`] when the form is invalid or
    /// [`TaskServiceError::Repository`] when persistence fails.
    pub async fn create(&self, input: &TaskFormInput) -> TaskServiceResult<Task> {
        let category = self.submitted_category(input).await?;
        let mode = FormMode::Create {
            today: self.today(),
        };
        let fields = input.validate(mode, category.as_slice())?;
        let task = Task::new(fields, &*self.clock);
        self.repository.store(&task).await?;
        info!(task_id = %task.id(), due_date = %task.due_date(), "task created");
        Ok(task)
    }

    /// Loads a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist.
    pub async fn find(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::NotFound(id))
    }

    /// Validates a task form and overwrites the editable fields of a task.
    ///
    /// The status is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist,
    /// [`TaskServiceError::Validation`] when the form is invalid, or
    /// [`TaskServiceError::Repository`] when persistence fails.
    pub async fn edit(&self, id: TaskId, input: &TaskFormInput) -> TaskServiceResult<Task> {
        let mut task = self.find(id).await?;
        let category = self.submitted_category(input).await?;
        let fields = input.validate(FormMode::Edit, category.as_slice())?;
        task.apply_edit(fields, &*self.clock);
        self.repository.update(&task).await?;
        info!(task_id = %id, "task edited");
        Ok(task)
    }

    /// Marks a task as completed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist.
    pub async fn complete(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.transition(id, TaskStatus::Completed).await
    }

    /// Marks a task as postponed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist.
    pub async fn postpone(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.transition(id, TaskStatus::Postponed).await
    }

    /// Moves a task back to the pending list.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist.
    pub async fn restore(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.transition(id, TaskStatus::Pending).await
    }

    /// Permanently deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist.
    pub async fn delete(&self, id: TaskId) -> TaskServiceResult<()> {
        self.repository.delete(id).await?;
        info!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Looks up the category named by the form, if it parses and exists.
    async fn submitted_category(
        &self,
        input: &TaskFormInput,
    ) -> TaskServiceResult<Option<Category>> {
        let Ok(id) = input.category.trim().parse::<CategoryId>() else {
            return Ok(None);
        };
        Ok(self.repository.find_category(id).await?)
    }

    async fn transition(&self, id: TaskId, status: TaskStatus) -> TaskServiceResult<Task> {
        let mut task = self.find(id).await?;
        task.set_status(status, &*self.clock);
        self.repository.update(&task).await?;
        info!(task_id = %id, status = %status, "task status changed");
        Ok(task)
    }
}
