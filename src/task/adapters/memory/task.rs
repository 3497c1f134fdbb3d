//! In-memory repository for tasks and categories.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{Category, CategoryId, Task, TaskId, TaskQuery, TaskSort, TaskStatus},
    ports::{CategoryRepository, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task and category repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    categories: HashMap<CategoryId, Category>,
}

impl InMemoryTaskState {
    fn category_name(&self, id: CategoryId) -> &str {
        self.categories
            .get(&id)
            .map_or("", |category| category.name().as_str())
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        if !state.categories.contains_key(&task.category_id()) {
            return Err(TaskRepositoryError::CategoryNotFound(task.category_id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        if !state.categories.contains_key(&task.category_id()) {
            return Err(TaskRepositoryError::CategoryNotFound(task.category_id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut matching: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| query.matches(task, state.category_name(task.category_id())))
            .cloned()
            .collect();
        matching.sort_by(|left, right| query.compare(left, right));
        Ok(matching)
    }

    async fn list_due_between(
        &self,
        status: TaskStatus,
        from: NaiveDate,
        to: NaiveDate,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut due: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| {
                task.status() == status && task.due_date() >= from && task.due_date() <= to
            })
            .cloned()
            .collect();
        due.sort_by(|left, right| TaskSort::DueDate.compare(left, right));
        Ok(due)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryTaskRepository {
    async fn store_category(&self, category: &Category) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.categories.contains_key(&category.id()) {
            return Err(TaskRepositoryError::DuplicateCategory(category.id()));
        }
        state.categories.insert(category.id(), category.clone());
        Ok(())
    }

    async fn find_category(&self, id: CategoryId) -> TaskRepositoryResult<Option<Category>> {
        let state = self.read()?;
        Ok(state.categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> TaskRepositoryResult<Vec<Category>> {
        let state = self.read()?;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by(|left, right| {
            left.name()
                .as_str()
                .cmp(right.name().as_str())
                .then_with(|| left.id().into_inner().cmp(&right.id().into_inner()))
        });
        Ok(categories)
    }
}
