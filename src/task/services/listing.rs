//! Service layer for the status partition list views.

use crate::task::{
    domain::{Category, CategoryId, Task, TaskQuery, TaskSort, TaskStatus},
    ports::TaskStore,
};
use chrono::NaiveDate;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::TaskServiceResult;

/// Request parameters for a list view, as received from the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTasksRequest {
    status: TaskStatus,
    search: Option<String>,
    category: Option<String>,
    sort: Option<String>,
}

impl ListTasksRequest {
    /// Creates an unfiltered request for the `status` partition.
    #[must_use]
    pub const fn new(status: TaskStatus) -> Self {
        Self {
            status,
            search: None,
            category: None,
            sort: None,
        }
    }

    /// Sets the raw search term.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets the raw category identifier.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the raw sort key.
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Builds the list query.
    ///
    /// A blank search term or category is treated as absent. A category value
    /// that is not a valid identifier is ignored.
    #[must_use]
    pub fn to_query(&self) -> TaskQuery {
        let mut query = TaskQuery::new(self.status)
            .with_sort(TaskSort::from_param(self.sort.as_deref()));
        if let Some(search) = &self.search {
            query = query.with_search(search);
        }
        if let Some(category) = self.selected_category() {
            query = query.with_category(category);
        }
        query
    }

    fn selected_category(&self) -> Option<CategoryId> {
        let raw = self.category.as_deref().map(str::trim)?;
        if raw.is_empty() {
            return None;
        }
        raw.parse::<CategoryId>()
            .inspect_err(|err| debug!(category = raw, error = %err, "ignoring category filter"))
            .ok()
    }
}

/// One row of a list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListEntry {
    /// The listed task.
    pub task: Task,
    /// Name of the task's category.
    pub category_name: String,
    /// Whether the task is pending and past its due date.
    pub overdue: bool,
}

/// Result of a list view query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListPage {
    /// The query that produced the page.
    pub query: TaskQuery,
    /// Matching tasks in display order.
    pub entries: Vec<TaskListEntry>,
    /// Every category, for the filter control.
    pub categories: Vec<Category>,
    /// Current local date.
    pub today: NaiveDate,
}

/// Status partition listing service.
#[derive(Clone)]
pub struct TaskListingService<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskListingService<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new listing service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns the filtered, searched and sorted tasks of one partition.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn list(&self, request: &ListTasksRequest) -> TaskServiceResult<TaskListPage> {
        let query = request.to_query();
        let tasks = self.repository.list(&query).await?;
        let categories = self.repository.list_categories().await?;
        let today = self.clock.local().date_naive();
        debug!(
            status = %query.status(),
            matches = tasks.len(),
            "listed tasks"
        );

        let names: HashMap<CategoryId, &str> = categories
            .iter()
            .map(|category| (category.id(), category.name().as_str()))
            .collect();
        let entries = tasks
            .into_iter()
            .map(|task| TaskListEntry {
                category_name: names
                    .get(&task.category_id())
                    .map_or_else(String::new, |name| (*name).to_owned()),
                overdue: task.is_overdue(today),
                task,
            })
            .collect();

        Ok(TaskListPage {
            query,
            entries,
            categories,
            today,
        })
    }
}
