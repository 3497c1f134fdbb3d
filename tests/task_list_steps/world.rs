//! Shared world state for task list BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use mockable::{Clock, DefaultClock};
use rstest::fixture;
use taskdesk::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Category, TaskId, TaskStatus},
    services::{CategoryService, ListTasksRequest, TaskLifecycleService, TaskListingService},
};

/// Scenario world for task list behaviour tests.
pub struct TaskListWorld {
    pub lifecycle: TaskLifecycleService<InMemoryTaskRepository, DefaultClock>,
    pub listing: TaskListingService<InMemoryTaskRepository, DefaultClock>,
    pub categories: CategoryService<InMemoryTaskRepository>,
    pub category: Option<Category>,
    pub tasks_by_title: HashMap<String, TaskId>,
    pub listed_titles: Vec<String>,
}

impl TaskListWorld {
    /// Creates a world over an empty store.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryTaskRepository::new());
        let clock = Arc::new(DefaultClock);
        Self {
            lifecycle: TaskLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock)),
            listing: TaskListingService::new(Arc::clone(&repository), clock),
            categories: CategoryService::new(repository),
            category: None,
            tasks_by_title: HashMap::new(),
            listed_titles: Vec::new(),
        }
    }

    /// Returns the identifier of the task created with `title`.
    pub fn task_id(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.tasks_by_title
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task titled {title} in scenario world"))
    }

    /// Lists the titles matched by `request`.
    pub fn titles_in(&self, request: ListTasksRequest) -> Result<Vec<String>, eyre::Report> {
        let page = run_async(self.listing.list(&request))?;
        Ok(page
            .entries
            .iter()
            .map(|entry| entry.task.title().as_str().to_owned())
            .collect())
    }
}

impl Default for TaskListWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskListWorld {
    TaskListWorld::default()
}

/// Returns the date `days` after today.
pub fn days_from_today(days: u64) -> Result<NaiveDate, eyre::Report> {
    DefaultClock
        .local()
        .date_naive()
        .checked_add_days(Days::new(days))
        .ok_or_else(|| eyre::eyre!("date out of range"))
}

/// Parses a storage status value used in step text.
pub fn status_named(value: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(value).map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
