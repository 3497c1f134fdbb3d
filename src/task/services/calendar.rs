//! Service layer for the monthly calendar view.

use crate::task::{
    domain::{CalendarMonth, MonthCalendar, TaskStatus},
    ports::TaskRepository,
};
use chrono::Datelike;
use mockable::Clock;
use std::sync::Arc;
use tracing::debug;

use super::TaskServiceResult;

/// Calendar grid service.
#[derive(Clone)]
pub struct CalendarService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> CalendarService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new calendar service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Builds the calendar grid for a month.
    ///
    /// Missing `year` or `month` default to the current local date. Pending
    /// tasks for the whole visible range are fetched in a single lookup.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskServiceError::Domain`] when the month is invalid or
    /// [`super::TaskServiceError::Repository`] when persistence lookup fails.
    pub async fn month(
        &self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> TaskServiceResult<MonthCalendar> {
        let today = self.clock.local().date_naive();
        let calendar_month = CalendarMonth::new(
            year.unwrap_or_else(|| today.year()),
            month.unwrap_or_else(|| today.month()),
        )?;
        let (start, end) = calendar_month.visible_range();
        let tasks = self
            .repository
            .list_due_between(TaskStatus::Pending, start, end)
            .await?;
        debug!(%start, %end, pending = tasks.len(), "building calendar");
        Ok(MonthCalendar::build(calendar_month, tasks, today))
    }
}
