//! Application services for task management.

mod calendar;
mod categories;
mod error;
mod lifecycle;
mod listing;

pub use calendar::CalendarService;
pub use categories::CategoryService;
pub use error::{TaskServiceError, TaskServiceResult};
pub use lifecycle::TaskLifecycleService;
pub use listing::{ListTasksRequest, TaskListEntry, TaskListPage, TaskListingService};
