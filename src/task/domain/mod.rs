//! Domain model for task management.
//!
//! The task domain models tasks, their categories, form validation, list
//! queries and the monthly calendar grid while keeping all infrastructure
//! concerns outside of the domain boundary.

mod calendar;
mod category;
mod error;
mod form;
mod ids;
mod query;
mod task;

pub use calendar::{CalendarDay, CalendarMonth, CalendarWeek, MonthCalendar};
pub use category::{Category, CategoryName};
pub use error::{ParsePriorityError, ParseTaskStatusError, TaskDomainError};
pub use form::{CategoryFormInput, FormErrors, FormField, FormMode, TaskFormInput};
pub use ids::{CategoryId, TaskDescription, TaskId, TaskTitle};
pub use query::{SearchTerm, TaskQuery, TaskSort};
pub use task::{PersistedTaskData, Priority, Task, TaskFields, TaskStatus};
