//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title exceeds the 200-character storage limit.
    #[error("title exceeds {max} characters")]
    TitleTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },

    /// The task description is empty after trimming.
    #[error("description must not be empty")]
    EmptyDescription,

    /// The due date is missing.
    #[error("due date is required")]
    MissingDueDate,

    /// The due date could not be parsed as `YYYY-MM-DD`.
    #[error("invalid due date '{0}', expected YYYY-MM-DD")]
    InvalidDueDate(String),

    /// The due date lies before the current date on task creation.
    #[error("due date {0} is in the past")]
    DueDateInPast(chrono::NaiveDate),

    /// The priority value is not one of the supported choices.
    #[error("unsupported priority: {0}")]
    InvalidPriority(String),

    /// No category was selected.
    #[error("category is required")]
    MissingCategory,

    /// The selected category does not exist.
    #[error("category '{0}' does not exist")]
    UnknownCategory(String),

    /// The category name is empty after trimming.
    #[error("category name must not be empty")]
    EmptyCategoryName,

    /// The category name exceeds the 50-character storage limit.
    #[error("category name exceeds {max} characters")]
    CategoryNameTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },

    /// The calendar month lies outside `1..=12` or the year is unrepresentable.
    #[error("invalid calendar month {year}-{month}")]
    InvalidCalendarMonth {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParsePriorityError(pub String);
