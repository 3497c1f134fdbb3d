//! Diesel row models for task persistence.

use super::schema::{categories, tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Due date.
    pub due_date: NaiveDate,
    /// Priority storage value.
    pub priority: String,
    /// Status storage value.
    pub status: String,
    /// Owning category.
    pub category_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Due date.
    pub due_date: NaiveDate,
    /// Priority storage value.
    pub priority: String,
    /// Status storage value.
    pub status: String,
    /// Owning category.
    pub category_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Update model for the mutable task columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Due date.
    pub due_date: NaiveDate,
    /// Priority storage value.
    pub priority: String,
    /// Status storage value.
    pub status: String,
    /// Owning category.
    pub category_id: uuid::Uuid,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result and insert row for category records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    /// Category identifier.
    pub id: uuid::Uuid,
    /// Category label.
    pub name: String,
}
