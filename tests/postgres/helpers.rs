//! Shared test helpers for `PostgreSQL` integration tests.

use super::cluster::{BoxError, shared_cluster};
use chrono::NaiveDate;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use rstest::fixture;
use std::env;
use std::sync::Arc;
use taskdesk::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::{
        Category, CategoryId, CategoryName, Priority, Task, TaskDescription, TaskFields,
        TaskStatus, TaskTitle,
    },
};
use uuid::Uuid;

/// Names an existing server to use instead of the embedded cluster.
pub const TEST_DATABASE_URL_VAR: &str = "TASKDESK_TEST_DATABASE_URL";

/// Returns the admin URL of the server the tests run against.
fn server_url() -> Result<String, BoxError> {
    match env::var(TEST_DATABASE_URL_VAR) {
        Ok(url) if !url.trim().is_empty() => Ok(url),
        _ => Ok(shared_cluster()?.database_url("postgres")),
    }
}

/// Repository bound to a throwaway schema, dropped with the context.
pub struct PgTestContext {
    pub repository: Arc<PostgresTaskRepository>,
    base_url: String,
    schema: String,
}

impl PgTestContext {
    fn create(base_url: String) -> Result<Self, BoxError> {
        let schema = format!("taskdesk_test_{}", Uuid::new_v4().simple());
        let mut admin = PgConnection::establish(&base_url)?;
        admin.batch_execute(&format!("CREATE SCHEMA {schema}"))?;

        let separator = if base_url.contains('?') { '&' } else { '?' };
        let scoped_url = format!("{base_url}{separator}options=-c%20search_path%3D{schema}");
        let pool = Pool::builder()
            .max_size(2)
            .build(ConnectionManager::<PgConnection>::new(scoped_url))?;

        Ok(Self {
            repository: Arc::new(PostgresTaskRepository::new(pool)),
            base_url,
            schema,
        })
    }
}

impl Drop for PgTestContext {
    fn drop(&mut self) {
        let dropped = PgConnection::establish(&self.base_url)
            .map_err(|err| Box::new(err) as BoxError)
            .and_then(|mut connection| {
                connection
                    .batch_execute(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema))
                    .map_err(|err| Box::new(err) as BoxError)
            });
        if let Err(err) = dropped {
            tracing::warn!(schema = %self.schema, error = %err, "failed to drop test schema");
        }
    }
}

/// Provides a repository in a fresh schema of the test server.
#[fixture]
pub async fn pg_context() -> PgTestContext {
    let context = tokio::task::spawn_blocking(|| server_url().and_then(PgTestContext::create))
        .await
        .expect("setup task should not panic")
        .expect("test schema should be created");
    context
        .repository
        .ensure_schema()
        .await
        .expect("task schema should apply");
    context
}

/// Builds a category, panicking on invalid names.
pub fn category(name: &str) -> Category {
    Category::new(CategoryName::new(name).expect("valid category name"))
}

/// Builds a date, panicking on invalid input.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Builds a pending task with a generated description.
pub fn pending_task(
    title: &str,
    due_date: NaiveDate,
    priority: Priority,
    category_id: CategoryId,
) -> Task {
    let fields = TaskFields {
        title: TaskTitle::new(title).expect("valid title"),
        description: TaskDescription::new(format!("{title} details")).expect("valid description"),
        due_date,
        priority,
        category_id,
    };
    let task = Task::new(fields, &DefaultClock);
    debug_assert_eq!(task.status(), TaskStatus::Pending);
    task
}
