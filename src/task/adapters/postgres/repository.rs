//! `PostgreSQL` repository implementation for task and category storage.

use super::{
    models::{CategoryRow, NewTaskRow, TaskChangeset, TaskRow},
    schema::{categories, tasks},
};
use crate::task::{
    domain::{
        Category, CategoryId, CategoryName, PersistedTaskData, Priority, Task, TaskDescription,
        TaskFields, TaskId, TaskQuery, TaskSort, TaskStatus, TaskTitle,
    },
    ports::{CategoryRepository, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::connection::SimpleConnection;
use diesel::dsl::sql;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Integer;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Idempotent DDL creating the task and category tables.
pub const SCHEMA_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_tasks_and_categories/up.sql");

/// Severity rank of the priority column, matching [`Priority::rank`].
const PRIORITY_RANK_SQL: &str =
    "CASE tasks.priority WHEN 'alta' THEN 1 WHEN 'média' THEN 2 ELSE 3 END";

/// `PostgreSQL`-backed task and category repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Creates the task and category tables when they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the DDL fails.
    pub async fn ensure_schema(&self) -> TaskRepositoryResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute(SCHEMA_SQL)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let category_id = task.category_id();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        TaskRepositoryError::CategoryNotFound(category_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let category_id = task.category_id();
        let changeset = to_changeset(task);

        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.find(task_id.into_inner()))
                .set(&changeset)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        TaskRepositoryError::CategoryNotFound(category_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let lookup = query.clone();
        self.run_blocking(move |connection| {
            let rows = load_query_rows(connection, &lookup)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_due_between(
        &self,
        status: TaskStatus,
        from: NaiveDate,
        to: NaiveDate,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::status.eq(status.as_str()))
                .filter(tasks::due_date.between(from, to))
                .order((
                    tasks::due_date.asc(),
                    tasks::priority.asc(),
                    tasks::created_at.asc(),
                    tasks::id.asc(),
                ))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

#[async_trait]
impl CategoryRepository for PostgresTaskRepository {
    async fn store_category(&self, category: &Category) -> TaskRepositoryResult<()> {
        let category_id = category.id();
        let row = CategoryRow {
            id: category_id.into_inner(),
            name: category.name().as_str().to_owned(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(categories::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateCategory(category_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_category(&self, id: CategoryId) -> TaskRepositoryResult<Option<Category>> {
        self.run_blocking(move |connection| {
            let row = categories::table
                .find(id.into_inner())
                .select(CategoryRow::as_select())
                .first::<CategoryRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_category).transpose()
        })
        .await
    }

    async fn list_categories(&self) -> TaskRepositoryResult<Vec<Category>> {
        self.run_blocking(move |connection| {
            let rows = categories::table
                .order((categories::name.asc(), categories::id.asc()))
                .select(CategoryRow::as_select())
                .load::<CategoryRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_category).collect()
        })
        .await
    }
}

fn load_query_rows(
    connection: &mut PgConnection,
    query: &TaskQuery,
) -> TaskRepositoryResult<Vec<TaskRow>> {
    let mut statement = tasks::table
        .inner_join(categories::table)
        .filter(tasks::status.eq(query.status().as_str()))
        .select(TaskRow::as_select())
        .into_boxed();

    if let Some(category) = query.category() {
        statement = statement.filter(tasks::category_id.eq(category.into_inner()));
    }

    if let Some(term) = query.search() {
        let pattern = term.like_pattern();
        statement = statement.filter(
            tasks::title
                .ilike(pattern.clone())
                .or(tasks::description.ilike(pattern.clone()))
                .or(categories::name.ilike(pattern)),
        );
    }

    statement = match query.sort() {
        TaskSort::Priority => statement
            .order_by(sql::<Integer>(PRIORITY_RANK_SQL).asc())
            .then_order_by(tasks::due_date.asc()),
        TaskSort::DueDate => statement
            .order_by(tasks::due_date.asc())
            .then_order_by(tasks::priority.asc()),
    };

    statement
        .then_order_by(tasks::created_at.asc())
        .then_order_by(tasks::id.asc())
        .load::<TaskRow>(connection)
        .map_err(TaskRepositoryError::persistence)
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().as_str().to_owned(),
        due_date: task.due_date(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        category_id: task.category_id().into_inner(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        title: task.title().as_str().to_owned(),
        description: task.description().as_str().to_owned(),
        due_date: task.due_date(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        category_id: task.category_id().into_inner(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title: persisted_title,
        description: persisted_description,
        due_date,
        priority: persisted_priority,
        status: persisted_status,
        category_id,
        created_at,
        updated_at,
    } = row;

    let title =
        TaskTitle::new(persisted_title).map_err(TaskRepositoryError::invalid_persisted_data)?;
    let description = TaskDescription::new(persisted_description)
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    let priority = Priority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        fields: TaskFields {
            title,
            description,
            due_date,
            priority,
            category_id: CategoryId::from_uuid(category_id),
        },
        status,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

fn row_to_category(row: CategoryRow) -> TaskRepositoryResult<Category> {
    let name = CategoryName::new(row.name).map_err(TaskRepositoryError::invalid_persisted_data)?;
    let id = CategoryId::from_uuid(row.id);
    Ok(Category::from_persisted(id, name))
}
