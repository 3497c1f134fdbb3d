//! HTTP surface: routes, handlers and page rendering.

pub mod error;
pub mod handlers;
pub mod templates;
pub mod views;

pub use error::WebError;
pub use templates::Templates;
pub use views::FormPresentation;

use crate::task::{
    ports::TaskStore,
    services::{CalendarService, CategoryService, TaskLifecycleService, TaskListingService},
};
use axum::{Router, routing::get};
use mockable::Clock;
use std::sync::Arc;

/// Shared handler dependencies.
pub struct AppState<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    tasks: Arc<TaskLifecycleService<R, C>>,
    listing: Arc<TaskListingService<R, C>>,
    categories: Arc<CategoryService<R>>,
    calendar: Arc<CalendarService<R, C>>,
    templates: Arc<Templates>,
}

impl<R, C> Clone for AppState<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            listing: Arc::clone(&self.listing),
            categories: Arc::clone(&self.categories),
            calendar: Arc::clone(&self.calendar),
            templates: Arc::clone(&self.templates),
        }
    }
}

impl<R, C> AppState<R, C>
where
    R: TaskStore,
    C: Clock + Send + Sync,
{
    /// Builds every service over one store and clock.
    ///
    /// # Errors
    ///
    /// Returns [`minijinja::Error`] when a page template fails to parse.
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Result<Self, minijinja::Error> {
        Ok(Self {
            tasks: Arc::new(TaskLifecycleService::new(
                Arc::clone(&repository),
                Arc::clone(&clock),
            )),
            listing: Arc::new(TaskListingService::new(
                Arc::clone(&repository),
                Arc::clone(&clock),
            )),
            categories: Arc::new(CategoryService::new(Arc::clone(&repository))),
            calendar: Arc::new(CalendarService::new(repository, clock)),
            templates: Arc::new(Templates::load()?),
        })
    }

    /// Returns the category service, used at startup to seed the default.
    #[must_use]
    pub fn categories(&self) -> &CategoryService<R> {
        &self.categories
    }
}

/// Builds the application router.
#[must_use]
pub fn router<R, C>(state: AppState<R, C>) -> Router
where
    R: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    use handlers::{
        calendar, complete_task, completed_list, create_category, create_task, delete_task,
        edit_task_form, new_category_form, new_task_form, pending_list, postpone_task,
        postponed_list, restore_task, update_task,
    };

    Router::new()
        .route("/", get(pending_list::<R, C>))
        .route("/concluidas/", get(completed_list::<R, C>))
        .route("/adiadas/", get(postponed_list::<R, C>))
        .route(
            "/adicionar_tarefa/",
            get(new_task_form::<R, C>).post(create_task::<R, C>),
        )
        .route(
            "/{id}/editar",
            get(edit_task_form::<R, C>).post(update_task::<R, C>),
        )
        .route("/{id}/concluir/", get(complete_task::<R, C>))
        .route("/{id}/excluir/", get(delete_task::<R, C>))
        .route("/{id}/adiar/", get(postpone_task::<R, C>))
        .route(
            "/{id}/mover-para-lista-de-tarefas/",
            get(restore_task::<R, C>),
        )
        .route(
            "/criar_categoria/",
            get(new_category_form::<R, C>).post(create_category::<R, C>),
        )
        .route("/calendario/", get(calendar::<R, C>))
        .with_state(state)
}
