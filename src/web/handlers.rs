//! Request handlers for the task pages.
//!
//! Mutating actions answer with `303 See Other` to the pending list. Unknown
//! or malformed task identifiers answer `404 Not Found`. Invalid form
//! submissions re-render the form with field messages.

use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use mockable::Clock;
use serde::Deserialize;
use tracing::debug;

use super::{
    AppState, WebError,
    templates::{CALENDAR, CATEGORY_FORM, TASK_FORM, TASK_LIST},
    views::{CalendarView, CategoryFormView, FormPresentation, ListView, TaskFormView},
};
use crate::task::{
    domain::{CategoryFormInput, FormErrors, TaskFormInput, TaskId, TaskStatus},
    ports::TaskStore,
    services::{ListTasksRequest, TaskServiceError},
};

const PENDING_LIST: &str = "/";

/// Query parameters accepted by the list pages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Free-text search term.
    #[serde(default)]
    pub q: Option<String>,
    /// Category identifier filter.
    #[serde(default)]
    pub categoria: Option<String>,
    /// Sort key.
    #[serde(default)]
    pub ordenar_por: Option<String>,
}

impl ListParams {
    fn into_request(self, status: TaskStatus) -> ListTasksRequest {
        let mut request = ListTasksRequest::new(status);
        if let Some(search) = self.q {
            request = request.with_search(search);
        }
        if let Some(category) = self.categoria {
            request = request.with_category(category);
        }
        if let Some(sort) = self.ordenar_por {
            request = request.with_sort(sort);
        }
        request
    }
}

/// Query parameters accepted by the calendar page.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CalendarParams {
    /// Four-digit year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Month number, `1` being January.
    #[serde(default)]
    pub month: Option<u32>,
}

/// `GET /`
///
/// # Errors
///
/// Returns [`WebError`] when the listing or rendering fails.
pub async fn pending_list<R, C>(
    State(state): State<AppState<R, C>>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, WebError>
where
    R: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    render_list(&state, params.into_request(TaskStatus::Pending)).await
}

/// `GET /concluidas/`
///
/// # Errors
///
/// Returns [`WebError`] when the listing or rendering fails.
pub async fn completed_list<R, C>(
    State(state): State<AppState<R, C>>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, WebError>
where
    R: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    render_list(&state, params.into_request(TaskStatus::Completed)).await
}

/// `GET /adiadas/`
///
/// # Errors
///
/// Returns [`WebError`] when the listing or rendering fails.
pub async fn postponed_list<R, C>(
    State(state): State<AppState<R, C>>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, WebError>
where
    R: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    render_list(&state, params.into_request(TaskStatus::Postponed)).await
}

async fn render_list<R, C>(
    state: &AppState<R, C>,
    request: ListTasksRequest,
) -> Result<Html<String>, WebError>
where
    R: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    let page = state.listing.list(&request).await?;
    let body = state.templates.render(TASK_LIST, ListView::from(&page))?;
    Ok(Html(body))
}

/// `GET /adicionar_tarefa/`
///
/// # Errors
///
/// Returns [`WebError`] when categories cannot be loaded or rendering fails.
pub async fn new_task_form<R, C>(
    State(state): State<AppState<R, C>>,
) -> Result<Html<String>, WebError>
where
    R: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    let presentation = FormPresentation::for_create(state.tasks.today());
    let input = TaskFormInput::blank();
    render_task_form(&state, &presentation, &input, &FormErrors::default()).await
}

/// `POST /adicionar_tarefa/`
///
/// # Errors
///
/// Returns [`WebError`] when persistence or rendering fails.
pub async fn create_task<R, C>(
    State(state): State<AppState<R, C>>,
    Form(input): Form<TaskFormInput>,
) -> Result<Response, WebError>
where
    R: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    match state.tasks.create(&input).await {
        Ok(_) => Ok(Redirect::to(PENDING_LIST).into_response()),
        Err(TaskServiceError::Validation(errors)) => {
            debug!(invalid = %errors, "task form rejected");
            let presentation = FormPresentation::for_create(state.tasks.today());
            let page = render_task_form(&state, &presentation, &input, &errors).await?;
            Ok(page.into_response())
        }
        Err(other) => Err(other.into()),
    }
}

/// `GET /{id}/editar`
///
/// # Errors
///
/// Returns [`WebError::NotFound`] when the task does not exist.
pub async fn edit_task_form<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, WebError>
where
    R: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id = parse_task_id(&raw_id)?;
    let task = state.tasks.find(id).await?;
    let presentation = FormPresentation::for_edit(id);
    let input = TaskFormInput::from_task(&task);
    render_task_form(&state, &presentation, &input, &FormErrors::default()).await
}

/// `POST /{id}/editar`
///
/// # Errors
///
/// Returns [`WebError::NotFound`] when the task does not exist.
pub async fn update_task<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
    Form(input): Form<TaskFormInput>,
) -> Result<Response, WebError>
where
    R: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    let id = parse_task_id(&raw_id)?;
    match state.tasks.edit(id, &input).await {
        Ok(_) => Ok(Redirect::to(PENDING_LIST).into_response()),
        Err(TaskServiceError::Validation(errors)) => {
            debug!(task_id = %id, invalid = %errors, "task form rejected");
            let presentation = FormPresentation::for_edit(id);
            let page = render_task_form(&state, &presentation, &input, &errors).await?;
            Ok(page.into_response())
        }
        Err(other) => Err(other.into()),
    }
}

async fn render_task_form<R, C>(
    state: &AppState<R, C>,
    presentation: &FormPresentation,
    input: &TaskFormInput,
    errors: &FormErrors,
) -> Result<Html<String>, WebError>
where
    R: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    let categories = state.categories.list().await?;
    let view = TaskFormView::new(presentation, input, errors, &categories);
    Ok(Html(state.templates.render(TASK_FORM, view)?))
}

/// `GET /{id}/concluir/`
///
/// # Errors
///
/// Returns [`WebError::NotFound`] when the task does not exist.
pub async fn complete_task<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
) -> Result<Redirect, WebError>
where
    R: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    state.tasks.complete(parse_task_id(&raw_id)?).await?;
    Ok(Redirect::to(PENDING_LIST))
}

/// `GET /{id}/adiar/`
///
/// # Errors
///
/// Returns [`WebError::NotFound`] when the task does not exist.
pub async fn postpone_task<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
) -> Result<Redirect, WebError>
where
    R: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    state.tasks.postpone(parse_task_id(&raw_id)?).await?;
    Ok(Redirect::to(PENDING_LIST))
}

/// `GET /{id}/mover-para-lista-de-tarefas/`
///
/// # Errors
///
/// Returns [`WebError::NotFound`] when the task does not exist.
pub async fn restore_task<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
) -> Result<Redirect, WebError>
where
    R: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    state.tasks.restore(parse_task_id(&raw_id)?).await?;
    Ok(Redirect::to(PENDING_LIST))
}

/// `GET /{id}/excluir/`
///
/// # Errors
///
/// Returns [`WebError::NotFound`] when the task does not exist.
pub async fn delete_task<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
) -> Result<Redirect, WebError>
where
    R: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    state.tasks.delete(parse_task_id(&raw_id)?).await?;
    Ok(Redirect::to(PENDING_LIST))
}

/// `GET /criar_categoria/`
///
/// # Errors
///
/// Returns [`WebError::Render`] when rendering fails.
pub async fn new_category_form<R, C>(
    State(state): State<AppState<R, C>>,
) -> Result<Html<String>, WebError>
where
    R: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    let input = CategoryFormInput::default();
    let view = CategoryFormView::new(&input, &FormErrors::default());
    Ok(Html(state.templates.render(CATEGORY_FORM, view)?))
}

/// `POST /criar_categoria/`
///
/// # Errors
///
/// Returns [`WebError`] when persistence or rendering fails.
pub async fn create_category<R, C>(
    State(state): State<AppState<R, C>>,
    Form(input): Form<CategoryFormInput>,
) -> Result<Response, WebError>
where
    R: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    match state.categories.create(&input).await {
        Ok(_) => Ok(Redirect::to(PENDING_LIST).into_response()),
        Err(TaskServiceError::Validation(errors)) => {
            debug!(invalid = %errors, "category form rejected");
            let view = CategoryFormView::new(&input, &errors);
            let page = state.templates.render(CATEGORY_FORM, view)?;
            Ok(Html(page).into_response())
        }
        Err(other) => Err(other.into()),
    }
}

/// `GET /calendario/`
///
/// # Errors
///
/// Returns [`WebError::BadRequest`] when the month is out of range.
pub async fn calendar<R, C>(
    State(state): State<AppState<R, C>>,
    Query(params): Query<CalendarParams>,
) -> Result<Html<String>, WebError>
where
    R: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    let month = state.calendar.month(params.year, params.month).await?;
    let body = state
        .templates
        .render(CALENDAR, CalendarView::from(&month))?;
    Ok(Html(body))
}

fn parse_task_id(raw: &str) -> Result<TaskId, WebError> {
    raw.parse::<TaskId>().map_err(|err| {
        debug!(id = raw, error = %err, "malformed task id");
        WebError::NotFound
    })
}
