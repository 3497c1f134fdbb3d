//! HTTP error responses.

use crate::task::services::TaskServiceError;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

/// Errors surfaced by request handlers.
#[derive(Debug, Error)]
pub enum WebError {
    /// The addressed task does not exist or the identifier is malformed.
    #[error("not found")]
    NotFound,
    /// Request parameters were rejected.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// A page template failed to render.
    #[error("template rendering failed: {0}")]
    Render(#[from] minijinja::Error),
    /// A service call failed unexpectedly.
    #[error(transparent)]
    Service(TaskServiceError),
}

impl WebError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Render(_) | Self::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TaskServiceError> for WebError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::NotFound(_) => Self::NotFound,
            TaskServiceError::Domain(domain) => Self::BadRequest(domain.to_string()),
            TaskServiceError::Validation(errors) => Self::BadRequest(errors.to_string()),
            other @ TaskServiceError::Repository(_) => Self::Service(other),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::NotFound => "<h1>Página não encontrada</h1>".to_owned(),
            Self::BadRequest(reason) => {
                warn!(%reason, "rejected request");
                format!("<h1>Requisição inválida</h1><p>{}</p>", escape(reason))
            }
            Self::Render(_) | Self::Service(_) => {
                error!(error = %self, "request failed");
                "<h1>Erro interno</h1>".to_owned()
            }
        };
        (status, Html(body)).into_response()
    }
}

fn escape(text: &str) -> String {
    minijinja::HtmlEscape(text).to_string()
}
