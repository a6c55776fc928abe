use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use flaskr_db::StoreError;

/// Terminal page errors. Validation and conflict failures never reach this
/// type; handlers recover from those locally by re-rendering the form.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("{0}")]
    NotFound(String),
    #[error("access denied")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for PageError {
    fn from(e: StoreError) -> Self {
        PageError::Internal(e.into())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Html(format!("<h1>404 Not Found</h1>\n<p>{message}</p>\n")),
            )
                .into_response(),
            PageError::Forbidden => (
                StatusCode::FORBIDDEN,
                Html("<h1>403 Forbidden</h1>\n".to_string()),
            )
                .into_response(),
            PageError::Internal(err) => {
                error!("request failed: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h1>500 Internal Server Error</h1>\n".to_string()),
                )
                    .into_response()
            }
        }
    }
}
