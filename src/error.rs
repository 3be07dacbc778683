use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Path contains a parent directory segment")]
    PathTraversal,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl ServeError {
    fn status_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServeError::PathTraversal => (StatusCode::BAD_REQUEST, "PATH_TRAVERSAL"),
            ServeError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ServeError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_code();

        let body = ErrorResponse {
            error: self.to_string(),
            code,
        };

        (status, Json(body)).into_response()
    }
}
