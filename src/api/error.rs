//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::SearchError;

/// Error returned by every handler; renders as `{"error": "<message>"}`
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Validation(msg) => AppError::BadRequest(msg),
            SearchError::NoMatch => AppError::NotFound(SearchError::NoMatch.to_string()),
            SearchError::NotFound(msg) => AppError::NotFound(msg),
            SearchError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(msg) | AppError::NotFound(msg) => msg,
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                msg
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
