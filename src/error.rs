use axum::{
    response::{IntoResponse, Response},
    Json,
    http::StatusCode,
};
use serde::Serialize;

pub const ERROR_CODE: &str = "Unable to fetch headlines";
pub const ERROR_HINT: &str = "Make sure you have Basic or Pro tier X API access";

#[derive(Serialize)]
pub struct ErrorResponse {
    error: &'static str,
    message: String,
    hint: &'static str,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Non-success status from the search API. `body` is kept for the server log only.
    #[error("Search API error: {status}")]
    UpstreamError { status: u16, body: String },

    #[error("Failed to fetch data: {0}")]
    FetchError(String),

    #[error("No posts found")]
    NoResultsError,

    #[error("No suitable headlines found")]
    NoSuitableHeadlinesError,

    #[error("No valid matches generated")]
    NoValidMatchesError,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::UpstreamError { status, body } => {
                tracing::error!(status = *status, body = %body, "search API returned an error");
            }
            other => tracing::error!(error = %other, "request failed"),
        }

        let body = Json(ErrorResponse {
            error: ERROR_CODE,
            message: self.to_string(),
            hint: ERROR_HINT,
        });

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::FetchError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
