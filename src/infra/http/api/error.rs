use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::error::ErrorReport;
use crate::application::posts::{PostQueryError, PostReadError};
use crate::application::repos::RepoError;

const SOURCE: &str = "infra::http::api";

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const INVALID_DATE: &str = "invalid_date";
    pub const INVALID_PAGE: &str = "invalid_page";
    pub const NOT_FOUND: &str = "not_found";
    pub const REPO: &str = "repo_error";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    hint: Option<String>,
    /// Server-side diagnostic chain, logged but never sent to the client.
    report: Option<ErrorReport>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            hint,
            report: None,
        }
    }

    pub fn bad_request(message: &'static str, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[cfg(test)]
    pub fn code(&self) -> &'static str {
        self.code
    }

    fn with_source(mut self, err: &dyn std::error::Error) -> Self {
        self.report = Some(ErrorReport::from_error(SOURCE, self.status, err));
        self
    }
}

impl From<PostQueryError> for ApiError {
    fn from(err: PostQueryError) -> Self {
        match err {
            PostQueryError::InvalidDate { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                codes::INVALID_DATE,
                "Invalid date filter",
                Some(err.to_string()),
            ),
            PostQueryError::Pagination(inner) => Self::new(
                StatusCode::BAD_REQUEST,
                codes::INVALID_PAGE,
                "Invalid page",
                Some(inner.to_string()),
            ),
        }
    }
}

impl From<PostReadError> for ApiError {
    fn from(err: PostReadError) -> Self {
        match err {
            PostReadError::NotFound => Self::not_found("Post not found"),
            PostReadError::Repo(repo) => Self::from(repo),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        let status = match err {
            RepoError::NotFound => return Self::not_found("Resource not found"),
            RepoError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, codes::REPO, "Persistence error", None).with_source(&err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let report = self.report.unwrap_or_else(|| {
            ErrorReport::from_message(
                SOURCE,
                self.status,
                format!(
                    "{}: {}",
                    self.code,
                    self.hint.as_deref().unwrap_or(self.message)
                ),
            )
        });
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        report.attach(&mut response);
        response
    }
}
