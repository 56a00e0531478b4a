use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::application::list::MyListError;
use crate::application::repos::RepoError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const MISSING_USER_ID: &str = "missing_user_id";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const NOT_FOUND: &str = "not_found";
    pub const CONTENT_NOT_FOUND: &str = "content_not_found";
    pub const ALREADY_SAVED: &str = "already_saved";
    pub const DEPENDENCY_UNAVAILABLE: &str = "dependency_unavailable";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// HTTP error with a stable machine-checkable code. Status codes derive
/// from error kinds through the mapping below, never from message text.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    hint: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            hint,
        }
    }

    pub fn missing_user_id() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            codes::MISSING_USER_ID,
            "user-id header is required",
            None,
        )
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            message,
            None,
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<MyListError> for ApiError {
    fn from(err: MyListError) -> Self {
        match err {
            MyListError::Validation(message) => Self::invalid_input(message),
            MyListError::ContentNotFound { content_id, kind } => Self::new(
                StatusCode::NOT_FOUND,
                codes::CONTENT_NOT_FOUND,
                "content not found in catalog",
                Some(format!("no {kind} with id `{content_id}`")),
            ),
            MyListError::MembershipNotFound => Self::new(
                StatusCode::NOT_FOUND,
                codes::NOT_FOUND,
                "content is not on this list",
                None,
            ),
            MyListError::AlreadyExists => Self::new(
                StatusCode::CONFLICT,
                codes::ALREADY_SAVED,
                "content is already saved to this list",
                None,
            ),
            MyListError::Store(repo) => {
                error!(error = %repo, "durable store failure on request path");
                let hint = matches!(repo, RepoError::Timeout)
                    .then(|| "store query timed out".to_string());
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    codes::DEPENDENCY_UNAVAILABLE,
                    "service dependency unavailable",
                    hint,
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message,
                hint: self.hint,
            },
        };
        (self.status, Json(body)).into_response()
    }
}
