use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::github::GitHubError;

/// JSON error response: `{error, details?}` with an HTTP status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    details: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: error.into(),
            details: None,
        }
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: error.into(),
            details: None,
        }
    }

    pub fn internal(error: impl Into<String>, details: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: error.into(),
            details: Some(details.to_string()),
        }
    }

    pub fn with_details(mut self, details: impl std::fmt::Display) -> Self {
        self.details = Some(details.to_string());
        self
    }

    /// Log an upstream failure and turn it into a response. Disallowed file
    /// URLs are the caller's fault (400); everything else is a 500.
    pub fn upstream(error: &str, err: &GitHubError) -> Self {
        if let GitHubError::DisallowedUrl(_) = err {
            return Self::bad_request(error).with_details(err);
        }
        tracing::error!("{error}: {err}");
        Self::internal(error, err)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

macro_rules! impl_from_rejection {
    ($($rejection:ty => $error:literal),* $(,)?) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    Self {
                        status: rejection.status(),
                        error: $error.to_string(),
                        details: Some(rejection.body_text()),
                    }
                }
            }
        )*
    };
}

impl_from_rejection! {
    QueryRejection => "Invalid query parameters",
    JsonRejection => "Invalid request body",
    PathRejection => "Invalid path parameters",
}

/// Require a non-blank query parameter.
pub fn required<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, ApiError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_missing_and_blank() {
        assert!(required(&None, "q is required").is_err());
        assert!(required(&Some("  ".to_string()), "q is required").is_err());
        assert_eq!(required(&Some(" rust ".to_string()), "q").unwrap(), "rust");
    }

    #[test]
    fn test_disallowed_url_is_bad_request() {
        let err = ApiError::upstream(
            "Could not fetch file",
            &GitHubError::DisallowedUrl("https://evil.example".to_string()),
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
