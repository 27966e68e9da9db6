use reqwest::StatusCode;

use crate::models::{SearchError, SearchErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    /// GitHub answered with a non-success status.
    #[error("GitHub API returned {status}: {message}")]
    Status {
        status: StatusCode,
        rate_limit_remaining: Option<u32>,
        message: String,
    },
    #[error("request to GitHub failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode GitHub response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("URL not allowed: {0}")]
    DisallowedUrl(String),
}

impl GitHubError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Map onto the search envelope's error taxonomy: 403 with an exhausted
    /// quota is a rate limit, 422 is a rejected query, everything else is unknown.
    pub fn classify(&self) -> SearchErrorKind {
        match self {
            Self::Status {
                status,
                rate_limit_remaining,
                ..
            } => {
                if *status == StatusCode::FORBIDDEN && *rate_limit_remaining == Some(0) {
                    SearchErrorKind::RateLimit
                } else if *status == StatusCode::UNPROCESSABLE_ENTITY {
                    SearchErrorKind::ValidationFailed
                } else {
                    SearchErrorKind::Unknown
                }
            }
            Self::Transport(_) | Self::Decode(_) | Self::DisallowedUrl(_) => {
                SearchErrorKind::Unknown
            }
        }
    }

    pub fn to_search_error(&self) -> SearchError {
        let kind = self.classify();
        let message = match kind {
            SearchErrorKind::RateLimit => {
                "GitHub API rate limit exceeded. Please try again later.".to_string()
            }
            SearchErrorKind::ValidationFailed => {
                format!("GitHub rejected the search query: {}", self.upstream_message())
            }
            _ => format!("An error occurred while searching repositories: {self}"),
        };
        SearchError::new(kind, message)
    }

    fn upstream_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16, remaining: Option<u32>) -> GitHubError {
        GitHubError::Status {
            status: StatusCode::from_u16(code).unwrap(),
            rate_limit_remaining: remaining,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_forbidden_with_no_quota_is_rate_limit() {
        assert_eq!(status(403, Some(0)).classify(), SearchErrorKind::RateLimit);
    }

    #[test]
    fn test_forbidden_with_quota_left_is_unknown() {
        assert_eq!(status(403, Some(12)).classify(), SearchErrorKind::Unknown);
        assert_eq!(status(403, None).classify(), SearchErrorKind::Unknown);
    }

    #[test]
    fn test_unprocessable_is_validation_failed() {
        let err = status(422, Some(20));
        assert_eq!(err.classify(), SearchErrorKind::ValidationFailed);
        assert!(err.to_search_error().message.contains("boom"));
    }

    #[test]
    fn test_server_error_is_unknown() {
        assert_eq!(status(502, Some(20)).classify(), SearchErrorKind::Unknown);
    }
}
