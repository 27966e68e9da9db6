//! GitHub REST API access.

mod client;
mod error;

pub use client::{GitHubClient, IssueFilter, LOW_RATE_LIMIT_THRESHOLD};
pub use error::GitHubError;
