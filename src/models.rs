use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── GitHub projections ──────────────────────────────────
//
// Read-only views of GitHub's JSON. Every struct defaults missing fields so a
// sparse or future-changed payload still deserializes.

/// A user or organization as embedded in other GitHub objects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Actor {
    pub login: String,
    pub id: u64,
    pub avatar_url: String,
    pub html_url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct License {
    pub key: String,
    pub name: String,
    pub spdx_id: Option<String>,
    pub url: Option<String>,
}

/// A repository as returned by search and list endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub id: u64,
    pub node_id: String,
    pub name: String,
    pub full_name: String,
    pub private: bool,
    pub owner: Actor,
    pub html_url: String,
    pub description: Option<String>,
    pub fork: bool,
    pub url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub homepage: Option<String>,
    pub size: u64,
    pub stargazers_count: u64,
    pub watchers_count: u64,
    pub language: Option<String>,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub archived: bool,
    pub disabled: bool,
    pub license: Option<License>,
    pub topics: Vec<String>,
    pub visibility: Option<String>,
    pub default_branch: String,
    pub score: Option<f64>,
}

/// The single-repository view, which carries a few counters search omits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryDetails {
    #[serde(flatten)]
    pub repository: Repository,
    pub mirror_url: Option<String>,
    pub has_issues: bool,
    pub has_projects: bool,
    pub has_wiki: bool,
    pub has_pages: bool,
    pub has_discussions: bool,
    pub is_template: bool,
    pub network_count: u64,
    pub subscribers_count: u64,
}

/// Forks come back from GitHub in the repository shape.
pub type Fork = Repository;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    pub id: u64,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: IssueState,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub body: Option<String>,
    pub user: Option<Actor>,
    pub labels: Vec<Label>,
    pub assignees: Vec<Actor>,
    pub comments: u64,
    pub html_url: String,
}

/// Name/email/date triple from the git object itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitSignature {
    pub name: String,
    pub email: String,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitCommit {
    pub message: String,
    pub author: Option<GitSignature>,
    pub committer: Option<GitSignature>,
    pub comment_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitRef {
    pub sha: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitStats {
    pub additions: u64,
    pub deletions: u64,
    pub total: u64,
}

/// A commit from the list, detail or search endpoints. `stats` is only
/// populated by the detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    pub sha: String,
    pub node_id: String,
    pub html_url: String,
    pub commit: GitCommit,
    pub author: Option<Actor>,
    pub committer: Option<Actor>,
    pub parents: Vec<CommitRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CommitStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branch {
    pub name: String,
    pub commit: CommitRef,
    pub protected: bool,
}

/// Repository reference embedded in code search hits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryRef {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeSearchItem {
    pub name: String,
    pub path: String,
    pub sha: String,
    pub url: String,
    pub html_url: String,
    pub repository: RepositoryRef,
    pub score: Option<f64>,
}

/// One page of a GitHub search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage<T> {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Raw file content fetched by URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDetail {
    pub url: String,
    pub name: String,
    pub content: String,
    pub size: usize,
}

// ─── Search envelope ─────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchErrorKind {
    RateLimit,
    QueryLength,
    QueryOperators,
    ValidationFailed,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchError {
    #[serde(rename = "type")]
    pub kind: SearchErrorKind,
    pub message: String,
}

impl SearchError {
    pub fn new(kind: SearchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Normalized repository search response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultEnvelope {
    pub repositories: Vec<Repository>,
    pub total_count: u64,
    pub current_page: u32,
    pub per_page: u32,
    pub has_next_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SearchError>,
}

/// Combined result of the three scoped searches run for one repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InRepoSearchResults {
    pub files: Vec<CodeSearchItem>,
    pub issues: Vec<Issue>,
    pub commits: Vec<Commit>,
}

impl InRepoSearchResults {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.issues.is_empty() && self.commits.is_empty()
    }
}

/// Everything the repository page shows, fetched in one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryBundle {
    pub details: RepositoryDetails,
    pub commits: Vec<Commit>,
    pub branches: Vec<Branch>,
    pub forks: Vec<Fork>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_error_kind_serializes_to_snake_case() {
        let json = serde_json::to_value(SearchError::new(SearchErrorKind::RateLimit, "slow down"))
            .unwrap();
        assert_eq!(json["type"], "rate_limit");
        assert_eq!(json["message"], "slow down");
    }

    #[test]
    fn test_envelope_uses_camel_case_and_omits_missing_error() {
        let envelope = SearchResultEnvelope {
            repositories: vec![],
            total_count: 3,
            current_page: 1,
            per_page: 30,
            has_next_page: false,
            error: None,
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["totalCount"], 3);
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["hasNextPage"], false);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_repository_tolerates_sparse_payload() {
        let repo: Repository = serde_json::from_str(
            r#"{"name": "tokio", "full_name": "tokio-rs/tokio", "description": null, "extra": 1}"#,
        )
        .unwrap();
        assert_eq!(repo.name, "tokio");
        assert_eq!(repo.full_name, "tokio-rs/tokio");
        assert!(repo.description.is_none());
        assert_eq!(repo.stargazers_count, 0);
    }

    #[test]
    fn test_repository_details_flattens_repository_fields() {
        let details: RepositoryDetails = serde_json::from_str(
            r#"{"name": "serde", "full_name": "serde-rs/serde", "subscribers_count": 120,
                "pushed_at": "2024-05-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(details.repository.name, "serde");
        assert_eq!(details.subscribers_count, 120);
        assert!(details.repository.pushed_at.is_some());
    }

    #[test]
    fn test_commit_stats_skipped_when_absent() {
        let commit = Commit {
            sha: "abc123".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&commit).unwrap();
        assert!(json.get("stats").is_none());
    }
}
