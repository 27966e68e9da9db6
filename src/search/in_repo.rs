use std::sync::LazyLock;

use regex::Regex;

use crate::github::{GitHubClient, GitHubError};
use crate::models::InRepoSearchResults;

/// A parenthesized group of `language:` clauses joined by `AND`/`OR`/`NOT`,
/// as the query builder emits it, or a single bare `language:` clause. The
/// key is matched case-insensitively; operators must be uppercase.
static LANGUAGE_CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    const TERM: &str = r#"(?i:language):(?:"[^"]*"|[^\s()]+)"#;
    let pattern = format!(
        r"\(\s*{TERM}(?:\s+(?:AND|OR|NOT)\s+{TERM})*\s*\)|\b{TERM}"
    );
    Regex::new(&pattern).expect("language clause pattern")
});

/// A query with its `language:` clauses pulled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedQuery {
    /// The extracted clauses and groups, verbatim, joined by spaces
    pub language_clause: String,
    /// Everything else, whitespace-normalized
    pub base_query: String,
}

pub fn split_language_clauses(query: &str) -> ScopedQuery {
    let language_clause = LANGUAGE_CLAUSE_RE
        .find_iter(query)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let base_query = LANGUAGE_CLAUSE_RE
        .replace_all(query, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    ScopedQuery {
        language_clause,
        base_query,
    }
}

/// Search code, issues and commits of one repository at once.
///
/// A query made only of `language:` clauses returns empty results without
/// touching the API. The three searches run concurrently and any failure
/// fails the whole call; only code search receives the language clauses,
/// since GitHub's issue and commit search ignore them.
pub async fn search_within_repository(
    github: &GitHubClient,
    owner: &str,
    repo: &str,
    query: &str,
) -> Result<InRepoSearchResults, GitHubError> {
    let scoped = split_language_clauses(query);
    if scoped.base_query.is_empty() {
        tracing::debug!("In-repo search for {owner}/{repo} has no terms beyond language filters");
        return Ok(InRepoSearchResults::default());
    }

    let scope = format!("repo:{owner}/{repo} {}", scoped.base_query);
    let code_query = if scoped.language_clause.is_empty() {
        scope.clone()
    } else {
        format!("{scope} {}", scoped.language_clause)
    };

    let (files, issues, commits) = tokio::try_join!(
        github.search_code(&code_query),
        github.search_issues(&scope),
        github.search_commits(&scope),
    )?;

    tracing::info!(
        "In-repo search {owner}/{repo}: {} files, {} issues, {} commits",
        files.items.len(),
        issues.items.len(),
        commits.items.len()
    );

    Ok(InRepoSearchResults {
        files: files.items,
        issues: issues.items,
        commits: commits.items,
    })
}
