use std::sync::LazyLock;

use regex::Regex;

use crate::github::GitHubClient;
use crate::models::{Repository, SearchError, SearchErrorKind, SearchResultEnvelope};
use crate::search::regex_filter::{filter_repositories_by_regex, is_valid_regex};

/// Longest query (in characters) accepted before any upstream call.
pub const MAX_QUERY_LENGTH: usize = 256;
/// Most boolean operators GitHub accepts in one query.
pub const MAX_QUERY_OPERATORS: usize = 5;
/// Raw results requested upstream in regex mode. Pages beyond what this many
/// results can fill come back short.
pub const REGEX_OVERFETCH: u32 = 100;

pub const DEFAULT_PER_PAGE: u32 = 30;
const MAX_PER_PAGE: u32 = 100;

static OPERATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:AND|OR|NOT)\b").expect("operator pattern"));
static NON_ALPHANUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]").expect("non-alphanumeric pattern"));

/// Repository search in front of GitHub's `/search/repositories`.
///
/// Queries that compile as a regex are searched upstream with a degraded
/// alphanumeric term, then filtered and paginated locally. Every outcome,
/// including upstream failures, is returned as an envelope.
#[derive(Clone)]
pub struct RepositorySearchService {
    github: GitHubClient,
}

impl RepositorySearchService {
    pub fn new(github: GitHubClient) -> Self {
        Self { github }
    }

    pub async fn search(&self, query: &str, page: u32, per_page: u32) -> SearchResultEnvelope {
        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_PER_PAGE);

        if let Err(error) = validate_query(query) {
            tracing::info!("Rejected search query: {}", error.message);
            return failure(error, page, per_page);
        }

        if is_valid_regex(query) {
            self.search_regex(query, page, per_page).await
        } else {
            self.search_passthrough(query, page, per_page).await
        }
    }

    async fn search_regex(&self, pattern: &str, page: u32, per_page: u32) -> SearchResultEnvelope {
        let term = degrade_to_search_term(pattern);
        if term.is_empty() {
            return failure(
                SearchError::new(
                    SearchErrorKind::ValidationFailed,
                    "The search pattern has no letters or digits to search for",
                ),
                page,
                per_page,
            );
        }

        tracing::debug!("Regex-mode search: pattern {pattern:?}, upstream term {term:?}");
        match self.github.search_repositories(&term, 1, REGEX_OVERFETCH).await {
            Ok(result) => {
                let filtered = filter_repositories_by_regex(result.items, pattern);
                let total_count = filtered.len() as u64;
                let repositories = paginate(filtered, page, per_page);
                success(repositories, total_count, page, per_page)
            }
            Err(e) => {
                tracing::error!("Error searching repositories: {e}");
                failure(e.to_search_error(), page, per_page)
            }
        }
    }

    async fn search_passthrough(&self, query: &str, page: u32, per_page: u32) -> SearchResultEnvelope {
        match self.github.search_repositories(query, page, per_page).await {
            Ok(result) => {
                let mut repositories = result.items;
                repositories.truncate(per_page as usize);
                success(repositories, result.total_count, page, per_page)
            }
            Err(e) => {
                tracing::error!("Error searching repositories: {e}");
                failure(e.to_search_error(), page, per_page)
            }
        }
    }
}

/// Length and operator-count checks, run before anything goes upstream.
pub fn validate_query(query: &str) -> Result<(), SearchError> {
    let length = query.chars().count();
    if length > MAX_QUERY_LENGTH {
        return Err(SearchError::new(
            SearchErrorKind::QueryLength,
            format!("Query is too long ({length} characters, maximum is {MAX_QUERY_LENGTH})"),
        ));
    }

    let operators = OPERATOR_RE.find_iter(query).count();
    if operators > MAX_QUERY_OPERATORS {
        return Err(SearchError::new(
            SearchErrorKind::QueryOperators,
            format!(
                "Query has too many AND/OR/NOT operators ({operators}, maximum is {MAX_QUERY_OPERATORS})"
            ),
        ));
    }

    Ok(())
}

/// Drop every character that is not an ASCII letter or digit.
pub fn degrade_to_search_term(pattern: &str) -> String {
    NON_ALPHANUMERIC_RE.replace_all(pattern, "").into_owned()
}

fn paginate(repositories: Vec<Repository>, page: u32, per_page: u32) -> Vec<Repository> {
    let start = (page as usize - 1).saturating_mul(per_page as usize);
    repositories
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect()
}

fn success(
    repositories: Vec<Repository>,
    total_count: u64,
    page: u32,
    per_page: u32,
) -> SearchResultEnvelope {
    SearchResultEnvelope {
        has_next_page: u64::from(page) * u64::from(per_page) < total_count,
        repositories,
        total_count,
        current_page: page,
        per_page,
        error: None,
    }
}

fn failure(error: SearchError, page: u32, per_page: u32) -> SearchResultEnvelope {
    SearchResultEnvelope {
        repositories: Vec::new(),
        total_count: 0,
        current_page: page,
        per_page,
        has_next_page: false,
        error: Some(error),
    }
}
