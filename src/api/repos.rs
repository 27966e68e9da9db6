use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::{required, ApiError};
use crate::github::IssueFilter;
use crate::models::{FileDetail, InRepoSearchResults, Issue, RepositoryBundle, RepositoryDetails};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IssueParams {
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InRepoSearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FileParams {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerRepoParams {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub state: Option<String>,
}

/// GET /api/repositories/{owner}/{repo} - Details, commits with stats, branches and forks
pub async fn get_repository_bundle(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<RepositoryBundle>, ApiError> {
    let Path((owner, repo)) = path?;
    crate::details::load_repository_bundle(&state.github, &state.config.commits, &owner, &repo)
        .await
        .map(Json)
        .map_err(|e| {
            ApiError::upstream(
                &format!("An error occurred while fetching repository data for {owner}/{repo}"),
                &e,
            )
        })
}

/// GET /api/repositories/{owner}/{repo}/issues?state=
pub async fn list_issues(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    params: Result<Query<IssueParams>, QueryRejection>,
) -> Result<Json<Vec<Issue>>, ApiError> {
    let Path((owner, repo)) = path?;
    let Query(params) = params?;
    let filter = parse_issue_filter(params.state.as_deref())?;
    fetch_issues(&state, &owner, &repo, filter).await
}

/// GET /api/repositories/{owner}/{repo}/search?q=
pub async fn search_repository(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    params: Result<Query<InRepoSearchParams>, QueryRejection>,
) -> Result<Json<InRepoSearchResults>, ApiError> {
    let Path((owner, repo)) = path?;
    let Query(params) = params?;
    let query = required(&params.q, "Query parameter is required")?;
    crate::search::search_within_repository(&state.github, &owner, &repo, query)
        .await
        .map(Json)
        .map_err(|e| {
            ApiError::upstream(
                &format!("An error occurred while searching the repository {owner}/{repo}"),
                &e,
            )
        })
}

/// GET /api/repositories/{owner}/{repo}/file?url=
pub async fn get_file(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    params: Result<Query<FileParams>, QueryRejection>,
) -> Result<Json<FileDetail>, ApiError> {
    let Path((owner, repo)) = path?;
    let Query(params) = params?;
    let url = required(&params.url, "File URL is required")?;
    tracing::debug!("Fetching file for {owner}/{repo}: {url}");
    state
        .github
        .fetch_file(url)
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("An error occurred while fetching file content", &e))
}

/// GET /api/github-get-repository?owner=&repo=
pub async fn get_repository(
    State(state): State<AppState>,
    params: Result<Query<OwnerRepoParams>, QueryRejection>,
) -> Result<Json<RepositoryDetails>, ApiError> {
    let Query(params) = params?;
    let (owner, repo) = owner_and_repo(&params)?;
    state
        .github
        .get_repository(owner, repo)
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("An error occurred while fetching the repository", &e))
}

/// GET /api/github-get-repository-issues?owner=&repo=&state=
pub async fn get_repository_issues(
    State(state): State<AppState>,
    params: Result<Query<OwnerRepoParams>, QueryRejection>,
) -> Result<Json<Vec<Issue>>, ApiError> {
    let Query(params) = params?;
    let (owner, repo) = owner_and_repo(&params)?;
    let filter = parse_issue_filter(params.state.as_deref())?;
    fetch_issues(&state, owner, repo, filter).await
}

async fn fetch_issues(
    state: &AppState,
    owner: &str,
    repo: &str,
    filter: IssueFilter,
) -> Result<Json<Vec<Issue>>, ApiError> {
    state
        .github
        .list_issues(owner, repo, filter)
        .await
        .map(Json)
        .map_err(|e| {
            ApiError::upstream(
                &format!("An error occurred while fetching issues for {owner}/{repo}"),
                &e,
            )
        })
}

fn owner_and_repo(params: &OwnerRepoParams) -> Result<(&str, &str), ApiError> {
    const MESSAGE: &str = "Owner and repo parameters are required";
    Ok((required(&params.owner, MESSAGE)?, required(&params.repo, MESSAGE)?))
}

fn parse_issue_filter(raw: Option<&str>) -> Result<IssueFilter, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(IssueFilter::All),
        Some(s) => IssueFilter::parse(s)
            .ok_or_else(|| ApiError::bad_request("state must be one of open, closed, all")),
    }
}
