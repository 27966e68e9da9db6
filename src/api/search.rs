use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::{required, ApiError};
use crate::models::SearchResultEnvelope;
use crate::query::{build_query, parse_query, QualifierState, QueryBuildError, SearchQuery};
use crate::search::repositories::DEFAULT_PER_PAGE;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RepositorySearchParams {
    pub q: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Same search, with the parameter names the older search page uses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySearchParams {
    pub query: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /api/repositories/search?q=&page=&per_page=
pub async fn search_repositories(
    State(state): State<AppState>,
    params: Result<Query<RepositorySearchParams>, QueryRejection>,
) -> Result<Json<SearchResultEnvelope>, ApiError> {
    let Query(params) = params?;
    let query = required(&params.q, "Query parameter is required")?;
    run_search(&state, query, params.page, params.per_page).await
}

/// GET /api/github-search?query=&page=&perPage=
pub async fn github_search(
    State(state): State<AppState>,
    params: Result<Query<LegacySearchParams>, QueryRejection>,
) -> Result<Json<SearchResultEnvelope>, ApiError> {
    let Query(params) = params?;
    let query = required(&params.query, "Query parameter is required")?;
    run_search(&state, query, params.page, params.per_page).await
}

async fn run_search(
    state: &AppState,
    query: &str,
    page: Option<u32>,
    per_page: Option<u32>,
) -> Result<Json<SearchResultEnvelope>, ApiError> {
    let envelope = state
        .repo_search
        .search(
            query,
            page.unwrap_or(1),
            per_page.unwrap_or(DEFAULT_PER_PAGE),
        )
        .await;

    if let Some(error) = &envelope.error {
        tracing::warn!("Search for {query:?} returned {:?}: {}", error.kind, error.message);
    }
    Ok(Json(envelope))
}

#[derive(Debug, Deserialize)]
pub struct ParseParams {
    pub q: Option<String>,
}

/// GET /api/query/parse?q= - Split a query into qualifier and free-text segments
pub async fn parse(
    params: Result<Query<ParseParams>, QueryRejection>,
) -> Result<Json<SearchQuery>, ApiError> {
    let Query(params) = params?;
    Ok(Json(parse_query(params.q.as_deref().unwrap_or_default())))
}

#[derive(Debug, Serialize)]
pub struct BuildResponse {
    pub query: String,
}

/// POST /api/query/build - Assemble a query string from qualifier state
pub async fn build(
    body: Result<Json<QualifierState>, JsonRejection>,
) -> Result<Json<BuildResponse>, ApiError> {
    let Json(state) = body?;
    match build_query(&state) {
        Ok(query) => Ok(Json(BuildResponse { query })),
        Err(e @ QueryBuildError::UnsupportedSymbolLanguages(_)) => {
            Err(ApiError::bad_request("Invalid qualifier combination").with_details(e))
        }
        Err(e @ (QueryBuildError::ReservedScalarKey(_) | QueryBuildError::QualifierInFreeText(_))) => {
            Err(ApiError::bad_request("Invalid qualifier").with_details(e))
        }
    }
}
