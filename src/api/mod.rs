pub mod error;
pub mod repos;
pub mod search;
pub mod summary;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

/// Build the HTTP router with every API route attached to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Repository search
        .route("/api/repositories/search", get(search::search_repositories))
        .route("/api/github-search", get(search::github_search))
        // Single repository
        .route(
            "/api/repositories/{owner}/{repo}",
            get(repos::get_repository_bundle),
        )
        .route(
            "/api/repositories/{owner}/{repo}/issues",
            get(repos::list_issues),
        )
        .route(
            "/api/repositories/{owner}/{repo}/search",
            get(repos::search_repository),
        )
        .route("/api/repositories/{owner}/{repo}/file", get(repos::get_file))
        .route("/api/github-get-repository", get(repos::get_repository))
        .route(
            "/api/github-get-repository-issues",
            get(repos::get_repository_issues),
        )
        // Query syntax
        .route("/api/query/parse", get(search::parse))
        .route("/api/query/build", post(search::build))
        // Summaries
        .route("/api/ai/summarize", post(summary::submit))
        .route("/api/ai/summarize/{id}", get(summary::status))
        .route("/api/ai/analyse", post(summary::analyse))
        .route("/api/health", get(health))
        .with_state(state)
}

/// GET /api/health
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "githubTokenConfigured": state.config.has_github_token(),
    }))
}
