use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::state::AppState;
use crate::summary::{SummaryError, SummaryJob};

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub content: String,
}

/// POST /api/ai/summarize - Queue a summary job
pub async fn submit(
    State(state): State<AppState>,
    body: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SummaryJob>), ApiError> {
    let Json(req) = body?;
    let job = state
        .summaries
        .submit(&req.content)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    tracing::info!("Queued summary job {} ({} chars)", job.job_id, req.content.len());
    Ok((StatusCode::ACCEPTED, Json(job)))
}

/// GET /api/ai/summarize/{id}
pub async fn status(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SummaryJob>, ApiError> {
    let Path(id) = path?;
    state
        .summaries
        .get(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Summary job {id} not found")))
}

#[derive(Debug, Deserialize)]
pub struct AnalyseRequest {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyseResponse {
    pub analysis: String,
}

/// POST /api/ai/analyse - Review a code snippet and answer in the same request
pub async fn analyse(
    State(state): State<AppState>,
    body: Result<Json<AnalyseRequest>, JsonRejection>,
) -> Result<Json<AnalyseResponse>, ApiError> {
    let Json(req) = body?;
    match state.summaries.analyse(&req.code).await {
        Ok(analysis) => Ok(Json(AnalyseResponse { analysis })),
        Err(SummaryError::EmptyContent) => Err(ApiError::bad_request("Code is required")),
        Err(e @ SummaryError::Completion(_)) => {
            tracing::error!("Code analysis failed: {e}");
            Err(ApiError::internal("Error analyzing code", e))
        }
    }
}
