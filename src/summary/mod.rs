//! Asynchronous file summaries.
//!
//! A submitted summary becomes a job in a bounded, expiring [`JobStore`]; a
//! background task fills in the result, and clients poll by job id.

mod store;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

use crate::config::{LlmConfig, SummaryConfig};
pub use store::JobStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Completed { summary: String },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryJob {
    pub job_id: Uuid,
    #[serde(flatten)]
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    /// Set when the submitted content was cut to the configured maximum
    pub truncated: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("Content is required")]
    EmptyContent,
    #[error("completion failed: {0:#}")]
    Completion(anyhow::Error),
}

pub struct SummaryService {
    jobs: Mutex<JobStore<SummaryJob>>,
    http: reqwest::Client,
    llm: LlmConfig,
    max_content_chars: usize,
}

impl SummaryService {
    pub fn new(http: reqwest::Client, llm: LlmConfig, config: &SummaryConfig) -> Self {
        Self {
            jobs: Mutex::new(JobStore::new(
                config.max_jobs,
                Duration::from_secs(config.ttl_secs),
            )),
            http,
            llm,
            max_content_chars: config.max_content_chars,
        }
    }

    /// Register a job and start summarizing in the background.
    pub fn submit(self: &Arc<Self>, content: &str) -> Result<SummaryJob, SummaryError> {
        if content.trim().is_empty() {
            return Err(SummaryError::EmptyContent);
        }

        let (content, truncated) = truncate_chars(content, self.max_content_chars);
        let job = SummaryJob {
            job_id: Uuid::new_v4(),
            status: JobStatus::Pending,
            created_at: Utc::now(),
            truncated,
        };
        self.jobs.lock().insert(job.job_id, job.clone());

        let service = Arc::clone(self);
        let job_id = job.job_id;
        let content = content.to_string();
        tokio::spawn(async move {
            service.run(job_id, content).await;
        });

        Ok(job)
    }

    /// Analyze code in the request itself; no job is stored.
    pub async fn analyse(&self, code: &str) -> Result<String, SummaryError> {
        if code.trim().is_empty() {
            return Err(SummaryError::EmptyContent);
        }

        let (code, truncated) = truncate_chars(code, self.max_content_chars);
        if truncated {
            tracing::debug!("Analysis input truncated to {} chars", self.max_content_chars);
        }
        let prompt = crate::llm::analysis_prompt(code);
        crate::llm::complete(&self.http, &self.llm, &prompt)
            .await
            .map_err(SummaryError::Completion)
    }

    pub fn get(&self, job_id: &Uuid) -> Option<SummaryJob> {
        self.jobs.lock().get(job_id)
    }

    async fn run(&self, job_id: Uuid, content: String) {
        let prompt = crate::llm::summary_prompt(&content);
        let status = match crate::llm::complete(&self.http, &self.llm, &prompt).await {
            Ok(summary) => {
                tracing::info!("Summary job {job_id} completed");
                JobStatus::Completed { summary }
            }
            Err(e) => {
                tracing::error!("Summary job {job_id} failed: {e:#}");
                JobStatus::Failed {
                    error: format!("{e:#}"),
                }
            }
        };

        let updated = self.jobs.lock().update(&job_id, |job| job.status = status);
        if !updated {
            tracing::debug!("Summary job {job_id} expired or was evicted before completion");
        }
    }
}

/// Cut `text` to at most `max_chars` characters.
fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => (&text[..end], true),
        None => (text, false),
    }
}
