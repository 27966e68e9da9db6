use std::sync::Arc;

use crate::config::Config;
use crate::github::GitHubClient;
use crate::search::RepositorySearchService;
use crate::summary::SummaryService;

/// Shared application state. Everything here is either read-only after
/// startup or guards its own interior state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub github: GitHubClient,
    pub repo_search: RepositorySearchService,
    pub summaries: Arc<SummaryService>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        let github = GitHubClient::new(http_client.clone(), &config.github)?;
        let summaries = SummaryService::new(http_client, config.llm.clone(), &config.summary);

        Ok(Self {
            repo_search: RepositorySearchService::new(github.clone()),
            github,
            summaries: Arc::new(summaries),
            config: Arc::new(config),
        })
    }
}
