use reqwest::header::{HeaderMap, ACCEPT, USER_AGENT};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use super::GitHubError;
use crate::config::GitHubConfig;
use crate::models::{
    Branch, CodeSearchItem, Commit, FileDetail, Fork, Issue, Repository, RepositoryDetails,
    SearchPage,
};

/// Remaining quota at or below which every response logs a warning.
pub const LOW_RATE_LIMIT_THRESHOLD: u32 = 5;

const USER_AGENT_VALUE: &str = concat!("repo-scout/", env!("CARGO_PKG_VERSION"));

/// Issue list filter accepted by `GET /repos/{owner}/{repo}/issues`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IssueFilter {
    Open,
    Closed,
    #[default]
    All,
}

impl IssueFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Thin typed wrapper over the GitHub REST API. Cheap to clone.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    api_version: String,
    raw_hosts: Vec<String>,
}

impl GitHubClient {
    pub fn new(http: reqwest::Client, config: &GitHubConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            anyhow::anyhow!("Invalid GitHub API base URL {}: {e}", config.api_base_url)
        })?;
        Ok(Self {
            http,
            base_url,
            token: config.token.clone(),
            api_version: config.api_version.clone(),
            raw_hosts: config
                .raw_hosts
                .iter()
                .map(|h| h.to_ascii_lowercase())
                .collect(),
        })
    }

    // ─── Search ──────────────────────────────────────────

    pub async fn search_repositories(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<SearchPage<Repository>, GitHubError> {
        let mut url = self.endpoint(&["search", "repositories"])?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        self.get_json(url).await
    }

    pub async fn search_code(&self, query: &str) -> Result<SearchPage<CodeSearchItem>, GitHubError> {
        self.search(&["search", "code"], query).await
    }

    pub async fn search_issues(&self, query: &str) -> Result<SearchPage<Issue>, GitHubError> {
        self.search(&["search", "issues"], query).await
    }

    pub async fn search_commits(&self, query: &str) -> Result<SearchPage<Commit>, GitHubError> {
        self.search(&["search", "commits"], query).await
    }

    async fn search<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &str,
    ) -> Result<SearchPage<T>, GitHubError> {
        let mut url = self.endpoint(segments)?;
        url.query_pairs_mut().append_pair("q", query);
        self.get_json(url).await
    }

    // ─── Repository ──────────────────────────────────────

    pub async fn get_repository(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryDetails, GitHubError> {
        let url = self.endpoint(&["repos", owner, repo])?;
        self.get_json(url).await
    }

    pub async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        filter: IssueFilter,
    ) -> Result<Vec<Issue>, GitHubError> {
        let mut url = self.endpoint(&["repos", owner, repo, "issues"])?;
        url.query_pairs_mut().append_pair("state", filter.as_str());
        self.get_json(url).await
    }

    pub async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        per_page: u32,
    ) -> Result<Vec<Commit>, GitHubError> {
        let mut url = self.endpoint(&["repos", owner, repo, "commits"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string());
        self.get_json(url).await
    }

    pub async fn get_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Commit, GitHubError> {
        let url = self.endpoint(&["repos", owner, repo, "commits", sha])?;
        self.get_json(url).await
    }

    pub async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>, GitHubError> {
        let url = self.endpoint(&["repos", owner, repo, "branches"])?;
        self.get_json(url).await
    }

    pub async fn list_forks(&self, owner: &str, repo: &str) -> Result<Vec<Fork>, GitHubError> {
        let url = self.endpoint(&["repos", owner, repo, "forks"])?;
        self.get_json(url).await
    }

    /// Fetch raw file content. Only http(s) URLs on an allow-listed host are
    /// followed, since the bearer token is attached to the request.
    pub async fn fetch_file(&self, raw_url: &str) -> Result<FileDetail, GitHubError> {
        let url = self.check_file_url(raw_url)?;

        let resp = self
            .authorized(self.http.get(url.clone()))
            .header(ACCEPT, "application/vnd.github.raw")
            .send()
            .await?;
        let resp = self.check_status(resp).await?;
        let content = resp.text().await.map_err(GitHubError::Decode)?;

        let name = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
            .to_string();

        Ok(FileDetail {
            url: url.to_string(),
            name,
            size: content.len(),
            content,
        })
    }

    pub fn check_file_url(&self, raw_url: &str) -> Result<Url, GitHubError> {
        let url =
            Url::parse(raw_url).map_err(|e| GitHubError::DisallowedUrl(format!("{raw_url}: {e}")))?;
        if !matches!(url.scheme(), "https" | "http") {
            return Err(GitHubError::DisallowedUrl(format!(
                "{raw_url}: unsupported scheme"
            )));
        }
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        if !self.raw_hosts.iter().any(|allowed| *allowed == host) {
            return Err(GitHubError::DisallowedUrl(format!(
                "{raw_url}: host is not an allowed file source"
            )));
        }
        Ok(url)
    }

    // ─── Plumbing ────────────────────────────────────────

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GitHubError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GitHubError::DisallowedUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        let req = req
            .header("X-GitHub-Api-Version", &self.api_version)
            .header(USER_AGENT, USER_AGENT_VALUE);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, GitHubError> {
        tracing::debug!("GET {url}");
        let resp = self
            .authorized(self.http.get(url))
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;
        let resp = self.check_status(resp).await?;
        resp.json::<T>().await.map_err(GitHubError::Decode)
    }

    async fn check_status(&self, resp: reqwest::Response) -> Result<reqwest::Response, GitHubError> {
        let status = resp.status();
        let remaining = rate_limit_remaining(resp.headers());

        if let Some(remaining) = remaining {
            if remaining <= LOW_RATE_LIMIT_THRESHOLD {
                tracing::warn!("GitHub API rate limit is low: {remaining} requests remaining");
            }
        }

        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);
        Err(GitHubError::Status {
            status,
            rate_limit_remaining: remaining,
            message,
        })
    }
}

fn rate_limit_remaining(headers: &HeaderMap) -> Option<u32> {
    headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
