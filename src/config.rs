use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// GitHub API access
    pub github: GitHubConfig,
    /// Commit history fetch limits
    pub commits: CommitFetchConfig,
    /// LLM provider used for file summaries
    pub llm: LlmConfig,
    /// Summary job store limits
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Personal access token. Requests still go out without one, but GitHub
    /// will reject or heavily rate-limit them.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// REST API root
    pub api_base_url: String,
    /// Value sent in `X-GitHub-Api-Version`
    pub api_version: String,
    /// Hosts that raw file content may be fetched from
    pub raw_hosts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitFetchConfig {
    /// How many recent commits to list (GitHub caps a page at 100)
    pub history_limit: u32,
    /// Maximum per-commit detail requests in flight
    pub max_concurrent_fetches: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama", "openai" or "anthropic"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for completions
    pub model: String,
    /// API key (only needed for cloud providers)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Completion length cap
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Maximum jobs held at once; the oldest is evicted when full
    pub max_jobs: usize,
    /// Seconds a job stays retrievable after submission
    pub ttl_secs: u64,
    /// Content longer than this many characters is truncated before summarizing
    pub max_content_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            github: GitHubConfig::default(),
            commits: CommitFetchConfig::default(),
            llm: LlmConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base_url: "https://api.github.com".to_string(),
            api_version: "2022-11-28".to_string(),
            raw_hosts: vec![
                "raw.githubusercontent.com".to_string(),
                "api.github.com".to_string(),
            ],
        }
    }
}

impl Default for CommitFetchConfig {
    fn default() -> Self {
        Self {
            history_limit: 100,
            max_concurrent_fetches: 8,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            api_key: None,
            max_tokens: 300,
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_jobs: 256,
            ttl_secs: 3600,
            max_content_chars: 20_000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("REPO_SCOUT_BIND_ADDR") {
            config.bind_addr = addr;
        }

        // GitHub
        if let Ok(token) = std::env::var("GITHUB_ACCESS_TOKEN") {
            if !token.trim().is_empty() {
                config.github.token = Some(token);
            }
        }
        if let Ok(url) = std::env::var("GITHUB_API_BASE_URL") {
            config.github.api_base_url = url;
        }
        if let Ok(version) = std::env::var("GITHUB_API_VERSION") {
            config.github.api_version = version;
        }
        if let Ok(hosts) = std::env::var("REPO_SCOUT_RAW_HOSTS") {
            config.github.raw_hosts = hosts
                .split(',')
                .map(|h| h.trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect();
        }

        // Commit history
        if let Ok(val) = std::env::var("REPO_SCOUT_COMMIT_HISTORY_LIMIT") {
            if let Ok(v) = val.parse::<u32>() {
                config.commits.history_limit = v.clamp(1, 100);
            }
        }
        if let Ok(val) = std::env::var("REPO_SCOUT_MAX_COMMIT_FETCHES") {
            if let Ok(v) = val.parse::<usize>() {
                config.commits.max_concurrent_fetches = v.max(1);
            }
        }

        // LLM
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.llm.model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Ok(val) = std::env::var("LLM_MAX_TOKENS") {
            if let Ok(v) = val.parse() {
                config.llm.max_tokens = v;
            }
        }

        // Summary jobs
        if let Ok(val) = std::env::var("SUMMARY_MAX_JOBS") {
            if let Ok(v) = val.parse::<usize>() {
                config.summary.max_jobs = v.max(1);
            }
        }
        if let Ok(val) = std::env::var("SUMMARY_TTL_SECS") {
            if let Ok(v) = val.parse() {
                config.summary.ttl_secs = v;
            }
        }
        if let Ok(val) = std::env::var("SUMMARY_MAX_CONTENT_CHARS") {
            if let Ok(v) = val.parse() {
                config.summary.max_content_chars = v;
            }
        }

        config
    }

    pub fn has_github_token(&self) -> bool {
        self.github.token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_public_github() {
        let config = Config::default();
        assert_eq!(config.github.api_base_url, "https://api.github.com");
        assert_eq!(config.github.api_version, "2022-11-28");
        assert_eq!(config.commits.history_limit, 100);
        assert!(!config.has_github_token());
    }

    #[test]
    fn test_serialized_config_never_contains_secrets() {
        let mut config = Config::default();
        config.github.token = Some("ghp_secret".to_string());
        config.llm.api_key = Some("sk-secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
