//! Shared fixtures: a config pointed at a mock GitHub server and canned
//! GitHub payloads.

#![allow(dead_code)]

use serde_json::{json, Value};

use repo_scout::config::Config;
use repo_scout::github::GitHubClient;

/// Config whose GitHub and LLM endpoints both point at `server_uri`.
pub fn config_for(server_uri: &str) -> Config {
    let mut config = Config::default();
    config.github.api_base_url = server_uri.to_string();
    config.github.token = Some("test-token".to_string());
    config.github.raw_hosts = vec!["127.0.0.1".to_string()];
    config.llm.provider = "openai".to_string();
    config.llm.base_url = server_uri.to_string();
    config.llm.model = "gpt-4o-mini".to_string();
    config.commits.max_concurrent_fetches = 2;
    config
}

pub fn github_client(server_uri: &str) -> GitHubClient {
    GitHubClient::new(reqwest::Client::new(), &config_for(server_uri).github).unwrap()
}

pub fn repo_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("octo/{name}"),
        "owner": { "login": "octo", "id": 1, "type": "User" },
        "html_url": format!("https://github.com/octo/{name}"),
        "description": null,
        "stargazers_count": id,
        "language": "Rust",
    })
}

pub fn search_page(items: Vec<Value>, total_count: u64) -> Value {
    json!({
        "total_count": total_count,
        "incomplete_results": false,
        "items": items,
    })
}

pub fn commit_json(sha: &str) -> Value {
    json!({
        "sha": sha,
        "html_url": format!("https://github.com/octo/hello/commit/{sha}"),
        "commit": {
            "message": format!("commit {sha}"),
            "author": { "name": "Octo", "email": "octo@example.com", "date": "2024-01-02T03:04:05Z" },
        },
        "parents": [],
    })
}

pub fn commit_detail_json(sha: &str, additions: u64, deletions: u64) -> Value {
    let mut commit = commit_json(sha);
    commit["stats"] = json!({
        "additions": additions,
        "deletions": deletions,
        "total": additions + deletions,
    });
    commit
}
