//! The repository page bundle: details, commit history with per-commit stats,
//! branches and forks.

use std::sync::Arc;

use futures_util::future::try_join_all;
use tokio::sync::Semaphore;

use crate::config::CommitFetchConfig;
use crate::github::{GitHubClient, GitHubError};
use crate::models::{Commit, Fork, RepositoryBundle};

/// Fetch everything the repository page shows. Details, commits and
/// branches must all succeed; a fork listing failure degrades to no forks.
pub async fn load_repository_bundle(
    github: &GitHubClient,
    limits: &CommitFetchConfig,
    owner: &str,
    repo: &str,
) -> Result<RepositoryBundle, GitHubError> {
    let (details, commits, branches, forks) = tokio::try_join!(
        github.get_repository(owner, repo),
        commits_with_stats(github, limits, owner, repo),
        github.list_branches(owner, repo),
        forks_or_empty(github, owner, repo),
    )?;

    Ok(RepositoryBundle {
        details,
        commits,
        branches,
        forks,
    })
}

/// List recent commits and attach each one's stats from the detail endpoint.
///
/// At most `max_concurrent_fetches` detail requests are in flight. Order
/// follows the commit list; the first failed detail fetch fails the call and
/// drops the requests still pending.
pub async fn commits_with_stats(
    github: &GitHubClient,
    limits: &CommitFetchConfig,
    owner: &str,
    repo: &str,
) -> Result<Vec<Commit>, GitHubError> {
    let commits = github
        .list_commits(owner, repo, limits.history_limit.clamp(1, 100))
        .await?;

    let semaphore = Arc::new(Semaphore::new(limits.max_concurrent_fetches.max(1)));
    let fetches = commits.into_iter().map(|commit| {
        let semaphore = semaphore.clone();
        async move {
            let _permit = semaphore.acquire().await;
            let detail = github.get_commit(owner, repo, &commit.sha).await?;
            Ok::<_, GitHubError>(Commit {
                stats: detail.stats,
                ..commit
            })
        }
    });

    let enriched = try_join_all(fetches).await?;
    tracing::debug!("Fetched stats for {} commits of {owner}/{repo}", enriched.len());
    Ok(enriched)
}

async fn forks_or_empty(
    github: &GitHubClient,
    owner: &str,
    repo: &str,
) -> Result<Vec<Fork>, GitHubError> {
    match github.list_forks(owner, repo).await {
        Ok(forks) => Ok(forks),
        Err(e) => {
            tracing::error!("Error fetching forks for {owner}/{repo}: {e}");
            Ok(Vec::new())
        }
    }
}
