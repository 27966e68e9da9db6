use tracing_subscriber::EnvFilter;

use repo_scout::api;
use repo_scout::config::Config;
use repo_scout::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    if !config.has_github_token() {
        tracing::error!(
            "GITHUB_ACCESS_TOKEN is not set; GitHub requests will be unauthenticated and heavily rate-limited"
        );
    }
    tracing::info!("GitHub API: {}", config.github.api_base_url);
    tracing::info!("LLM provider: {} ({})", config.llm.provider, config.llm.base_url);

    let state = AppState::new(config.clone())?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
