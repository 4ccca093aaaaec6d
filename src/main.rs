use location_recommender::api::{create_router, AppState};
use location_recommender::config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let address = config.bind_address();
    tracing::info!(
        similarity = ?config.similarity,
        default_top_n = config.default_top_n,
        "Configuration loaded"
    );

    let app = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
