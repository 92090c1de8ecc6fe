use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use pda_journal::auth::{ClientSecrets, OidcProvider};
use pda_journal::config::{self, AppConfig};
use pda_journal::database::{DatabaseManager, Repository};
use pda_journal::directory::OktaDirectory;
use pda_journal::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config().clone();
    config.validate()?;
    tracing::info!("Starting PDA journal in {:?} mode", config.environment);

    let state = build_state(config).await?;
    let bind_addr = format!("{}:{}", state.config.server.bind, state.config.server.port);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("PDA journal listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    let pool = DatabaseManager::connect(&config.database).await?;
    DatabaseManager::initialize_schema(&pool).await?;

    let secrets = ClientSecrets::load(&config.oidc.client_secrets)?;
    let provider = OidcProvider::new(secrets, &config.oidc)?;
    let directory = OktaDirectory::new(&config.directory)?;

    Ok(AppState::new(
        Repository::new(pool),
        Arc::new(provider),
        Arc::new(directory),
        config,
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
