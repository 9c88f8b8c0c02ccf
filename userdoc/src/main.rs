//! userdoc - HTTP user service
use anyhow::Context;
use clap::Parser;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use userdoc::{router, state::AppState, store::open_store, Config};
use userdoc_core::repository::UserRepository;

#[derive(Parser)]
#[command(name = "userdoc")]
#[command(about = "HTTP service for user records in a document store", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./userdoc.toml when present)
    #[arg(short, long, env = "USERDOC_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "userdoc=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    config.validate()?;

    let store = open_store(&config.store).await?;
    let repository = Arc::new(UserRepository::new(store, config.store.request_timeout()));

    repository
        .ping(config.store.connect_timeout())
        .await
        .context("document store is not reachable")?;
    tracing::info!("Document store connected");

    let app = router(AppState::new(Arc::clone(&repository)));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match Arc::try_unwrap(repository) {
        Ok(repository) => {
            repository.into_store().shutdown().await?;
            tracing::info!("Document store closed");
        }
        Err(_) => tracing::warn!("Repository still in use, skipping store shutdown"),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutting down");
}
