use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use newswire_client::ReqwestNewsClient;
use newswire_core::{EnvApiKey, IngestionJob, SystemClock, default_top_queries, load_top_queries};
use newswire_db::{Database, DatabaseConfig};
use newswire_server::config::ServerConfig;
use newswire_server::routes;
use newswire_server::scheduler::spawn_ingestion;
use newswire_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("newswire=info".parse()?))
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;

    let db = Database::connect(&DatabaseConfig::from_env()?).await?;
    db.migrate().await?;
    let store = db.store();

    let client = ReqwestNewsClient::with_base_url(&config.upstream_base_url)?;
    let keys = EnvApiKey::new();

    let cancel_token = CancellationToken::new();
    let scheduler = match config.ingest_interval {
        Some(period) => {
            let top_queries = match &config.top_queries {
                Some(path) => load_top_queries(path)?,
                None => default_top_queries(),
            };
            let job = IngestionJob::new(client.clone(), store.clone(), keys.clone(), SystemClock)
                .with_top_queries(top_queries);
            tracing::info!(
                entries = job.top_queries().len(),
                period_secs = period.as_secs(),
                "Scheduled ingestion enabled"
            );
            Some(spawn_ingestion(job, period, cancel_token.clone()))
        }
        None => {
            tracing::info!("Scheduled ingestion disabled");
            None
        }
    };

    let state = Arc::new(AppState::new(client, keys, store));
    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Starting server on {}", config.addr);
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token.clone()))
        .await?;

    if let Some(handle) = scheduler {
        cancel_token.cancel();
        handle.await?;
    }
    db.close().await;

    Ok(())
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
    cancel_token.cancel();
}
