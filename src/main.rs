use anyhow::{Context, Result};
use repogate::api::{build_http_client, create_router, AppState};
use repogate::config::Config;
use repogate::crypto::TokenCipher;
use repogate::store::{run_expiry_sweeper, MemorySessionStore, MemoryStateStore};
use std::sync::Arc;
use tracing::info;

/// How often the background sweeper reaps expired records.
const SWEEP_INTERVAL_SECONDS: u64 = 60;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repogate=info".into()),
        )
        .init();

    let config = Config::from_env().context("configuration error")?;

    // Key validation happens here, once; a bad key never becomes a
    // per-request failure.
    let cipher = TokenCipher::new(&config.encryption_key).context("invalid encryption key")?;

    let http = build_http_client()?;

    let state_store = MemoryStateStore::new();
    let session_store = MemorySessionStore::new();

    tokio::spawn(run_expiry_sweeper(
        state_store.clone(),
        session_store.clone(),
        SWEEP_INTERVAL_SECONDS,
    ));

    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState {
        config: Arc::new(config),
        cipher: Arc::new(cipher),
        state_store: Arc::new(state_store),
        session_store: Arc::new(session_store),
        http,
    });

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!(addr = %bind_addr, "repogate listening");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
