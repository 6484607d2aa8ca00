use anyhow::{Context, Result};
use clap::Parser;
use speaking_partner::config::{api_key_from_env, Config};
use speaking_partner::{create_router, AppState, GroqClient};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "speaking-partner", about = "Spoken English practice backend")]
struct Args {
    /// Configuration file (extension optional)
    #[arg(long, default_value = "config/speaking-partner")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config).context("Failed to load configuration")?;
    let api_key = api_key_from_env()?;

    info!("Loaded config: {}", cfg.service.name);

    let groq = GroqClient::new(cfg.groq.clone(), api_key).context("Failed to build HTTP client")?;
    let state =
        AppState::new(Arc::new(groq)).with_max_upload_bytes(cfg.service.http.max_upload_bytes);

    if let Some(ttl) = cfg.session.idle_ttl() {
        let sessions = Arc::clone(&state.sessions);
        let mut interval = tokio::time::interval(cfg.session.reap_interval());
        info!("Idle sessions expire after {}s", ttl.as_secs());
        tokio::spawn(async move {
            loop {
                interval.tick().await;
                sessions.reap_idle(ttl).await;
            }
        });
    }

    let addr = cfg.service.http.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
