//! HTTPサーバー（プロキシ + 静的ファイル）

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, routing::any, Router};
use secrecy::SecretString;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{Result, SoilSearchError};
use crate::proxy::{plant_identify, PlantIdUpstream, Upstream};
use crate::static_files::serve_static;

pub const IDENTIFY_ROUTE: &str = "/api/plant-identify";

/// 10 MiB の画像をBase64化したものが収まるサイズ
const MAX_REQUEST_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub api_key: Option<SecretString>,
    pub upstream: Arc<dyn Upstream>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let upstream = PlantIdUpstream::new(
            config.upstream_url.clone(),
            Duration::from_secs(config.timeout_seconds),
        )?;
        Ok(Self {
            root: config.root.clone(),
            api_key: config.api_key.clone(),
            upstream: Arc::new(upstream),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(IDENTIFY_ROUTE, any(plant_identify))
        .fallback(serve_static)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    if !config.root.is_dir() {
        return Err(SoilSearchError::Config(format!(
            "公開ディレクトリが見つかりません: {}",
            config.root.display()
        )));
    }
    if !config.has_api_key() {
        tracing::warn!("PLANT_ID_API_KEY is not set; {} will answer 500", IDENTIFY_ROUTE);
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = build_router(AppState::from_config(&config)?);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(root = %config.root.display(), "Static server running at http://localhost:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
