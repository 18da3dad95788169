//! Surebet Backend - Cross-Bookmaker Arbitrage Service
//! Mission: Spot guaranteed-margin odds pairs before they close
//! Philosophy: Pure detection core, disposable transport shell

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, sync::broadcast, time::interval};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use surebet_backend::api::{create_router, AppState};
use surebet_backend::arbitrage::catalog::MarketCatalog;
use surebet_backend::arbitrage::engine::ArbitrageEngine;
use surebet_backend::arbitrage::normalizer::Normalizer;
use surebet_backend::feed::{OddsFeed, SimulatedOddsFeed, UpstreamOddsFeed};
use surebet_backend::models::{Config, WsServerEvent};

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    info!("🚀 Surebet backend starting");

    let config = Config::from_env()?;
    let catalog = MarketCatalog::from_env();
    info!("📒 Market catalog: {} entries", catalog.entries().len());

    let feed: Arc<dyn OddsFeed> = match UpstreamOddsFeed::from_env() {
        Some(upstream) => {
            info!("📡 Using upstream odds feed at {}", upstream.url());
            Arc::new(upstream)
        }
        None => {
            info!("📡 No upstream configured, using simulated odds feed");
            Arc::new(SimulatedOddsFeed::from_env())
        }
    };

    // Broadcast channel for WebSocket snapshot pushes
    let (ws_tx, _ws_rx) = broadcast::channel::<WsServerEvent>(1000);

    let state = AppState {
        feed,
        normalizer: Arc::new(Normalizer::new(catalog)),
        engine: Arc::new(ArbitrageEngine::new(config.total_stake)),
        ws_broadcast: ws_tx,
    };

    // Periodic snapshot refresh feeding connected WebSocket clients
    tokio::spawn(refresh_loop(state.clone(), config.refresh_interval_secs));

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Periodic pipeline tick: fetch, normalize, compute, broadcast.
async fn refresh_loop(state: AppState, interval_secs: u64) {
    info!(
        "🔄 Refresh loop started ({}s interval, feed: {})",
        interval_secs,
        state.feed.name()
    );

    let mut ticker = interval(Duration::from_secs(interval_secs));
    loop {
        ticker.tick().await;

        match state.compute_snapshot().await {
            Ok(opportunities) => {
                if !opportunities.is_empty() {
                    info!(
                        "🎯 {} arbitrage opportunities in snapshot",
                        opportunities.len()
                    );
                }
                // send only fails when no client is subscribed
                let _ = state
                    .ws_broadcast
                    .send(WsServerEvent::Opportunities(opportunities));
            }
            Err(e) => {
                warn!("⚠️  Refresh tick failed (non-critical): {}", e);
                // Keep polling even when one tick fails.
            }
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "surebet_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv::dotenv();

    // 2) Also try the manifest-dir .env (common when running with
    //    --manifest-path from elsewhere)
    let candidate = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}
