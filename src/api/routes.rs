use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::arbitrage::engine::ArbitrageEngine;
use crate::arbitrage::normalizer::Normalizer;
use crate::feed::OddsFeed;
use crate::models::{Opportunity, WsServerEvent};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<dyn OddsFeed>,
    pub normalizer: Arc<Normalizer>,
    pub engine: Arc<ArbitrageEngine>,
    pub ws_broadcast: broadcast::Sender<WsServerEvent>,
}

impl AppState {
    /// Run one full pipeline tick: fetch, normalize, compute.
    ///
    /// Every HTTP request and every WebSocket connect computes fresh; the
    /// server keeps no snapshot cache.
    pub async fn compute_snapshot(&self) -> anyhow::Result<Vec<Opportunity>> {
        let raw = self.feed.fetch_events().await?;
        let events = self.normalizer.normalize(&raw)?;
        let opportunities = self.engine.compute_opportunities(&events)?;
        Ok(opportunities)
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/arbitrage", get(get_opportunities))
        .route("/api/arbitrage/:id", get(get_opportunity_by_id))
        .route("/ws", get(websocket_handler))
        .with_state(state)
}

// ===== Route Handlers =====

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Current opportunities with optional filters
async fn get_opportunities(
    State(state): State<AppState>,
    Query(params): Query<OpportunityQuery>,
) -> Result<Json<OpportunitiesResponse>, ApiError> {
    let snapshot = state.compute_snapshot().await?;
    let opportunities = apply_filters(snapshot, &params);

    Ok(Json(OpportunitiesResponse {
        count: opportunities.len(),
        opportunities,
    }))
}

/// Look up a single opportunity by its identifier
async fn get_opportunity_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Opportunity>, ApiError> {
    state
        .compute_snapshot()
        .await?
        .into_iter()
        .find(|opp| opp.id == id)
        .map(Json)
        .ok_or(ApiError::NotFound(format!("Opportunity {} not found", id)))
}

/// Filtering is a transport concern; the engine emits the full snapshot.
fn apply_filters(opportunities: Vec<Opportunity>, params: &OpportunityQuery) -> Vec<Opportunity> {
    opportunities
        .into_iter()
        .filter(|opp| params.league.as_ref().map_or(true, |l| &opp.league == l))
        .filter(|opp| {
            params
                .bookmaker
                .as_ref()
                .map_or(true, |b| opp.bets.iter().any(|bet| &bet.bookmaker == b))
        })
        .filter(|opp| {
            params
                .min_profit
                .map_or(true, |min| opp.profit_percent >= min)
        })
        .collect()
}

// ===== WebSocket =====

/// WebSocket handler for opportunity streaming
async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut rx = state.ws_broadcast.subscribe();

    // On connect, send one fresh snapshot so the client has data before
    // the next refresh tick lands.
    let initial = match state.compute_snapshot().await {
        Ok(opportunities) => WsServerEvent::Opportunities(opportunities),
        Err(e) => {
            tracing::error!("Initial snapshot failed: {}", e);
            WsServerEvent::Error {
                message: "Failed to compute opportunities".to_string(),
            }
        }
    };
    let msg = serde_json::to_string(&initial).unwrap_or_else(|_| "{}".to_string());
    if socket.send(Message::Text(msg)).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            // Relay refreshed snapshots to the client
            received = rx.recv() => {
                match received {
                    Ok(event) => {
                        let msg = serde_json::to_string(&event)
                            .unwrap_or_else(|e| {
                                tracing::warn!("Failed to serialize ws event: {}", e);
                                "{}".to_string()
                            });
                        if socket.send(Message::Text(msg)).await.is_err() {
                            break;
                        }
                    }
                    // A slow client that falls behind skips the missed
                    // snapshots and resumes with the next one.
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("WebSocket client lagged, dropped {} snapshots", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            // Handle incoming messages from the client
            Some(Ok(msg)) = socket.recv() => {
                match msg {
                    Message::Text(text) => {
                        if text == "ping" {
                            let _ = socket.send(Message::Text("pong".to_string())).await;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    }
}

// ===== Request/Response Types =====

#[derive(Debug, Default, Deserialize)]
struct OpportunityQuery {
    /// Exact match on the normalized league name
    league: Option<String>,
    /// Keep opportunities where either leg uses this bookmaker
    bookmaker: Option<String>,
    /// Lower bound on profitPercent
    #[serde(alias = "minProfit")]
    min_profit: Option<f64>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Serialize)]
struct OpportunitiesResponse {
    count: usize,
    opportunities: Vec<Opportunity>,
}

// ===== Error Handling =====

#[derive(Debug)]
enum ApiError {
    Pipeline(anyhow::Error),
    NotFound(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Pipeline(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Pipeline(err) => {
                tracing::error!("Pipeline error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
