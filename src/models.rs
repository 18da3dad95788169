use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical market categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketKind {
    HomeWin,
    AwayWin,
    Draw,
    Other,
}

/// A single market quote as it arrives from a feed, untrusted.
///
/// `odds` defaults to 0.0 when the field is missing so deserialization
/// stays total; the normalizer rejects anything that is not a finite
/// number above 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMarketQuote {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub odds: f64,
}

/// One bookmaker's markets for an event, untrusted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBookmakerQuote {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub markets: Vec<RawMarketQuote>,
}

/// A feed-shaped event record before normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub sport: String,
    #[serde(default)]
    pub league: String,
    #[serde(rename = "match", default)]
    pub match_name: String,
    #[serde(default)]
    pub datetime: String,
    #[serde(default)]
    pub bookmakers: Vec<RawBookmakerQuote>,
}

/// A normalized market quote: canonical display name, category, odds > 1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketQuote {
    pub name: String,
    pub kind: MarketKind,
    pub odds: f64,
}

/// A bookmaker with its normalized markets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmakerQuote {
    pub name: String,
    pub markets: Vec<MarketQuote>,
}

/// A fully normalized event, immutable input to the arbitrage engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub sport: String,
    pub league: String,
    #[serde(rename = "match")]
    pub match_name: String,
    pub datetime: DateTime<Utc>,
    pub bookmakers: Vec<BookmakerQuote>,
}

/// One leg of an arbitrage opportunity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetInstruction {
    pub bookmaker: String,
    pub market: String,
    pub odds: f64,
    pub stake: f64,
}

/// A detected arbitrage opportunity with its equal-payout stake split
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    #[serde(rename = "match")]
    pub match_name: String,
    pub league: String,
    pub datetime: DateTime<Utc>,
    pub profit_percent: f64,
    pub total_stake: f64,
    pub bets: Vec<BetInstruction>,
}

/// Events pushed to WebSocket clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum WsServerEvent {
    /// Full opportunity snapshot, sent on connect and on every refresh
    Opportunities(Vec<Opportunity>),
    /// Pipeline failure while producing a snapshot for this client
    Error { message: String },
}

/// Application configuration
///
/// Catalog and feed collaborators read their own env vars
/// (MARKET_CATALOG_PATH, ODDS_FEED_URL, SIM_FEED_SEED).
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub refresh_interval_secs: u64,
    pub total_stake: f64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .unwrap_or(8000);

        let refresh_interval_secs = std::env::var("REFRESH_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(30);

        let total_stake = std::env::var("TOTAL_STAKE")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|&v| v.is_finite() && v > 0.0)
            .unwrap_or(100.0);

        Ok(Self {
            port,
            refresh_interval_secs,
            total_stake,
        })
    }
}
