//! Simulated odds feed for development and tests.
//!
//! Serves a fixed set of fixture events and jitters every odds value on
//! each fetch, so consecutive snapshots look like a live market. Jitter is
//! applied to the pristine base odds, never compounded.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::feed::OddsFeed;
use crate::models::{RawBookmakerQuote, RawEvent, RawMarketQuote};

/// Multiplicative jitter band: odds * (0.95 + r * 0.10), r in [0, 1)
const FLUCTUATION_BASE: f64 = 0.95;
const FLUCTUATION_SPAN: f64 = 0.10;

pub struct SimulatedOddsFeed {
    base_events: Vec<RawEvent>,
    rng: Mutex<ChaCha8Rng>,
}

impl SimulatedOddsFeed {
    pub fn new() -> Self {
        Self {
            base_events: fixture_events(),
            rng: Mutex::new(ChaCha8Rng::from_entropy()),
        }
    }

    /// Deterministic odds sequences for tests and replays
    pub fn seeded(seed: u64) -> Self {
        Self {
            base_events: fixture_events(),
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Build from environment; SIM_FEED_SEED pins the RNG when set
    pub fn from_env() -> Self {
        match std::env::var("SIM_FEED_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        }
    }

    /// Replace the fixture set
    pub fn with_events(mut self, events: Vec<RawEvent>) -> Self {
        self.base_events = events;
        self
    }
}

impl Default for SimulatedOddsFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OddsFeed for SimulatedOddsFeed {
    async fn fetch_events(&self) -> anyhow::Result<Vec<RawEvent>> {
        let mut rng = self.rng.lock();
        let mut events = self.base_events.clone();

        for event in &mut events {
            for bookmaker in &mut event.bookmakers {
                for market in &mut bookmaker.markets {
                    let jitter = FLUCTUATION_BASE + rng.gen::<f64>() * FLUCTUATION_SPAN;
                    market.odds *= jitter;
                }
            }
        }

        Ok(events)
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

/// The two development fixtures every snapshot is derived from
fn fixture_events() -> Vec<RawEvent> {
    let market = |name: &str, odds: f64| RawMarketQuote {
        name: name.to_string(),
        odds,
    };
    let bookmaker = |name: &str, markets: Vec<RawMarketQuote>| RawBookmakerQuote {
        name: name.to_string(),
        markets,
    };

    vec![
        RawEvent {
            id: "1".to_string(),
            sport: "Football".to_string(),
            league: "English Premier League".to_string(),
            match_name: "Manchester City vs Arsenal".to_string(),
            datetime: "2024-03-07T16:00:00Z".to_string(),
            bookmakers: vec![
                bookmaker("Bet365", vec![market("Home Win", 1.95)]),
                bookmaker("William Hill", vec![market("Away Win", 4.2)]),
            ],
        },
        RawEvent {
            id: "2".to_string(),
            sport: "Football".to_string(),
            league: "La Liga".to_string(),
            match_name: "Real Madrid vs Barcelona".to_string(),
            datetime: "2024-03-08T20:00:00Z".to_string(),
            bookmakers: vec![
                bookmaker("Betfair", vec![market("Home Win", 2.1)]),
                bookmaker("Unibet", vec![market("Away Win", 3.8)]),
            ],
        },
    ]
}
