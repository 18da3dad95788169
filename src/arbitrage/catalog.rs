//! Canonical market-name catalog.
//!
//! A single-pass exact-match table: the whole normalized market name is
//! looked up once, never substituted token by token, so overlapping
//! canonical names cannot corrupt each other. Ships with a built-in
//! table and can be replaced wholesale from a TOML file.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::arbitrage::normalizer::normalize_string;
use crate::models::MarketKind;

/// One canonical market with the raw spellings that resolve to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketEntry {
    pub canonical: String,
    pub kind: MarketKind,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Lookup table from normalized market names to canonical form and kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketCatalog {
    #[serde(rename = "market", default)]
    markets: Vec<MarketEntry>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl MarketCatalog {
    pub fn new(markets: Vec<MarketEntry>) -> Self {
        let mut catalog = Self {
            markets,
            index: HashMap::new(),
        };
        catalog.rebuild_index();
        catalog
    }

    /// Load from TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let catalog: Self = toml::from_str(&contents)?;
        Ok(Self::new(catalog.markets))
    }

    /// Load from environment or default path
    pub fn from_env() -> Self {
        let path = std::env::var("MARKET_CATALOG_PATH")
            .unwrap_or_else(|_| "market_catalog.toml".to_string());

        Self::load(&path).unwrap_or_else(|e| {
            tracing::debug!("Using built-in market catalog ({}): {}", path, e);
            Self::default()
        })
    }

    /// Resolve a raw market name to its canonical display form and kind.
    ///
    /// Unrecognized names pass through normalized with kind Other.
    pub fn resolve(&self, raw_name: &str) -> (String, MarketKind) {
        let normalized = normalize_string(raw_name);
        match self.index.get(&lookup_key(&normalized)) {
            Some(&i) => (self.markets[i].canonical.clone(), self.markets[i].kind),
            None => (normalized, MarketKind::Other),
        }
    }

    pub fn entries(&self) -> &[MarketEntry] {
        &self.markets
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, entry) in self.markets.iter().enumerate() {
            self.index.insert(lookup_key(&normalize_string(&entry.canonical)), i);
            for alias in &entry.aliases {
                self.index.insert(lookup_key(&normalize_string(alias)), i);
            }
        }
    }
}

/// Fold hyphens into spaces so "home-win" and "home win" share a key.
/// Display strings keep their hyphens; only the index key folds.
fn lookup_key(normalized: &str) -> String {
    normalize_string(&normalized.replace('-', " "))
}

impl Default for MarketCatalog {
    fn default() -> Self {
        let entry = |canonical: &str, kind: MarketKind, aliases: &[&str]| MarketEntry {
            canonical: canonical.to_string(),
            kind,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        };

        Self::new(vec![
            entry("Home Win", MarketKind::HomeWin, &[]),
            entry("Away Win", MarketKind::AwayWin, &[]),
            entry("Draw", MarketKind::Draw, &[]),
            entry("2-Way", MarketKind::Other, &["2way"]),
            entry("3-Way", MarketKind::Other, &["3way"]),
            entry("Handicap", MarketKind::Other, &[]),
            entry("European", MarketKind::Other, &[]),
            entry("First", MarketKind::Other, &["1st"]),
            entry("Second", MarketKind::Other, &["2nd"]),
        ])
    }
}
