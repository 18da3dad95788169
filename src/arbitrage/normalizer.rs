//! Raw Record Normalization
//! Mission: Turn untrusted feed records into a stable canonical shape
//! Philosophy: Reject loudly at the boundary so the engine never second-guesses its input

use chrono::{DateTime, Utc};

use crate::arbitrage::catalog::MarketCatalog;
use crate::arbitrage::error::MalformedRecordError;
use crate::models::{BookmakerQuote, Event, MarketQuote, RawEvent};

/// Canonicalize a free-text field.
///
/// Trims, lowercases, strips everything outside ASCII word characters,
/// whitespace and hyphens, and collapses whitespace runs to a single
/// space. The result never carries leading or trailing whitespace, which
/// makes the function idempotent.
///
/// # Arguments
/// * `input` - Raw text from a feed record
///
/// # Returns
/// The canonical form, possibly empty
pub fn normalize_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;

    for c in input.trim().to_lowercase().chars() {
        if c.is_whitespace() {
            pending_space = true;
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
        // Anything else is dropped without breaking a word run.
    }

    out
}

/// Normalizes raw feed batches into engine-ready events.
///
/// Fail-fast: the first invalid record aborts the whole batch, no partial
/// output. Pure, no logging.
pub struct Normalizer {
    catalog: MarketCatalog,
}

impl Normalizer {
    pub fn new(catalog: MarketCatalog) -> Self {
        Self { catalog }
    }

    /// Normalize a batch of raw events, preserving input order 1:1.
    ///
    /// Text fields go through [`normalize_string`]; market names are
    /// additionally resolved against the catalog; odds must be finite and
    /// above 1; datetimes must parse as RFC 3339.
    pub fn normalize(&self, raw: &[RawEvent]) -> Result<Vec<Event>, MalformedRecordError> {
        raw.iter().map(|event| self.normalize_event(event)).collect()
    }

    fn normalize_event(&self, raw: &RawEvent) -> Result<Event, MalformedRecordError> {
        // The external id is carried verbatim; it only has to exist.
        let id = raw.id.trim();
        if id.is_empty() {
            return Err(MalformedRecordError::MissingField { field: "id" });
        }
        let id = id.to_string();

        let match_name = normalize_string(&raw.match_name);
        if match_name.is_empty() {
            return Err(MalformedRecordError::EmptyField {
                event_id: id,
                field: "match",
            });
        }

        let datetime = DateTime::parse_from_rfc3339(raw.datetime.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| MalformedRecordError::InvalidDatetime {
                event_id: id.clone(),
                value: raw.datetime.clone(),
            })?;

        let mut bookmakers = Vec::with_capacity(raw.bookmakers.len());
        for bookmaker in &raw.bookmakers {
            let name = normalize_string(&bookmaker.name);
            if name.is_empty() {
                return Err(MalformedRecordError::EmptyField {
                    event_id: id,
                    field: "bookmaker name",
                });
            }

            let mut markets = Vec::with_capacity(bookmaker.markets.len());
            for market in &bookmaker.markets {
                if !market.odds.is_finite() || market.odds <= 1.0 {
                    return Err(MalformedRecordError::InvalidOdds {
                        event_id: id,
                        bookmaker: name,
                        market: market.name.clone(),
                        odds: market.odds,
                    });
                }

                let (canonical, kind) = self.catalog.resolve(&market.name);
                markets.push(MarketQuote {
                    name: canonical,
                    kind,
                    odds: market.odds,
                });
            }

            bookmakers.push(BookmakerQuote { name, markets });
        }

        Ok(Event {
            id,
            sport: normalize_string(&raw.sport),
            league: normalize_string(&raw.league),
            match_name,
            datetime,
            bookmakers,
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(MarketCatalog::default())
    }
}
