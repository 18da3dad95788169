//! Deterministic opportunity identifiers.
//!
//! The id is derived from the event and the ordered (home, away) bookmaker
//! roles. Swapping roles is a different opportunity and gets a different
//! id; downstream continuity tracking keys on exact id equality.

/// Build the identifier for an opportunity.
///
/// Format: `{event_id}-{home}-{away}` where the bookmaker part is
/// lowercased and stripped to `[a-z0-9-]`. The event id is carried
/// verbatim.
pub fn opportunity_id(event_id: &str, home_bookmaker: &str, away_bookmaker: &str) -> String {
    let pair: String = format!("{}-{}", home_bookmaker, away_bookmaker)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();

    format!("{}-{}", event_id, pair)
}
