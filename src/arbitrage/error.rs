//! Typed failures for the detection pipeline
//!
//! Both errors abort the whole tick. Normalization never emits a partial
//! batch and the engine never emits a partial snapshot; the caller decides
//! whether to log and skip (refresh loop) or surface a 500 (HTTP).

use thiserror::Error;

/// A raw record failed validation during normalization.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MalformedRecordError {
    #[error("event record is missing a usable `{field}`")]
    MissingField { field: &'static str },

    #[error("event `{event_id}` is missing a usable `{field}`")]
    EmptyField {
        event_id: String,
        field: &'static str,
    },

    #[error("event `{event_id}`: bookmaker `{bookmaker}` quotes invalid odds {odds} for market `{market}`")]
    InvalidOdds {
        event_id: String,
        bookmaker: String,
        market: String,
        odds: f64,
    },

    #[error("event `{event_id}`: unparseable datetime `{value}`")]
    InvalidDatetime { event_id: String, value: String },
}

/// An invariant violation inside pairing or stake allocation.
///
/// Normalized input makes these unreachable; they guard against callers
/// that construct events by hand.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ComputationError {
    #[error("event `{event_id}`: degenerate odds {odds} reached the pair finder")]
    DegenerateOdds { event_id: String, odds: f64 },

    #[error("stake weights sum to {weight_sum}, cannot allocate")]
    ZeroWeightSum { weight_sum: f64 },
}
