//! Surebet Backend Library
//!
//! Exposes the detection pipeline and its collaborators for use by the
//! binary and tests.

pub mod api;
pub mod arbitrage;
pub mod feed;
pub mod models;
pub mod similarity;

// Re-export the two pipeline entry points at crate root
pub use arbitrage::engine::ArbitrageEngine;
pub use arbitrage::normalizer::Normalizer;
