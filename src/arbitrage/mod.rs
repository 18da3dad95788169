//! Arbitrage Detection Module
//! Mission: Turn raw cross-bookmaker odds into priced, identified opportunities
//! Philosophy: Pure functions at the core, side effects at the edges

pub mod catalog;
pub mod engine;
pub mod error;
pub mod identity;
pub mod normalizer;
pub mod stakes;
