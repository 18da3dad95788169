//! Arbitrage Detection Engine
//! Mission: Find cross-bookmaker two-way mismatches and price the split
//! Philosophy: Every tick is a pure function of its input snapshot

use crate::arbitrage::error::ComputationError;
use crate::arbitrage::identity::opportunity_id;
use crate::arbitrage::stakes::{allocate_stakes, profit_percent};
use crate::models::{BetInstruction, Event, MarketKind, MarketQuote, Opportunity};

/// Default total stake split across the legs of one opportunity
pub const DEFAULT_TOTAL_STAKE: f64 = 100.0;

/// One side of a candidate pair: a bookmaker quoting a two-way outcome
#[derive(Debug, Clone, Copy)]
pub struct CandidateQuote<'a> {
    pub bookmaker: &'a str,
    pub quote: &'a MarketQuote,
}

/// An admissible cross-bookmaker pair and its summed implied probability
#[derive(Debug, Clone, Copy)]
pub struct QuotePair<'a> {
    pub home: CandidateQuote<'a>,
    pub away: CandidateQuote<'a>,
    pub implied_probability: f64,
}

/// Arbitrage detection engine.
///
/// Stateless between ticks; holds only the configured total stake. Does
/// no I/O and no logging, so concurrent ticks over independent snapshots
/// need no coordination.
pub struct ArbitrageEngine {
    total_stake: f64,
}

impl ArbitrageEngine {
    pub fn new(total_stake: f64) -> Self {
        Self { total_stake }
    }

    /// Enumerate admissible (home, away) pairs for one event.
    ///
    /// Candidates partition by market kind in source order. A pair is
    /// admitted iff the two bookmakers differ and the summed implied
    /// probability `1/h + 1/a` is strictly below 1. Identical odds from
    /// distinct bookmakers stay distinct pairs.
    pub fn find_pairs<'a>(
        &self,
        event: &'a Event,
    ) -> Result<Vec<QuotePair<'a>>, ComputationError> {
        let mut home_candidates = Vec::new();
        let mut away_candidates = Vec::new();

        for bookmaker in &event.bookmakers {
            for quote in &bookmaker.markets {
                match quote.kind {
                    MarketKind::HomeWin | MarketKind::AwayWin => {
                        if !quote.odds.is_finite() || quote.odds <= 1.0 {
                            return Err(ComputationError::DegenerateOdds {
                                event_id: event.id.clone(),
                                odds: quote.odds,
                            });
                        }
                        let candidate = CandidateQuote {
                            bookmaker: &bookmaker.name,
                            quote,
                        };
                        if quote.kind == MarketKind::HomeWin {
                            home_candidates.push(candidate);
                        } else {
                            away_candidates.push(candidate);
                        }
                    }
                    // Draws and uncategorized markets never pair.
                    MarketKind::Draw | MarketKind::Other => {}
                }
            }
        }

        let mut pairs = Vec::new();
        for home in &home_candidates {
            for away in &away_candidates {
                if home.bookmaker == away.bookmaker {
                    continue;
                }

                let implied = 1.0 / home.quote.odds + 1.0 / away.quote.odds;
                // Equality is a fair book, not an opportunity.
                if implied < 1.0 {
                    pairs.push(QuotePair {
                        home: *home,
                        away: *away,
                        implied_probability: implied,
                    });
                }
            }
        }

        Ok(pairs)
    }

    /// Compute the full opportunity snapshot for one tick.
    ///
    /// Output order is deterministic: events in input order, pairs within
    /// an event in home x away enumeration order, the home leg first in
    /// every bet list. Any failure aborts the whole tick; there is no
    /// partial snapshot.
    pub fn compute_opportunities(
        &self,
        events: &[Event],
    ) -> Result<Vec<Opportunity>, ComputationError> {
        let mut opportunities = Vec::new();

        for event in events {
            for pair in self.find_pairs(event)? {
                let stakes = allocate_stakes(
                    &[pair.home.quote.odds, pair.away.quote.odds],
                    self.total_stake,
                )?;

                opportunities.push(Opportunity {
                    id: opportunity_id(&event.id, pair.home.bookmaker, pair.away.bookmaker),
                    match_name: event.match_name.clone(),
                    league: event.league.clone(),
                    datetime: event.datetime,
                    profit_percent: profit_percent(pair.implied_probability),
                    total_stake: self.total_stake,
                    bets: vec![
                        BetInstruction {
                            bookmaker: pair.home.bookmaker.to_string(),
                            market: pair.home.quote.name.clone(),
                            odds: pair.home.quote.odds,
                            stake: stakes[0],
                        },
                        BetInstruction {
                            bookmaker: pair.away.bookmaker.to_string(),
                            market: pair.away.quote.name.clone(),
                            odds: pair.away.quote.odds,
                            stake: stakes[1],
                        },
                    ],
                });
            }
        }

        Ok(opportunities)
    }
}

impl Default for ArbitrageEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TOTAL_STAKE)
    }
}
