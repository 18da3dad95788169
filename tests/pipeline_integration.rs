//! Integration tests for the odds-to-opportunities pipeline
//!
//! These tests push the development fixtures through the real
//! normalization and detection path, check the numeric guarantees the
//! pipeline makes, and pin the wire shape pushed to WebSocket clients.

use surebet_backend::feed::{OddsFeed, SimulatedOddsFeed};
use surebet_backend::models::{
    Event, Opportunity, RawBookmakerQuote, RawEvent, RawMarketQuote, WsServerEvent,
};
use surebet_backend::{ArbitrageEngine, Normalizer};

/// The two development fixtures with their base (unjittered) odds
fn fixture_raw_events() -> Vec<RawEvent> {
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

fn run_pipeline(raw: &[RawEvent]) -> Vec<Opportunity> {
    let events: Vec<Event> = Normalizer::default().normalize(raw).unwrap();
    ArbitrageEngine::default()
        .compute_opportunities(&events)
        .unwrap()
}

fn assert_snapshot_invariants(opportunities: &[Opportunity]) {
    for opp in opportunities {
        assert!(opp.profit_percent > 0.0, "profit must be positive: {:?}", opp.id);
        assert_eq!(opp.bets.len(), 2);
        assert_ne!(
            opp.bets[0].bookmaker, opp.bets[1].bookmaker,
            "legs must use distinct bookmakers"
        );

        let stake_sum: f64 = opp.bets.iter().map(|b| b.stake).sum();
        assert!(
            (stake_sum - opp.total_stake).abs() <= 2.0 * 0.01,
            "stake sum {} too far from {}",
            stake_sum,
            opp.total_stake
        );

        let payout_home = opp.bets[0].stake * opp.bets[0].odds;
        let payout_away = opp.bets[1].stake * opp.bets[1].odds;
        assert!(
            (payout_home - payout_away).abs() < 0.05,
            "payouts must be equal within rounding: {} vs {}",
            payout_home,
            payout_away
        );
    }
}

#[test]
fn test_fixture_snapshot_end_to_end() {
    let opps = run_pipeline(&fixture_raw_events());

    assert_eq!(opps.len(), 2);
    assert_snapshot_invariants(&opps);

    let first = &opps[0];
    assert_eq!(first.id, "1-bet365-williamhill");
    assert_eq!(first.match_name, "manchester city vs arsenal");
    assert_eq!(first.league, "english premier league");
    assert_eq!(first.profit_percent, 24.91);
    assert_eq!(first.total_stake, 100.0);
    assert_eq!(first.bets[0].bookmaker, "bet365");
    assert_eq!(first.bets[0].market, "Home Win");
    assert_eq!(first.bets[0].odds, 1.95);
    assert_eq!(first.bets[0].stake, 68.29);
    assert_eq!(first.bets[1].bookmaker, "william hill");
    assert_eq!(first.bets[1].stake, 31.71);

    let second = &opps[1];
    assert_eq!(second.id, "2-betfair-unibet");
    assert_eq!(second.league, "la liga");
    assert_eq!(second.profit_percent, 26.07);
    assert_eq!(second.bets[0].stake, 64.41);
    assert_eq!(second.bets[1].stake, 35.59);
}

#[test]
fn test_opportunity_ids_stable_across_recomputation() {
    let raw = fixture_raw_events();

    let first_run: Vec<String> = run_pipeline(&raw).into_iter().map(|o| o.id).collect();
    let second_run: Vec<String> = run_pipeline(&raw).into_iter().map(|o| o.id).collect();

    assert_eq!(first_run, second_run);
    assert_eq!(first_run, vec!["1-bet365-williamhill", "2-betfair-unibet"]);
}

#[test]
fn test_overround_fixture_produces_nothing() {
    let mut raw = fixture_raw_events();
    raw[0].bookmakers[0].markets[0].odds = 1.5;
    raw[0].bookmakers[1].markets[0].odds = 1.5;
    raw.truncate(1);

    assert!(run_pipeline(&raw).is_empty());
}

#[test]
fn test_malformed_record_fails_whole_batch() {
    let mut raw = fixture_raw_events();
    raw[1].bookmakers[0].markets[0].odds = 0.5;

    let result = Normalizer::default().normalize(&raw);
    assert!(result.is_err(), "one bad record must fail the whole batch");
}

#[tokio::test]
async fn test_simulated_feed_snapshots_keep_invariants() {
    let feed = SimulatedOddsFeed::seeded(123);
    let normalizer = Normalizer::default();
    let engine = ArbitrageEngine::default();

    // The jitter band keeps both fixtures comfortably inside arbitrage
    // territory, so every snapshot must yield both opportunities.
    for _ in 0..20 {
        let raw = feed.fetch_events().await.unwrap();
        let events = normalizer.normalize(&raw).unwrap();
        let opps = engine.compute_opportunities(&events).unwrap();

        assert_eq!(opps.len(), 2);
        assert_snapshot_invariants(&opps);
        assert_eq!(opps[0].bets[0].market, "Home Win");
        assert_eq!(opps[0].bets[1].market, "Away Win");
    }
}

#[tokio::test]
async fn test_seeded_feed_reproducible_through_pipeline() {
    let normalizer = Normalizer::default();
    let engine = ArbitrageEngine::default();

    let run = |raw: Vec<RawEvent>| {
        let events = normalizer.normalize(&raw).unwrap();
        engine.compute_opportunities(&events).unwrap()
    };

    let a = run(SimulatedOddsFeed::seeded(7).fetch_events().await.unwrap());
    let b = run(SimulatedOddsFeed::seeded(7).fetch_events().await.unwrap());

    assert_eq!(
        serde_json::to_value(&a).unwrap(),
        serde_json::to_value(&b).unwrap()
    );
}

#[test]
fn test_ws_event_wire_shape() {
    let opps = run_pipeline(&fixture_raw_events());
    let event = WsServerEvent::Opportunities(opps);

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["type"], "opportunities");

    let data = value["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);

    let first = &data[0];
    assert_eq!(first["id"], "1-bet365-williamhill");
    assert_eq!(first["match"], "manchester city vs arsenal");
    assert_eq!(first["profitPercent"], 24.91);
    assert_eq!(first["totalStake"], 100.0);
    assert_eq!(first["datetime"], "2024-03-07T16:00:00Z");
    assert_eq!(first["bets"][0]["bookmaker"], "bet365");
    assert_eq!(first["bets"][0]["stake"], 68.29);

    let error = WsServerEvent::Error {
        message: "Failed to compute opportunities".to_string(),
    };
    let value = serde_json::to_value(&error).unwrap();
    assert_eq!(value["type"], "error");
    assert_eq!(value["data"]["message"], "Failed to compute opportunities");
}
