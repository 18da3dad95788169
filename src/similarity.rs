//! String-similarity matching for near-identical events.
//!
//! Bookmakers spell the same fixture differently; this groups events whose
//! `"{match} {league}"` strings are close enough. Standalone utility, the
//! detection pipeline does not call it.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::Event;

/// Grouping threshold used when callers have no opinion
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

/// A grouped fixture: the first sighting plus its near-duplicates
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMatch {
    pub main_event: Event,
    pub similar_events: Vec<Event>,
}

/// Sorensen-Dice coefficient over character bigrams, whitespace stripped.
///
/// 1.0 for identical strings (including both empty), 0.0 when either
/// stripped input is shorter than two characters or no bigram is shared.
/// Repeated bigrams count as a multiset intersection.
pub fn similarity_score(first: &str, second: &str) -> f64 {
    let first: Vec<char> = first.chars().filter(|c| !c.is_whitespace()).collect();
    let second: Vec<char> = second.chars().filter(|c| !c.is_whitespace()).collect();

    if first == second {
        return 1.0;
    }
    if first.len() < 2 || second.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for w in first.windows(2) {
        *bigrams.entry((w[0], w[1])).or_insert(0) += 1;
    }

    let mut intersection = 0usize;
    for w in second.windows(2) {
        if let Some(count) = bigrams.get_mut(&(w[0], w[1])) {
            if *count > 0 {
                *count -= 1;
                intersection += 1;
            }
        }
    }

    (2.0 * intersection as f64) / ((first.len() + second.len() - 2) as f64)
}

/// Group events whose match + league strings score at or above `threshold`.
///
/// Greedy single pass: each event not yet absorbed into an earlier group
/// opens its own group and pulls in every later unabsorbed event that
/// clears the threshold. Every surviving event yields a group, with or
/// without similar entries.
pub fn find_similar_events(events: &[Event], threshold: f64) -> Vec<EventMatch> {
    let mut matches = Vec::new();
    let mut used = vec![false; events.len()];

    for i in 0..events.len() {
        if used[i] {
            continue;
        }
        used[i] = true;

        let key_i = format!("{} {}", events[i].match_name, events[i].league);
        let mut similar = Vec::new();

        for j in (i + 1)..events.len() {
            if used[j] {
                continue;
            }
            let key_j = format!("{} {}", events[j].match_name, events[j].league);
            if similarity_score(&key_i, &key_j) >= threshold {
                similar.push(events[j].clone());
                used[j] = true;
            }
        }

        matches.push(EventMatch {
            main_event: events[i].clone(),
            similar_events: similar,
        });
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn evt(id: &str, match_name: &str, league: &str) -> Event {
        Event {
            id: id.to_string(),
            sport: "football".to_string(),
            league: league.to_string(),
            match_name: match_name.to_string(),
            datetime: Utc.with_ymd_and_hms(2024, 3, 7, 16, 0, 0).unwrap(),
            bookmakers: vec![],
        }
    }

    #[test]
    fn test_identical_strings_score_one() {
        assert_eq!(similarity_score("manchester city", "manchester city"), 1.0);
        assert_eq!(similarity_score("", ""), 1.0);
        // Whitespace is stripped before comparison.
        assert_eq!(similarity_score("man city", "mancity"), 1.0);
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        assert_eq!(similarity_score("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_short_inputs_score_zero_unless_equal() {
        assert_eq!(similarity_score("a", "ab"), 0.0);
        assert_eq!(similarity_score("a", "b"), 0.0);
        assert_eq!(similarity_score("a", "a"), 1.0);
    }

    #[test]
    fn test_known_dice_value() {
        // healed / sealed share 4 of 10 total bigrams.
        let score = similarity_score("healed", "sealed");
        assert!((score - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_symmetry() {
        let a = "real madrid vs barcelona la liga";
        let b = "real madrid v barcelona la liga";
        assert_eq!(similarity_score(a, b), similarity_score(b, a));
    }

    #[test]
    fn test_grouping_absorbs_near_duplicates() {
        let events = [
            evt("1", "manchester city vs arsenal", "english premier league"),
            evt("2", "manchester city v arsenal", "english premier league"),
            evt("3", "real madrid vs barcelona", "la liga"),
        ];

        let groups = find_similar_events(&events, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0].main_event.id, "1");
        assert_eq!(groups[0].similar_events.len(), 1);
        assert_eq!(groups[0].similar_events[0].id, "2");

        // The absorbed event never opens its own group.
        assert_eq!(groups[1].main_event.id, "3");
        assert!(groups[1].similar_events.is_empty());
    }

    #[test]
    fn test_unrelated_events_stay_singletons() {
        let events = [
            evt("1", "manchester city vs arsenal", "english premier league"),
            evt("2", "real madrid vs barcelona", "la liga"),
        ];

        let groups = find_similar_events(&events, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.similar_events.is_empty()));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let events = [evt("1", "healed", "x"), evt("2", "sealed", "x")];

        // "healed x" vs "sealed x": stripped inputs healedx / sealedx,
        // 5 shared of 12 total bigrams = 10/12.
        let score = similarity_score("healed x", "sealed x");
        let groups = find_similar_events(&events, score);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].similar_events.len(), 1);
    }
}
