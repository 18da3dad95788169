//! Equal-Payout Stake Allocation
//! Mission: Split a fixed total across legs so every outcome pays the same
//! Philosophy: The margin is locked in by the split, not by picking a winner

use crate::arbitrage::error::ComputationError;

/// Round to 2 decimal places, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Split `total_stake` across legs proportionally to implied probability.
///
/// Weight per leg is `1 / odds`; each stake is `total * weight / weight_sum`,
/// rounded to 2 decimals for output. Before rounding every leg pays out
/// exactly `total / weight_sum`, which is the point of the split.
///
/// # Arguments
/// * `odds` - Decimal odds per leg, each expected finite and > 1
/// * `total_stake` - Total amount to distribute
///
/// # Returns
/// Per-leg stakes in input order. Their sum may drift from `total_stake`
/// by up to 0.005 per leg from independent rounding.
pub fn allocate_stakes(odds: &[f64], total_stake: f64) -> Result<Vec<f64>, ComputationError> {
    let weights: Vec<f64> = odds.iter().map(|o| 1.0 / o).collect();
    let weight_sum: f64 = weights.iter().sum();

    // Unreachable with normalized odds; guards hand-built input.
    if !weight_sum.is_finite() || weight_sum <= 0.0 {
        return Err(ComputationError::ZeroWeightSum { weight_sum });
    }

    Ok(weights
        .iter()
        .map(|w| round2(total_stake * w / weight_sum))
        .collect())
}

/// Profit margin of an admitted pair, as a percentage rounded to 2 decimals.
///
/// # Arguments
/// * `implied_probability` - Sum of `1 / odds` over the legs, below 1 for
///   an admitted pair
pub fn profit_percent(implied_probability: f64) -> f64 {
    round2((1.0 - implied_probability) * 100.0)
}
