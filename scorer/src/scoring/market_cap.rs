//! Market-cap penalty
//!
//! Many holders against a small market cap points at airdrop or wash
//! inflation. The ratio is bucketed into tiers, highest first:
//!
//! | ratio          | multiplier |
//! |----------------|-----------|
//! | > 2.0          | 0.05 |
//! | > 1.0          | 0.25 |
//! | > 0.5          | 0.50 |
//! | > 0.2          | 0.75 |
//! | otherwise      | 1.00 |

/// Ratio reported when the market cap is missing or not positive; lands
/// in the harshest tier.
pub const MISSING_MARKET_CAP_RATIO: f64 = 999_999_999.0;

/// Holder count divided by market cap
pub fn holder_to_market_cap_ratio(wallet_count: usize, market_cap: Option<f64>) -> f64 {
    match market_cap {
        Some(cap) if cap > 0.0 => wallet_count as f64 / cap,
        _ => MISSING_MARKET_CAP_RATIO,
    }
}

/// Multiplier for the tier `ratio` falls in
pub fn penalty_multiplier(ratio: f64) -> f64 {
    match ratio {
        r if r > 2.0 => 0.05,
        r if r > 1.0 => 0.25,
        r if r > 0.5 => 0.50,
        r if r > 0.2 => 0.75,
        _ => 1.0,
    }
}

pub fn market_adjusted_score(diversity_adjusted_score: f64, ratio: f64) -> f64 {
    diversity_adjusted_score * penalty_multiplier(ratio)
}
