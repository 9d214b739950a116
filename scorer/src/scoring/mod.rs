//! Believer score calculation
//!
//! Per token: concentration (HHI) -> raw score from identity groups ->
//! diversity adjustment -> market-cap penalty. The batch normalizer runs
//! afterwards over every token at once.

pub mod concentration;
pub mod market_cap;
pub mod normalizer;
pub mod raw_score;

use serde::Serialize;

use crate::{graph::TokenNode, holdings::TokenHoldings, linkage::SocialLinks};

pub use concentration::{concentration_index, diversity_multiplier};
pub use market_cap::{holder_to_market_cap_ratio, penalty_multiplier, MISSING_MARKET_CAP_RATIO};
pub use normalizer::{BatchContext, DEGENERATE_BATCH_SCORE};
pub use raw_score::{identity_groups, raw_score, IdentityGroup};

/// Every per-token figure of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenScore {
    pub token: TokenNode,
    pub total_balance: f64,
    pub wallet_count: usize,
    pub socially_linked_wallet_count: usize,
    /// Percentage of counted wallets with a resolved social account
    pub social_percentage: f64,
    /// `None` when no holder resolves to a credible account
    pub social_credibility_average: Option<f64>,
    pub concentration_index: f64,
    pub raw_score: f64,
    pub diversity_adjusted_score: f64,
    pub holder_to_market_cap_ratio: f64,
    pub market_adjusted_score: f64,
    /// Filled in by the batch normalizer
    pub normalized_score: Option<f64>,
}

/// Believer score calculator
pub struct BelieverScoreCalculator;

impl BelieverScoreCalculator {
    /// Score one token up to the market-cap penalty. Only wallets with a
    /// recorded balance take part.
    pub fn calculate(
        token: TokenNode,
        holdings: &TokenHoldings,
        links: &SocialLinks,
    ) -> TokenScore {
        let wallet_count = holdings.wallet_count();
        let total_balance = holdings.total_balance();

        let concentration_index =
            concentration_index(holdings.counted().map(|w| w.amount()), total_balance);

        let groups = identity_groups(holdings.counted(), links);
        let raw_score = raw_score(&groups);
        let diversity_adjusted_score = raw_score * diversity_multiplier(concentration_index);

        let holder_to_market_cap_ratio = holder_to_market_cap_ratio(wallet_count, token.market_cap);
        let market_adjusted_score =
            market_cap::market_adjusted_score(diversity_adjusted_score, holder_to_market_cap_ratio);

        let counted_wallets: Vec<&str> = holdings.counted().map(|w| w.wallet.as_str()).collect();
        let socially_linked_wallet_count =
            links.linked_wallet_count(counted_wallets.iter().copied());
        let social_percentage = if wallet_count == 0 {
            0.0
        } else {
            socially_linked_wallet_count as f64 * 100.0 / wallet_count as f64
        };

        TokenScore {
            token,
            total_balance,
            wallet_count,
            socially_linked_wallet_count,
            social_percentage,
            social_credibility_average: links.credibility_average(counted_wallets.iter().copied()),
            concentration_index,
            raw_score,
            diversity_adjusted_score,
            holder_to_market_cap_ratio,
            market_adjusted_score,
            normalized_score: None,
        }
    }

    /// Normalize a full batch and order it by believer score, highest first.
    /// Ties keep a stable address order.
    pub fn normalize_batch(mut scores: Vec<TokenScore>) -> (Vec<TokenScore>, Option<BatchContext>) {
        let context = BatchContext::from_scores(scores.iter().map(|s| s.market_adjusted_score));

        if let Some(ctx) = context {
            for score in &mut scores {
                score.normalized_score = Some(ctx.normalize(score.market_adjusted_score));
            }
        }

        scores.sort_by(|a, b| {
            let a_score = a.normalized_score.unwrap_or(0.0);
            let b_score = b.normalized_score.unwrap_or(0.0);
            b_score
                .total_cmp(&a_score)
                .then_with(|| a.token.address.cmp(&b.token.address))
        });

        (scores, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::HoldingRecord;

    fn token(address: &str, market_cap: Option<f64>) -> TokenNode {
        TokenNode {
            address: address.to_string(),
            name: None,
            symbol: None,
            market_cap,
        }
    }

    fn holdings(token: &str, balances: &[f64]) -> TokenHoldings {
        let records: Vec<HoldingRecord> = balances
            .iter()
            .enumerate()
            .map(|(i, b)| HoldingRecord {
                wallet: format!("0xw{i}"),
                token: token.to_string(),
                balance: Some(*b),
            })
            .collect();
        TokenHoldings::from_records(token, &records)
    }

    #[test]
    fn test_two_equal_unlinked_holders() {
        let score = BelieverScoreCalculator::calculate(
            token("0xt", Some(1_000_000.0)),
            &holdings("0xt", &[100.0, 100.0]),
            &SocialLinks::default(),
        );

        assert_eq!(score.total_balance, 200.0);
        assert_eq!(score.wallet_count, 2);
        assert!((score.concentration_index - 0.5).abs() < 1e-12);
        assert_eq!(score.raw_score, 2.0);
        assert!((score.diversity_adjusted_score - 1.0).abs() < 1e-12);
        assert!((score.holder_to_market_cap_ratio - 0.000002).abs() < 1e-15);
        assert!((score.market_adjusted_score - 1.0).abs() < 1e-12);
        assert_eq!(score.socially_linked_wallet_count, 0);
        assert_eq!(score.social_percentage, 0.0);
        assert_eq!(score.social_credibility_average, None);
    }

    #[test]
    fn test_zero_market_cap_uses_harshest_tier() {
        let score = BelieverScoreCalculator::calculate(
            token("0xt", Some(0.0)),
            &holdings("0xt", &[100.0, 100.0]),
            &SocialLinks::default(),
        );

        assert_eq!(score.holder_to_market_cap_ratio, MISSING_MARKET_CAP_RATIO);
        assert!((score.market_adjusted_score - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_concentration_lowers_diversity_score() {
        let links = SocialLinks::default();
        let even = BelieverScoreCalculator::calculate(
            token("0xt", Some(1e9)),
            &holdings("0xt", &[50.0, 50.0]),
            &links,
        );
        let skewed = BelieverScoreCalculator::calculate(
            token("0xt", Some(1e9)),
            &holdings("0xt", &[90.0, 10.0]),
            &links,
        );

        assert_eq!(even.raw_score, skewed.raw_score);
        assert!(skewed.concentration_index > even.concentration_index);
        assert!(skewed.diversity_adjusted_score < even.diversity_adjusted_score);
    }

    #[test]
    fn test_normalize_batch_orders_descending() {
        let links = SocialLinks::default();
        let scores = vec![
            BelieverScoreCalculator::calculate(
                token("0xa", Some(1e9)),
                &holdings("0xa", &[1.0, 1.0]),
                &links,
            ),
            BelieverScoreCalculator::calculate(
                token("0xb", Some(1e9)),
                &holdings("0xb", &[1.0, 1.0, 1.0, 1.0]),
                &links,
            ),
            BelieverScoreCalculator::calculate(
                token("0xc", Some(1e9)),
                &holdings("0xc", &[1.0]),
                &links,
            ),
        ];

        let (ranked, ctx) = BelieverScoreCalculator::normalize_batch(scores);
        let ctx = ctx.unwrap();

        // 0xb: 4 * 0.75 = 3, 0xa: 2 * 0.5 = 1, 0xc: 1 * 0 = 0
        assert_eq!(ctx.max_score, 3.0);
        assert_eq!(ctx.min_score, 0.0);
        let order: Vec<&str> = ranked.iter().map(|s| s.token.address.as_str()).collect();
        assert_eq!(order, vec!["0xb", "0xa", "0xc"]);
        assert_eq!(ranked[0].normalized_score, Some(100.0));
        assert_eq!(ranked[2].normalized_score, Some(0.0));
        for score in &ranked {
            let value = score.normalized_score.unwrap();
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_normalize_single_token() {
        let score = BelieverScoreCalculator::calculate(
            token("0xa", Some(10.0)),
            &holdings("0xa", &[3.0, 9.0]),
            &SocialLinks::default(),
        );
        let (ranked, _) = BelieverScoreCalculator::normalize_batch(vec![score]);
        assert_eq!(ranked[0].normalized_score, Some(DEGENERATE_BATCH_SCORE));
    }
}
