//! Cross-token normalization
//!
//! The batch extremes are only known once every token has its
//! market-adjusted score, so they travel in an explicit [`BatchContext`].

use serde::Serialize;

/// Score reported for every token when the batch has no spread
pub const DEGENERATE_BATCH_SCORE: f64 = 50.0;

/// Min/max of the market-adjusted scores across one batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchContext {
    pub min_score: f64,
    pub max_score: f64,
}

impl BatchContext {
    /// `None` for an empty batch
    pub fn from_scores<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        scores.into_iter().fold(None, |ctx, score| {
            Some(match ctx {
                None => BatchContext {
                    min_score: score,
                    max_score: score,
                },
                Some(ctx) => BatchContext {
                    min_score: ctx.min_score.min(score),
                    max_score: ctx.max_score.max(score),
                },
            })
        })
    }

    pub fn is_degenerate(&self) -> bool {
        self.max_score == self.min_score
    }

    /// Rescale a market-adjusted score into [0, 100]
    pub fn normalize(&self, score: f64) -> f64 {
        if self.is_degenerate() {
            return DEGENERATE_BATCH_SCORE;
        }

        let normalized = 100.0 * (score - self.min_score) / (self.max_score - self.min_score);
        normalized.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch() {
        assert_eq!(BatchContext::from_scores(std::iter::empty()), None);
    }

    #[test]
    fn test_single_token_batch() {
        let ctx = BatchContext::from_scores([3.7]).unwrap();
        assert!(ctx.is_degenerate());
        assert_eq!(ctx.normalize(3.7), 50.0);
    }

    #[test]
    fn test_tied_batch() {
        let ctx = BatchContext::from_scores([2.0, 2.0, 2.0]).unwrap();
        assert_eq!(ctx.normalize(2.0), 50.0);
    }

    #[test]
    fn test_rescale() {
        let ctx = BatchContext::from_scores([1.0, 3.0, 5.0]).unwrap();
        assert_eq!(ctx.min_score, 1.0);
        assert_eq!(ctx.max_score, 5.0);
        assert_eq!(ctx.normalize(1.0), 0.0);
        assert_eq!(ctx.normalize(3.0), 50.0);
        assert_eq!(ctx.normalize(5.0), 100.0);
    }
}
