//! Holder concentration (Herfindahl-Hirschman index over balance shares)

/// Sum of squared balance shares, in [0, 1].
///
/// An empty or all-zero distribution has nothing to concentrate and
/// scores 0.
pub fn concentration_index<I>(balances: I, total_balance: f64) -> f64
where
    I: IntoIterator<Item = f64>,
{
    if total_balance <= 0.0 {
        return 0.0;
    }

    let index: f64 = balances
        .into_iter()
        .map(|balance| {
            let fraction = balance / total_balance;
            fraction * fraction
        })
        .sum();

    index.clamp(0.0, 1.0)
}

/// `1 - HHI`: near 1 for many similar holders, near 0 for a single whale
pub fn diversity_multiplier(concentration_index: f64) -> f64 {
    1.0 - concentration_index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_distribution() {
        let index = concentration_index([25.0, 25.0, 25.0, 25.0], 100.0);
        assert!((index - 0.25).abs() < 1e-12);
        assert!((diversity_multiplier(index) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_single_holder() {
        assert_eq!(concentration_index([500.0], 500.0), 1.0);
        assert_eq!(diversity_multiplier(1.0), 0.0);
    }

    #[test]
    fn test_zero_supply() {
        assert_eq!(concentration_index([0.0, 0.0], 0.0), 0.0);
        assert_eq!(concentration_index(std::iter::empty(), 0.0), 0.0);
    }

    #[test]
    fn test_whale_concentrates() {
        let even = concentration_index([50.0, 50.0], 100.0);
        let whale = concentration_index([90.0, 10.0], 100.0);
        assert!(whale > even);
        assert!((whale - 0.82).abs() < 1e-12);
    }
}
