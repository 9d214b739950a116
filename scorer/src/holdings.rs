//! Holdings aggregation
//!
//! Turns raw HOLDS records into one entry per distinct wallet and the total
//! supply held, for a single token or for every token at once.

use std::collections::BTreeMap;

use crate::graph::{normalize_address, HoldingRecord};

/// A distinct wallet holding a token
#[derive(Debug, Clone, PartialEq)]
pub struct WalletHolding {
    pub wallet: String,
    /// `None` when no record for this wallet carries a balance
    pub balance: Option<f64>,
}

impl WalletHolding {
    /// Balance used for scoring; missing balances count as zero
    pub fn amount(&self) -> f64 {
        self.balance.unwrap_or(0.0)
    }
}

/// All holders of one token
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenHoldings {
    pub token: String,
    /// Ordered by wallet address
    pub wallets: Vec<WalletHolding>,
}

impl TokenHoldings {
    /// Merge records for one token. Duplicate wallet records are summed;
    /// negative balances are clamped to zero.
    pub fn from_records<'a, I>(token: &str, records: I) -> Self
    where
        I: IntoIterator<Item = &'a HoldingRecord>,
    {
        let mut by_wallet: BTreeMap<String, Option<f64>> = BTreeMap::new();

        for record in records {
            let balance = record.balance.map(|b| {
                if b < 0.0 {
                    tracing::debug!(
                        wallet = %record.wallet,
                        balance = b,
                        "Clamping negative balance"
                    );
                }
                b.max(0.0)
            });

            let entry = by_wallet
                .entry(normalize_address(&record.wallet))
                .or_insert(None);
            *entry = match (*entry, balance) {
                (Some(a), Some(b)) => Some(a + b),
                (Some(a), None) => Some(a),
                (None, b) => b,
            };
        }

        Self {
            token: normalize_address(token),
            wallets: by_wallet
                .into_iter()
                .map(|(wallet, balance)| WalletHolding { wallet, balance })
                .collect(),
        }
    }

    /// Group records for many tokens, keyed by token address
    pub fn group_by_token(records: &[HoldingRecord]) -> BTreeMap<String, TokenHoldings> {
        let mut grouped: BTreeMap<String, Vec<&HoldingRecord>> = BTreeMap::new();
        for record in records {
            grouped
                .entry(normalize_address(&record.token))
                .or_default()
                .push(record);
        }

        grouped
            .into_iter()
            .map(|(token, records)| {
                let holdings = TokenHoldings::from_records(&token, records);
                (token, holdings)
            })
            .collect()
    }

    /// Wallets with a recorded balance (zero included); the scoring set
    pub fn counted(&self) -> impl Iterator<Item = &WalletHolding> {
        self.wallets.iter().filter(|w| w.balance.is_some())
    }

    pub fn wallet_count(&self) -> usize {
        self.counted().count()
    }

    pub fn total_balance(&self) -> f64 {
        self.counted().map(WalletHolding::amount).sum()
    }

    pub fn wallet_addresses(&self) -> Vec<String> {
        self.wallets.iter().map(|w| w.wallet.clone()).collect()
    }
}
