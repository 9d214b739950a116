//! Believer extraction for a single token
//!
//! Wallet-level listing: one row per (holding wallet, credible account)
//! pair, so a person reached from two wallets shows up twice with each
//! wallet's balance.

use serde::Serialize;

use crate::{holdings::TokenHoldings, linkage::SocialLinks};

/// A socially-linked holding of the token
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BelieverRecord {
    pub fid: i64,
    pub username: String,
    pub bio: String,
    #[serde(rename = "fcred")]
    pub credibility: f64,
    pub balance: f64,
}

/// Build the believer list, highest credibility first
pub fn extract_believers(holdings: &TokenHoldings, links: &SocialLinks) -> Vec<BelieverRecord> {
    let mut believers: Vec<BelieverRecord> = holdings
        .wallets
        .iter()
        .flat_map(|holding| {
            links
                .accounts_for(&holding.wallet)
                .iter()
                .filter_map(move |account| {
                    Some(BelieverRecord {
                        fid: account.fid,
                        username: account.username.clone().unwrap_or_default(),
                        bio: account.bio.clone().unwrap_or_default(),
                        credibility: account.credibility?,
                        balance: holding.amount(),
                    })
                })
        })
        .collect();

    believers.sort_by(|a, b| {
        b.credibility
            .total_cmp(&a.credibility)
            .then_with(|| a.fid.cmp(&b.fid))
            .then_with(|| b.balance.total_cmp(&a.balance))
    });

    believers
}
