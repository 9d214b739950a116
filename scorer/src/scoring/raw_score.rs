//! Raw believer score
//!
//! Holders are grouped by the social identity they resolve to. Every
//! credible account counts once however many wallets route to it, while
//! anonymous wallets count one each.

use std::collections::BTreeMap;

use crate::{holdings::WalletHolding, linkage::SocialLinks};

/// One identity group contributing to the raw score
#[derive(Debug, Clone, PartialEq)]
pub enum IdentityGroup {
    /// Wallets resolving to the same social account
    Linked {
        fid: i64,
        credibility: f64,
        wallets: usize,
    },
    /// Wallets with no resolved account
    Unlinked { wallets: usize },
}

impl IdentityGroup {
    pub fn weight(&self) -> f64 {
        match self {
            IdentityGroup::Linked { credibility, .. } => 1.0 + credibility,
            IdentityGroup::Unlinked { wallets } => *wallets as f64,
        }
    }
}

/// Build identity groups for the given holders. Unlinked wallets each form
/// a singleton group; a wallet resolving to several accounts joins each of
/// their groups.
pub fn identity_groups<'a, I>(holders: I, links: &SocialLinks) -> Vec<IdentityGroup>
where
    I: IntoIterator<Item = &'a WalletHolding>,
{
    let mut linked: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    let mut groups = Vec::new();

    for holder in holders {
        let accounts = links.accounts_for(&holder.wallet);
        if accounts.is_empty() {
            groups.push(IdentityGroup::Unlinked { wallets: 1 });
            continue;
        }

        for account in accounts {
            let entry = linked
                .entry(account.fid)
                .or_insert((account.credibility.unwrap_or(0.0), 0));
            entry.1 += 1;
        }
    }

    groups.extend(
        linked
            .into_iter()
            .map(|(fid, (credibility, wallets))| IdentityGroup::Linked {
                fid,
                credibility,
                wallets,
            }),
    );

    groups
}

/// Sum of group weights
pub fn raw_score(groups: &[IdentityGroup]) -> f64 {
    groups.iter().map(IdentityGroup::weight).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{MemoryGraph, SocialAccount};
    use crate::linkage::resolve_social_accounts;

    fn holder(wallet: &str, balance: f64) -> WalletHolding {
        WalletHolding {
            wallet: wallet.to_string(),
            balance: Some(balance),
        }
    }

    #[test]
    fn test_group_weights() {
        let linked = IdentityGroup::Linked {
            fid: 1,
            credibility: 8.5,
            wallets: 3,
        };
        assert_eq!(linked.weight(), 9.5);
        assert_eq!(IdentityGroup::Unlinked { wallets: 1 }.weight(), 1.0);
        assert_eq!(IdentityGroup::Unlinked { wallets: 4 }.weight(), 4.0);
    }

    #[test]
    fn test_unlinked_holders() {
        let holders = vec![holder("0xa", 100.0), holder("0xb", 100.0)];
        let groups = identity_groups(&holders, &SocialLinks::default());

        assert_eq!(groups.len(), 2);
        assert_eq!(raw_score(&groups), 2.0);
    }

    #[tokio::test]
    async fn test_shared_account_counted_once() {
        let graph = MemoryGraph::new()
            .with_account(SocialAccount {
                fid: 42,
                node_key: "fc:42".to_string(),
                username: None,
                bio: None,
                credibility: Some(2.0),
            })
            .with_link("0xa", "fc:42")
            .with_link("0xb", "fc:42");
        let holders = vec![holder("0xa", 1.0), holder("0xb", 1_000.0), holder("0xc", 5.0)];
        let wallets: Vec<String> = holders.iter().map(|h| h.wallet.clone()).collect();
        let links = resolve_social_accounts(&graph, &wallets, 5).await.unwrap();

        let groups = identity_groups(&holders, &links);

        assert_eq!(
            groups,
            vec![
                IdentityGroup::Unlinked { wallets: 1 },
                IdentityGroup::Linked {
                    fid: 42,
                    credibility: 2.0,
                    wallets: 2
                },
            ]
        );
        // 1 (0xc) + (1 + 2.0) for fid 42
        assert_eq!(raw_score(&groups), 4.0);
    }
}
