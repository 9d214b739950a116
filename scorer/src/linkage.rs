//! Social linkage resolution
//!
//! Bounded breadth-first search from a set of wallets over the undirected
//! ACCOUNT edges. All wallets are expanded together, one neighbour query per
//! level, while every node remembers which origin wallets reached it. Social
//! accounts found on reached nodes are kept if they carry a credibility
//! score.

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::{GraphAccess, GraphResult, SocialAccount};

/// Resolved accounts per wallet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocialLinks {
    by_wallet: BTreeMap<String, Vec<SocialAccount>>,
}

impl SocialLinks {
    /// Accounts reachable from `wallet`, ordered by fid
    pub fn accounts_for(&self, wallet: &str) -> &[SocialAccount] {
        self.by_wallet
            .get(wallet)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_linked(&self, wallet: &str) -> bool {
        !self.accounts_for(wallet).is_empty()
    }

    /// Distinct wallets among `wallets` with at least one resolved account
    pub fn linked_wallet_count<'a, I>(&self, wallets: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        wallets
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|w| self.is_linked(w))
            .count()
    }

    /// Mean credibility over the distinct accounts resolved from `wallets`
    pub fn credibility_average<'a, I>(&self, wallets: I) -> Option<f64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen: BTreeMap<i64, f64> = BTreeMap::new();
        for wallet in wallets {
            for account in self.accounts_for(wallet) {
                if let Some(credibility) = account.credibility {
                    seen.insert(account.fid, credibility);
                }
            }
        }

        if seen.is_empty() {
            return None;
        }
        Some(seen.values().sum::<f64>() / seen.len() as f64)
    }
}

/// Resolve each wallet to the credible social accounts within `max_hops`.
pub async fn resolve_social_accounts<G>(
    graph: &G,
    wallets: &[String],
    max_hops: usize,
) -> GraphResult<SocialLinks>
where
    G: GraphAccess,
{
    // node -> origin wallets that reached it through at least one edge
    let mut reached: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
    // node -> origins already expanded from it (seeds included)
    let mut expanded: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
    let mut frontier: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();

    for (origin, wallet) in wallets.iter().enumerate() {
        frontier.entry(wallet.clone()).or_default().insert(origin);
        expanded.entry(wallet.clone()).or_default().insert(origin);
    }

    for hop in 1..=max_hops {
        if frontier.is_empty() {
            break;
        }

        let nodes: Vec<String> = frontier.keys().cloned().collect();
        let edges = graph.neighbors(&nodes).await?;

        let mut next: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
        for (node, neighbor) in edges {
            let Some(origins) = frontier.get(&node) else {
                continue;
            };

            reached
                .entry(neighbor.clone())
                .or_default()
                .extend(origins.iter().copied());

            let seen = expanded.entry(neighbor.clone()).or_default();
            let fresh: Vec<usize> = origins.difference(seen).copied().collect();
            if !fresh.is_empty() {
                seen.extend(fresh.iter().copied());
                next.entry(neighbor).or_default().extend(fresh);
            }
        }

        tracing::trace!(hop, frontier = nodes.len(), next = next.len(), "Linkage hop");
        frontier = next;
    }

    let candidates: Vec<String> = reached.keys().cloned().collect();
    let accounts = if candidates.is_empty() {
        Vec::new()
    } else {
        graph.social_accounts(&candidates).await?
    };

    let mut by_wallet: BTreeMap<String, BTreeMap<i64, SocialAccount>> = BTreeMap::new();
    for account in accounts.into_iter().filter(|a| a.credibility.is_some()) {
        let Some(origins) = reached.get(&account.node_key) else {
            continue;
        };
        for &origin in origins {
            by_wallet
                .entry(wallets[origin].clone())
                .or_default()
                .insert(account.fid, account.clone());
        }
    }

    Ok(SocialLinks {
        by_wallet: by_wallet
            .into_iter()
            .map(|(wallet, accounts)| (wallet, accounts.into_values().collect()))
            .collect(),
    })
}
