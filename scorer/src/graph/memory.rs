//! In-memory graph snapshot

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use super::{
    normalize_address, orient_edges, GraphAccess, GraphResult, HoldingRecord, HoldingScope,
    SocialAccount, TokenNode,
};

/// Serializable dump of the whole graph, as read by `scorer --snapshot`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub tokens: Vec<TokenNode>,
    #[serde(default)]
    pub holdings: Vec<HoldingRecord>,
    #[serde(default)]
    pub accounts: Vec<SocialAccount>,
    /// Undirected ACCOUNT edges as `[source, target]`
    #[serde(default)]
    pub links: Vec<(String, String)>,
}

/// Graph store backed by a [`GraphSnapshot`]
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    tokens: BTreeMap<String, TokenNode>,
    holdings: Vec<HoldingRecord>,
    accounts: BTreeMap<String, SocialAccount>,
    links: Vec<(String, String)>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON snapshot from disk
    pub fn from_json_file(path: impl AsRef<Path>) -> GraphResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let snapshot: GraphSnapshot = serde_json::from_str(&raw)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let mut graph = Self::new();
        for token in snapshot.tokens {
            graph = graph.with_token(token);
        }
        for holding in snapshot.holdings {
            graph = graph.with_holding(&holding.wallet, &holding.token, holding.balance);
        }
        for account in snapshot.accounts {
            graph = graph.with_account(account);
        }
        for (source, target) in snapshot.links {
            graph = graph.with_link(&source, &target);
        }
        graph
    }

    pub fn with_token(mut self, mut token: TokenNode) -> Self {
        token.address = normalize_address(&token.address);
        self.tokens.insert(token.address.clone(), token);
        self
    }

    pub fn with_holding(mut self, wallet: &str, token: &str, balance: Option<f64>) -> Self {
        self.holdings.push(HoldingRecord {
            wallet: normalize_address(wallet),
            token: normalize_address(token),
            balance,
        });
        self
    }

    pub fn with_account(mut self, mut account: SocialAccount) -> Self {
        account.node_key = normalize_address(&account.node_key);
        self.accounts.insert(account.node_key.clone(), account);
        self
    }

    pub fn with_link(mut self, source: &str, target: &str) -> Self {
        self.links
            .push((normalize_address(source), normalize_address(target)));
        self
    }
}

impl GraphAccess for MemoryGraph {
    async fn tokens(&self) -> GraphResult<Vec<TokenNode>> {
        Ok(self.tokens.values().cloned().collect())
    }

    async fn token(&self, address: &str) -> GraphResult<Option<TokenNode>> {
        Ok(self.tokens.get(&normalize_address(address)).cloned())
    }

    async fn holdings(&self, scope: HoldingScope<'_>) -> GraphResult<Vec<HoldingRecord>> {
        let records = match scope {
            HoldingScope::All => self.holdings.clone(),
            HoldingScope::Token(address) => {
                let address = normalize_address(address);
                self.holdings
                    .iter()
                    .filter(|h| h.token == address)
                    .cloned()
                    .collect()
            }
        };
        Ok(records)
    }

    async fn market_cap(&self, address: &str) -> GraphResult<Option<f64>> {
        Ok(self
            .tokens
            .get(&normalize_address(address))
            .and_then(|t| t.market_cap))
    }

    async fn neighbors(&self, nodes: &[String]) -> GraphResult<Vec<(String, String)>> {
        Ok(orient_edges(
            nodes,
            self.links.iter().map(|(s, t)| (s.as_str(), t.as_str())),
        ))
    }

    async fn social_accounts(&self, nodes: &[String]) -> GraphResult<Vec<SocialAccount>> {
        Ok(nodes
            .iter()
            .filter_map(|node| self.accounts.get(node))
            .cloned()
            .collect())
    }
}
