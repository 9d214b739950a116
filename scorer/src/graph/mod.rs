//! Graph access layer
//!
//! Read-only primitives over the holding/social graph. The pipeline only
//! ever talks to [`GraphAccess`]; `PgGraph` reads the Postgres tables and
//! `MemoryGraph` serves an in-memory snapshot.

pub mod memory;
pub mod postgres;

use std::future::Future;

use serde::{Deserialize, Serialize};

pub use memory::{GraphSnapshot, MemoryGraph};
pub use postgres::PgGraph;

/// Errors raised by a graph store
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Graph store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid graph snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Failed to read graph snapshot: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Token node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenNode {
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub market_cap: Option<f64>,
}

/// One HOLDS relation between a wallet and a token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRecord {
    pub wallet: String,
    pub token: String,
    #[serde(default)]
    pub balance: Option<f64>,
}

/// Social account sitting on a graph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialAccount {
    pub fid: i64,
    pub node_key: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub credibility: Option<f64>,
}

/// Which holdings to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldingScope<'a> {
    All,
    Token(&'a str),
}

/// Read-only contract the scoring pipeline needs from the graph store.
///
/// Addresses passed in are already lowercase; implementations return
/// lowercase addresses and node keys.
pub trait GraphAccess {
    /// Every token node
    fn tokens(&self) -> impl Future<Output = GraphResult<Vec<TokenNode>>> + Send;

    /// A single token node, `None` when the address matches nothing
    fn token(&self, address: &str) -> impl Future<Output = GraphResult<Option<TokenNode>>> + Send;

    /// Holding records for one token or for every token
    fn holdings(
        &self,
        scope: HoldingScope<'_>,
    ) -> impl Future<Output = GraphResult<Vec<HoldingRecord>>> + Send;

    /// Market cap of a token, `None` when missing
    fn market_cap(&self, address: &str) -> impl Future<Output = GraphResult<Option<f64>>> + Send;

    /// Edges touching any of `nodes`, returned as `(node, neighbor)` pairs
    /// where `node` is one of the inputs. Links are undirected.
    fn neighbors(
        &self,
        nodes: &[String],
    ) -> impl Future<Output = GraphResult<Vec<(String, String)>>> + Send;

    /// Social accounts located on any of `nodes`
    fn social_accounts(
        &self,
        nodes: &[String],
    ) -> impl Future<Output = GraphResult<Vec<SocialAccount>>> + Send;
}

/// Addresses are case-insensitive; the graph stores them lowercase.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Expand stored edges into `(node, neighbor)` pairs seen from `nodes`.
pub(crate) fn orient_edges<'a, I>(nodes: &[String], edges: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let wanted: std::collections::HashSet<&str> = nodes.iter().map(String::as_str).collect();
    let mut pairs = Vec::new();

    for (source, target) in edges {
        if wanted.contains(source) {
            pairs.push((source.to_string(), target.to_string()));
        }
        if wanted.contains(target) {
            pairs.push((target.to_string(), source.to_string()));
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address(" 0xAbCd "), "0xabcd");
    }

    #[test]
    fn test_orient_edges_both_directions() {
        let nodes = vec!["a".to_string(), "c".to_string()];
        let pairs = orient_edges(&nodes, [("a", "b"), ("c", "a"), ("x", "y")]);

        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "b".to_string()),
                ("c".to_string(), "a".to_string()),
                ("a".to_string(), "c".to_string()),
            ]
        );
    }
}
