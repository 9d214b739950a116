//! Postgres-backed graph store

use std::time::Instant;

use believer_db::{
    numeric_to_f64, AccountLink, SocialAccount as SocialAccountRow, Token, TokenHolder,
};
use sqlx::{Pool, Postgres};

use super::{
    orient_edges, GraphAccess, GraphResult, HoldingRecord, HoldingScope, SocialAccount, TokenNode,
};

/// Reads the holding graph out of the `believer-db` tables
#[derive(Clone)]
pub struct PgGraph {
    db_pool: Pool<Postgres>,
}

impl PgGraph {
    pub fn new(db_pool: Pool<Postgres>) -> Self {
        Self { db_pool }
    }

    pub async fn health_check(&self) -> GraphResult<()> {
        sqlx::query("SELECT 1").execute(&self.db_pool).await?;
        Ok(())
    }
}

impl From<Token> for TokenNode {
    fn from(t: Token) -> Self {
        Self {
            address: t.address.to_lowercase(),
            name: t.name,
            symbol: t.symbol,
            market_cap: t.market_cap.as_ref().map(numeric_to_f64),
        }
    }
}

impl From<TokenHolder> for HoldingRecord {
    fn from(h: TokenHolder) -> Self {
        Self {
            wallet: h.wallet_address.to_lowercase(),
            token: h.token_address.to_lowercase(),
            balance: h.balance.as_ref().map(numeric_to_f64),
        }
    }
}

impl From<SocialAccountRow> for SocialAccount {
    fn from(a: SocialAccountRow) -> Self {
        Self {
            fid: a.fid,
            node_key: a.node_key.to_lowercase(),
            username: a.username,
            bio: a.bio,
            credibility: a.fc_cred_score,
        }
    }
}

impl GraphAccess for PgGraph {
    async fn tokens(&self) -> GraphResult<Vec<TokenNode>> {
        let tokens = Token::find_all(&self.db_pool).await?;
        Ok(tokens.into_iter().map(Into::into).collect())
    }

    async fn token(&self, address: &str) -> GraphResult<Option<TokenNode>> {
        let token = Token::find_by_address(address, &self.db_pool).await?;
        Ok(token.map(Into::into))
    }

    async fn holdings(&self, scope: HoldingScope<'_>) -> GraphResult<Vec<HoldingRecord>> {
        let start = Instant::now();
        let rows = match scope {
            HoldingScope::All => TokenHolder::find_all(&self.db_pool).await?,
            HoldingScope::Token(address) => {
                TokenHolder::find_by_token(address, &self.db_pool).await?
            }
        };

        tracing::debug!(
            scope = ?scope,
            row_count = rows.len(),
            duration_ms = %start.elapsed().as_millis(),
            "Loaded holdings"
        );

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn market_cap(&self, address: &str) -> GraphResult<Option<f64>> {
        let cap = Token::find_market_cap(address, &self.db_pool).await?;
        Ok(cap.as_ref().map(numeric_to_f64))
    }

    async fn neighbors(&self, nodes: &[String]) -> GraphResult<Vec<(String, String)>> {
        if nodes.is_empty() {
            return Ok(Vec::new());
        }

        let links = AccountLink::find_touching(nodes, &self.db_pool).await?;
        Ok(orient_edges(
            nodes,
            links
                .iter()
                .map(|l| (l.source_key.as_str(), l.target_key.as_str())),
        ))
    }

    async fn social_accounts(&self, nodes: &[String]) -> GraphResult<Vec<SocialAccount>> {
        if nodes.is_empty() {
            return Ok(Vec::new());
        }

        let rows = SocialAccountRow::find_by_node_keys(nodes, &self.db_pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
