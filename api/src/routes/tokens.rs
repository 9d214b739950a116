//! Token API routes

use std::{future::Future, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use scorer::{BelieverRecord, GraphAccess, TokenScore};

use super::ApiError;
use crate::AppState;

/// Report row - matches the frontend token table
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRow {
    pub address: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub believer_score: Option<f64>,
    pub raw_believer_score: f64,
    pub diversity_adjusted_score: f64,
    pub market_adjusted_score: f64,
    pub holder_to_market_cap_ratio: f64,
    pub market_cap: Option<f64>,
    pub wallet_count: usize,
    pub warpcast_wallets: usize,
    pub warpcast_percentage: f64,
    pub avg_social_cred_score: Option<f64>,
    pub total_supply: f64,
}

impl From<TokenScore> for TokenRow {
    fn from(s: TokenScore) -> Self {
        Self {
            address: s.token.address,
            name: s.token.name,
            symbol: s.token.symbol,
            believer_score: s.normalized_score,
            raw_believer_score: s.raw_score,
            diversity_adjusted_score: s.diversity_adjusted_score,
            market_adjusted_score: s.market_adjusted_score,
            holder_to_market_cap_ratio: s.holder_to_market_cap_ratio,
            market_cap: s.token.market_cap,
            wallet_count: s.wallet_count,
            warpcast_wallets: s.socially_linked_wallet_count,
            warpcast_percentage: s.social_percentage,
            avg_social_cred_score: s.social_credibility_average,
            total_supply: s.total_balance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenReport {
    pub fcs_data: Vec<TokenRow>,
}

#[derive(Debug, Serialize)]
pub struct BelieverList {
    pub believers: Vec<BelieverRecord>,
}

/// Query params for the believers endpoint
#[derive(Debug, Deserialize)]
pub struct BelieverParams {
    pub limit: Option<usize>,
}

/// Run a pipeline call under the configured request timeout
async fn bounded<G, T, F>(state: &AppState<G>, call: F) -> Result<T, ApiError>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(state.request_timeout, call)
        .await
        .map_err(|_| {
            tracing::warn!(timeout = ?state.request_timeout, "Pipeline call timed out");
            ApiError::Timeout
        })
}

/// GET /api/tokens
/// Returns every held token sorted by believer score
pub async fn get_tokens<G>(
    State(state): State<Arc<AppState<G>>>,
) -> Result<Json<TokenReport>, ApiError>
where
    G: GraphAccess + Send + Sync + 'static,
{
    let report = bounded(&state, state.pipeline.token_report())
        .await?
        .map_err(|e| ApiError::from_score(e, "Failed to fetch tokens"))?;

    let fcs_data = report.tokens.into_iter().map(Into::into).collect();
    Ok(Json(TokenReport { fcs_data }))
}

/// GET /api/tokens/:address
/// Returns the report row of a single token
pub async fn get_token<G>(
    State(state): State<Arc<AppState<G>>>,
    Path(address): Path<String>,
) -> Result<Json<TokenRow>, ApiError>
where
    G: GraphAccess + Send + Sync + 'static,
{
    let score = bounded(&state, state.pipeline.token_score(&address))
        .await?
        .map_err(|e| ApiError::from_score(e, "Failed to fetch tokens"))?;

    Ok(Json(TokenRow::from(score)))
}

/// GET /api/tokens/:address/believers
/// Returns credible believers, highest credibility first
pub async fn get_token_believers<G>(
    State(state): State<Arc<AppState<G>>>,
    Path(address): Path<String>,
    Query(params): Query<BelieverParams>,
) -> Result<Json<BelieverList>, ApiError>
where
    G: GraphAccess + Send + Sync + 'static,
{
    let believers = bounded(&state, state.pipeline.believers(&address, params.limit))
        .await?
        .map_err(|e| ApiError::from_score(e, "Failed to fetch believers"))?;

    Ok(Json(BelieverList { believers }))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use scorer::{
        graph::{GraphResult, HoldingRecord, HoldingScope, SocialAccount, TokenNode},
        BelieverPipeline, GraphError, MemoryGraph, PipelineConfig,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::app;

    fn token(address: &str, market_cap: Option<f64>) -> TokenNode {
        TokenNode {
            address: address.to_string(),
            name: Some("Believe".to_string()),
            symbol: Some("BLV".to_string()),
            market_cap,
        }
    }

    fn graph() -> MemoryGraph {
        MemoryGraph::new()
            .with_token(token("0xaaa", Some(1_000_000.0)))
            .with_holding("0xlinked", "0xaaa", Some(500.0))
            .with_holding("0xanon", "0xaaa", Some(20.0))
            .with_account(SocialAccount {
                fid: 42,
                node_key: "fc:42".to_string(),
                username: Some("believer".to_string()),
                bio: Some("gm".to_string()),
                credibility: Some(8.5),
            })
            .with_link("0xlinked", "fc:42")
            .with_token(token("0xbbb", Some(10.0)))
    }

    fn state<G: GraphAccess + Sync>(graph: G, request_timeout: Duration) -> Arc<AppState<G>> {
        Arc::new(AppState {
            pipeline: BelieverPipeline::new(graph, PipelineConfig::default()),
            request_timeout,
        })
    }

    async fn get<G>(state: Arc<AppState<G>>, uri: &str) -> (StatusCode, Value)
    where
        G: GraphAccess + Send + Sync + 'static,
    {
        let response = app(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// Fails every call, optionally after a delay
    struct BrokenGraph {
        delay: Duration,
    }

    impl BrokenGraph {
        async fn fail<T>(&self) -> GraphResult<T> {
            tokio::time::sleep(self.delay).await;
            Err(GraphError::Unavailable("connection refused".to_string()))
        }
    }

    impl GraphAccess for BrokenGraph {
        async fn tokens(&self) -> GraphResult<Vec<TokenNode>> {
            self.fail().await
        }

        async fn token(&self, _address: &str) -> GraphResult<Option<TokenNode>> {
            self.fail().await
        }

        async fn holdings(&self, _scope: HoldingScope<'_>) -> GraphResult<Vec<HoldingRecord>> {
            self.fail().await
        }

        async fn market_cap(&self, _address: &str) -> GraphResult<Option<f64>> {
            self.fail().await
        }

        async fn neighbors(&self, _nodes: &[String]) -> GraphResult<Vec<(String, String)>> {
            self.fail().await
        }

        async fn social_accounts(&self, _nodes: &[String]) -> GraphResult<Vec<SocialAccount>> {
            self.fail().await
        }
    }

    #[tokio::test]
    async fn test_get_tokens() {
        let (status, body) = get(state(graph(), Duration::from_secs(5)), "/api/tokens").await;

        assert_eq!(status, StatusCode::OK);
        let rows = body["fcs_data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["address"], "0xaaa");
        assert_eq!(rows[0]["believerScore"], 50.0);
        assert_eq!(rows[0]["walletCount"], 2);
        assert_eq!(rows[0]["warpcastWallets"], 1);
        assert_eq!(rows[0]["warpcastPercentage"], 50.0);
        assert_eq!(rows[0]["avgSocialCredScore"], 8.5);
        assert_eq!(rows[0]["totalSupply"], 520.0);
    }

    #[tokio::test]
    async fn test_get_token_not_found() {
        let (status, body) = get(
            state(graph(), Duration::from_secs(5)),
            "/api/tokens/0xnope",
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("0xnope"));
    }

    #[tokio::test]
    async fn test_get_token_without_holders_is_unscored() {
        let (status, body) =
            get(state(graph(), Duration::from_secs(5)), "/api/tokens/0xBBB").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["address"], "0xbbb");
        assert!(body["believerScore"].is_null());
        assert_eq!(body["walletCount"], 0);
        assert_eq!(body["marketCap"], 10.0);
    }

    #[tokio::test]
    async fn test_get_token_believers() {
        let (status, body) = get(
            state(graph(), Duration::from_secs(5)),
            "/api/tokens/0xAAA/believers?limit=10",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let believers = body["believers"].as_array().unwrap();
        assert_eq!(believers.len(), 1);
        assert_eq!(believers[0]["fid"], 42);
        assert_eq!(believers[0]["username"], "believer");
        assert_eq!(believers[0]["balance"], 500.0);
        assert_eq!(believers[0]["fcred"], 8.5);
    }

    #[tokio::test]
    async fn test_graph_failure_is_500() {
        let broken = BrokenGraph {
            delay: Duration::ZERO,
        };
        let (status, body) = get(state(broken, Duration::from_secs(5)), "/api/tokens").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch tokens");
    }

    #[tokio::test]
    async fn test_slow_graph_times_out() {
        let slow = BrokenGraph {
            delay: Duration::from_secs(5),
        };
        let (status, body) =
            get(state(slow, Duration::from_millis(20)), "/api/tokens/0xaaa/believers").await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["error"], "Request timed out");
    }
}
