//! Believer score pipeline
//!
//! All-tokens report: tokens + holdings -> per-token linkage and scoring
//! (concurrent, one slot per token) -> batch normalization.
//! Believer list: token lookup -> holdings -> linkage -> extraction.

use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::{stream, StreamExt, TryStreamExt};
use serde::Serialize;

use crate::{
    believers::{extract_believers, BelieverRecord},
    config::PipelineConfig,
    error::{ScoreError, ScoreResult},
    graph::{normalize_address, GraphAccess, GraphError, HoldingScope, TokenNode},
    holdings::TokenHoldings,
    linkage::{resolve_social_accounts, SocialLinks},
    scoring::{BatchContext, BelieverScoreCalculator, TokenScore},
};

/// Normalized scores for every held token, best first
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub tokens: Vec<TokenScore>,
    /// `None` for an empty batch
    pub context: Option<BatchContext>,
    pub generated_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn find(&self, address: &str) -> Option<&TokenScore> {
        let address = normalize_address(address);
        self.tokens.iter().find(|s| s.token.address == address)
    }
}

pub struct BelieverPipeline<G> {
    graph: G,
    config: PipelineConfig,
}

impl<G> BelieverPipeline<G>
where
    G: GraphAccess + Sync,
{
    pub fn new(graph: G, config: PipelineConfig) -> Self {
        Self { graph, config }
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Score and rank every token that has at least one holding record.
    ///
    /// Fails as a whole if any graph query fails; normalization needs the
    /// complete batch.
    pub async fn token_report(&self) -> ScoreResult<BatchReport> {
        let start = Instant::now();

        let tokens = self.graph.tokens().await.map_err(ScoreError::DataAccess)?;
        let records = self
            .graph
            .holdings(HoldingScope::All)
            .await
            .map_err(ScoreError::DataAccess)?;

        let mut grouped = TokenHoldings::group_by_token(&records);
        let jobs: Vec<(TokenNode, TokenHoldings)> = tokens
            .into_iter()
            .filter_map(|token| {
                let holdings = grouped.remove(&normalize_address(&token.address))?;
                Some((token, holdings))
            })
            .collect();

        if !grouped.is_empty() {
            tracing::warn!(
                orphaned_tokens = grouped.len(),
                "Holdings reference tokens missing from the graph, skipping them"
            );
        }

        tracing::debug!(
            tokens = jobs.len(),
            holdings = records.len(),
            "Scoring tokens"
        );

        let mut slots: Vec<Option<TokenScore>> = vec![None; jobs.len()];
        let max_hops = self.config.report_max_hops;

        let scored: Vec<(usize, TokenScore)> = stream::iter(jobs.into_iter().enumerate())
            .map(|(slot, (mut token, holdings))| async move {
                let data_access = |source: GraphError| ScoreError::TokenDataAccess {
                    token: token.address.clone(),
                    source,
                };

                let market_cap = self
                    .graph
                    .market_cap(&token.address)
                    .await
                    .map_err(data_access)?;
                let links =
                    resolve_social_accounts(&self.graph, &holdings.wallet_addresses(), max_hops)
                        .await
                        .map_err(data_access)?;

                token.market_cap = market_cap;
                let score = BelieverScoreCalculator::calculate(token, &holdings, &links);
                Ok::<_, ScoreError>((slot, score))
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .try_collect()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Token report aborted"))?;

        for (slot, score) in scored {
            slots[slot] = Some(score);
        }

        // Barrier: every market-adjusted score is known from here on.
        let (tokens, context) =
            BelieverScoreCalculator::normalize_batch(slots.into_iter().flatten().collect());

        tracing::info!(
            tokens = tokens.len(),
            min_score = ?context.map(|c| c.min_score),
            max_score = ?context.map(|c| c.max_score),
            duration_ms = %start.elapsed().as_millis(),
            "Token report computed"
        );

        Ok(BatchReport {
            tokens,
            context,
            generated_at: Utc::now(),
        })
    }

    /// Report row for one token. Computes the full batch, since the
    /// normalized score depends on every other token.
    ///
    /// A token without holders is left out of the batch; it gets an
    /// unscored row (`normalized_score` is `None`) rather than an error.
    pub async fn token_score(&self, address: &str) -> ScoreResult<TokenScore> {
        let address = normalize_address(address);
        let token = self
            .graph
            .token(&address)
            .await
            .map_err(ScoreError::DataAccess)?
            .ok_or_else(|| ScoreError::TokenNotFound(address.clone()))?;

        let report = self.token_report().await?;
        if let Some(score) = report.find(&address) {
            return Ok(score.clone());
        }

        tracing::debug!(token = %address, "Token has no holders, returning unscored row");
        let holdings = TokenHoldings {
            token: address,
            wallets: Vec::new(),
        };
        Ok(BelieverScoreCalculator::calculate(
            token,
            &holdings,
            &SocialLinks::default(),
        ))
    }

    /// Credibility-ranked believers of one token, optionally truncated.
    pub async fn believers(
        &self,
        address: &str,
        limit: Option<usize>,
    ) -> ScoreResult<Vec<BelieverRecord>> {
        let start = Instant::now();
        let address = normalize_address(address);
        let unavailable = |source: GraphError| ScoreError::BelieversUnavailable {
            token: address.clone(),
            source,
        };

        let token = self.graph.token(&address).await.map_err(unavailable)?;
        if token.is_none() {
            tracing::info!(token = %address, "Believers requested for unknown token");
            return Err(ScoreError::TokenNotFound(address.clone()));
        }

        let records = self
            .graph
            .holdings(HoldingScope::Token(&address))
            .await
            .map_err(unavailable)?;
        let holdings = TokenHoldings::from_records(&address, &records);

        let links = resolve_social_accounts(
            &self.graph,
            &holdings.wallet_addresses(),
            self.config.believer_max_hops,
        )
        .await
        .map_err(unavailable)?;

        let mut believers = extract_believers(&holdings, &links);
        if let Some(limit) = limit {
            believers.truncate(limit);
        }

        tracing::info!(
            token = %address,
            holders = holdings.wallets.len(),
            believers = believers.len(),
            duration_ms = %start.elapsed().as_millis(),
            "Believers extracted"
        );

        Ok(believers)
    }
}
