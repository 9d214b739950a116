//! Believer Score
//!
//! Ranks tokens by how many distinct, socially verified and evenly sized
//! holders they have, penalized against market cap and normalized to 0-100
//! across the batch. Also lists the credible believers of a single token.

pub mod believers;
pub mod config;
pub mod error;
pub mod graph;
pub mod holdings;
pub mod linkage;
pub mod pipeline;
pub mod scoring;

pub use believers::BelieverRecord;
pub use config::PipelineConfig;
pub use error::{ConfigError, ScoreError, ScoreResult};
pub use graph::{GraphAccess, GraphError, MemoryGraph, PgGraph};
pub use pipeline::{BatchReport, BelieverPipeline};
pub use scoring::{BatchContext, BelieverScoreCalculator, TokenScore};
