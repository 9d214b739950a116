//! Pipeline settings read from the environment

use std::env;

use crate::error::ConfigError;

mod defaults {
    pub const REPORT_MAX_HOPS: &str = "5";
    pub const BELIEVER_MAX_HOPS: &str = "4";
    pub const SCORE_CONCURRENCY: &str = "8";
}

/// Tunables for a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Hop bound for social linkage in the all-tokens report
    pub report_max_hops: usize,
    /// Hop bound for social linkage in the believer list
    pub believer_max_hops: usize,
    /// Tokens resolved concurrently before the normalization barrier
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            report_max_hops: 5,
            believer_max_hops: 4,
            concurrency: 8,
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            report_max_hops: read_usize("REPORT_MAX_HOPS", defaults::REPORT_MAX_HOPS)?,
            believer_max_hops: read_usize("BELIEVER_MAX_HOPS", defaults::BELIEVER_MAX_HOPS)?,
            concurrency: read_usize("SCORE_CONCURRENCY", defaults::SCORE_CONCURRENCY)?.max(1),
        })
    }
}

fn read_usize(name: &str, default: &str) -> Result<usize, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_usize_rejects_garbage() {
        std::env::set_var("SCORER_TEST_BAD_HOPS", "five");
        let err = read_usize("SCORER_TEST_BAD_HOPS", "5").unwrap_err();
        assert!(err.to_string().contains("SCORER_TEST_BAD_HOPS"));
    }

    #[test]
    fn test_read_usize_default() {
        assert_eq!(read_usize("SCORER_TEST_UNSET_VAR", "4").unwrap(), 4);
    }
}
