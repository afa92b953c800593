use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MIN_RETRIEVAL_SCORE, DEFAULT_TOP_K};

use super::error::{PipelineError, PipelineResult};

/// Tunables for a [`CodePipeline`](super::CodePipeline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Candidate count requested from the retriever.
    pub top_k: usize,
    /// Candidates below this score are dropped before inference.
    pub min_retrieval_score: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            min_retrieval_score: DEFAULT_MIN_RETRIEVAL_SCORE,
        }
    }
}

impl PipelineConfig {
    /// Rejects configurations a pipeline cannot run with.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.top_k == 0 {
            return Err(PipelineError::InvalidConfig {
                reason: "top_k must be at least 1".to_string(),
            });
        }
        if !self.min_retrieval_score.is_finite() || self.min_retrieval_score < 0.0 {
            return Err(PipelineError::InvalidConfig {
                reason: format!(
                    "min_retrieval_score must be a finite non-negative number, got {}",
                    self.min_retrieval_score
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert_eq!(config.top_k, DEFAULT_TOP_K);
        assert_eq!(config.min_retrieval_score, DEFAULT_MIN_RETRIEVAL_SCORE);
        config.validate().unwrap();
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let config = PipelineConfig {
            top_k: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_negative_or_nan_min_score_rejected() {
        let negative = PipelineConfig {
            min_retrieval_score: -0.1,
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let nan = PipelineConfig {
            min_retrieval_score: f32::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_zero_min_score_allowed() {
        let config = PipelineConfig {
            min_retrieval_score: 0.0,
            ..Default::default()
        };
        config.validate().unwrap();
    }
}
