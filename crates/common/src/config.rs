// crates/common/src/config.rs
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Numeric policy shared by the feature and scoring stages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Added to every ratio denominator
    pub epsilon: f64,
    /// Upper winsorization quantile
    pub winsorize_quantile: f64,
    /// Credit scores span `0..=score_scale`
    pub score_scale: u16,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-9,
            winsorize_quantile: 0.99,
            score_scale: 1000,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon > 0.0 && self.epsilon.is_finite()) {
            return Err(Error::Config(format!("epsilon must be positive, got {}", self.epsilon)));
        }
        if !(self.winsorize_quantile > 0.0 && self.winsorize_quantile <= 1.0) {
            return Err(Error::Config(format!(
                "winsorize_quantile must be in (0, 1], got {}",
                self.winsorize_quantile
            )));
        }
        if self.score_scale == 0 {
            return Err(Error::Config("score_scale must be non-zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad_eps = PipelineConfig { epsilon: 0.0, ..Default::default() };
        assert!(matches!(bad_eps.validate(), Err(Error::Config(_))));

        let bad_q = PipelineConfig { winsorize_quantile: 1.5, ..Default::default() };
        assert!(bad_q.validate().is_err());

        let bad_scale = PipelineConfig { score_scale: 0, ..Default::default() };
        assert!(bad_scale.validate().is_err());
    }
}
