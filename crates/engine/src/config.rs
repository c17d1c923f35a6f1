// crates/engine/src/config.rs
use common::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/engine.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub io: IoSection,
    pub pipeline: PipelineConfig,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IoSection {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Optional JSON score summary
    pub summary: Option<PathBuf>,
}

impl Default for IoSection {
    fn default() -> Self {
        Self {
            input: PathBuf::from("user-wallet-transactions.json"),
            output: PathBuf::from("wallet_credit_scores.csv"),
            summary: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Filter used when RUST_LOG is unset
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl EngineConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.pipeline.validate()?;
        Ok(config)
    }
}

/// Load the engine config.
///
/// An explicit path must exist. Without one, `config/engine.toml` is used
/// when present and built-in defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            if !default.exists() {
                return Ok(EngineConfig::default());
            }
            default
        }
    };

    let config_str = std::fs::read_to_string(&path).map_err(|e| {
        Error::Config(format!("Failed to read config {}: {}", path.display(), e))
    })?;

    EngineConfig::from_toml(&config_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.io.input, PathBuf::from("user-wallet-transactions.json"));
        assert_eq!(config.io.output, PathBuf::from("wallet_credit_scores.csv"));
        assert_eq!(config.pipeline, PipelineConfig::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file() {
        let config = EngineConfig::from_toml(
            r#"
            [io]
            input = "data/export.zip"

            [pipeline]
            score_scale = 100
            "#,
        )
        .unwrap();

        assert_eq!(config.io.input, PathBuf::from("data/export.zip"));
        assert_eq!(config.io.output, PathBuf::from("wallet_credit_scores.csv"));
        assert_eq!(config.pipeline.score_scale, 100);
        assert_eq!(config.pipeline.epsilon, 1e-9);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = EngineConfig::from_toml("[pipeline]\nwinsorize_quantile = 0.0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = EngineConfig::from_toml("[pipeline\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let err = load_config(Some(Path::new("/no/such/engine.toml"))).unwrap_err();
        assert!(err.is_fatal());
    }
}
