// crates/features/src/lib.rs - wallet feature engineering
use common::*;

pub mod aggregate;
pub mod derive;
pub mod value;
pub mod winsorize;

pub use aggregate::aggregate;
pub use derive::derive;
pub use value::{normalize, try_value_usd, value_usd, ValueError};
pub use winsorize::{percentile, winsorize, ClampBound};

/// Runs the feature stages in order: value -> aggregate -> derive -> winsorize.
///
/// Every stage consumes the whole collection before the next one starts;
/// the clamp bounds depend on the full wallet population.
pub struct FeatureBuilder {
    config: PipelineConfig,
}

impl FeatureBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Build the clamped feature table for a batch of events
    pub fn build(&self, events: Vec<Event>) -> Vec<WalletFeatures> {
        let event_count = events.len();

        let normalized = timed("normalize", || normalize(events));
        let wallets = timed("aggregate", || aggregate(&normalized));
        let wallets = timed("derive", || derive(wallets, self.config.epsilon));
        let wallets = timed("winsorize", || winsorize(wallets, self.config.winsorize_quantile));

        tracing::info!(
            "Built features for {} wallets from {} events",
            wallets.len(),
            event_count
        );

        wallets
    }
}

/// Run one pipeline stage and record its duration
pub fn timed<T>(stage: &'static str, f: impl FnOnce() -> T) -> T {
    let start = std::time::Instant::now();
    let out = f();
    let elapsed = start.elapsed();

    tracing::debug!("Stage {} took {:?}", stage, elapsed);
    metrics::histogram!("pipeline_stage_ms", "stage" => stage).record(elapsed.as_secs_f64() * 1000.0);

    out
}
