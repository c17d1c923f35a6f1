// crates/engine/src/lib.rs - batch credit scoring pipeline

pub mod config;

use adapters::{load_events, open_source, write_json, write_scores};
use common::*;
use features::{timed, FeatureBuilder};
use scoring::{CreditScorer, ScoreSummary};

pub use config::{load_config, EngineConfig, IoSection, LoggingSection};

/// Chains the stages in strict order:
/// normalize -> aggregate -> derive -> winsorize -> scale -> score.
pub struct CreditPipeline {
    features: FeatureBuilder,
    scorer: CreditScorer,
}

/// Outcome of one file-to-file run
#[derive(Debug)]
pub struct RunReport {
    pub records: usize,
    pub dropped: usize,
    pub summary: ScoreSummary,
}

impl CreditPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            scorer: CreditScorer::new(&config),
            features: FeatureBuilder::new(config),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        self.features.config()
    }

    /// Score validated events; wallets come back in first-encounter order
    pub fn score(&self, events: Vec<Event>) -> Vec<ScoredWallet> {
        let wallets = self.features.build(events);
        timed("score", || self.scorer.score(&wallets))
    }

    /// Load, score and write.
    ///
    /// The score table is written last, so it only appears once loading,
    /// scoring and the optional summary have all succeeded.
    pub fn run(&self, io: &IoSection) -> Result<RunReport> {
        let source = open_source(&io.input);
        let loaded = load_events(source.as_ref())?;

        let scores = self.score(loaded.events);

        let summary = ScoreSummary::from_scores(&scores, self.config().score_scale);
        summary.log();
        if let Some(path) = &io.summary {
            write_json(path, &summary)?;
            tracing::info!("Score summary written to {}", path.display());
        }

        write_scores(&io.output, &scores)?;

        Ok(RunReport {
            records: loaded.records,
            dropped: loaded.dropped,
            summary,
        })
    }
}
