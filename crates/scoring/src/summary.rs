// crates/scoring/src/summary.rs - score distribution report
use common::ScoredWallet;
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

const BAND_COUNT: u16 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBand {
    pub lower: u16,
    pub upper: u16,
    pub wallets: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub wallets: usize,
    pub min: Option<u16>,
    pub max: Option<u16>,
    pub mean: Option<f64>,
    pub bands: Vec<ScoreBand>,
}

impl ScoreSummary {
    /// Bucket scores into at most ten equal bands; the top score lands in
    /// the last band. Small scales get one band per reachable width.
    pub fn from_scores(scores: &[ScoredWallet], score_scale: u16) -> Self {
        let width = score_scale.div_ceil(BAND_COUNT).max(1);
        let count = (score_scale / width + 1).min(BAND_COUNT);
        let mut bands: Vec<ScoreBand> = (0..count)
            .map(|i| ScoreBand {
                lower: i * width,
                upper: if i + 1 == count { score_scale } else { (i + 1) * width - 1 },
                wallets: 0,
            })
            .collect();

        for score in scores {
            let idx = usize::from((score.credit_score / width).min(count - 1));
            bands[idx].wallets += 1;
        }

        let (min, max) = match scores.iter().map(|s| s.credit_score).minmax() {
            MinMaxResult::NoElements => (None, None),
            MinMaxResult::OneElement(v) => (Some(v), Some(v)),
            MinMaxResult::MinMax(lo, hi) => (Some(lo), Some(hi)),
        };

        let mean = (!scores.is_empty()).then(|| {
            scores.iter().map(|s| f64::from(s.credit_score)).sum::<f64>() / scores.len() as f64
        });

        Self {
            wallets: scores.len(),
            min,
            max,
            mean,
            bands,
        }
    }

    pub fn log(&self) {
        tracing::info!(
            wallets = self.wallets,
            min = ?self.min,
            max = ?self.max,
            mean = ?self.mean,
            "Credit score distribution"
        );
        for band in self.bands.iter().filter(|b| b.wallets > 0) {
            tracing::info!("  {:>4}-{:<4} {}", band.lower, band.upper, band.wallets);
        }
    }
}
