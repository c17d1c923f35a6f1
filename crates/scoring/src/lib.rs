// crates/scoring/src/lib.rs - weighted credit scoring model
use common::*;
use ndarray::Array1;
use ndarray_stats::QuantileExt;

pub mod scaler;
pub mod summary;
pub mod weights;

pub use scaler::{feature_matrix, min_max_scale, ColumnRange};
pub use summary::{ScoreBand, ScoreSummary};
pub use weights::{weight, FEATURE_WEIGHTS};

/// Intermediate scores of one wallet
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub wallet: String,
    pub raw_score: f64,
    pub normalized_score: f64,
    pub credit_score: u16,
}

/// Population-relative credit scorer.
///
/// Scores depend on every wallet in the batch: min-max ranges and the final
/// rescale are taken over the whole population, so the same wallet can
/// score differently in a different snapshot.
pub struct CreditScorer {
    score_scale: u16,
}

impl CreditScorer {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            score_scale: config.score_scale,
        }
    }

    /// Score every wallet, preserving input order
    pub fn score(&self, wallets: &[WalletFeatures]) -> Vec<ScoredWallet> {
        self.score_cards(wallets)
            .into_iter()
            .map(|card| ScoredWallet {
                wallet: card.wallet,
                credit_score: card.credit_score,
            })
            .collect()
    }

    pub fn score_cards(&self, wallets: &[WalletFeatures]) -> Vec<ScoreCard> {
        if wallets.is_empty() {
            return Vec::new();
        }

        let features = Feature::SCORING;
        let mut matrix = feature_matrix(wallets, &features);
        min_max_scale(&mut matrix);

        let raw = raw_scores(&matrix, &features);
        let normalized = rescale(&raw);
        let scale = f64::from(self.score_scale);

        let cards: Vec<ScoreCard> = wallets
            .iter()
            .zip(raw.iter().zip(normalized.iter()))
            .map(|(row, (&raw_score, &normalized_score))| ScoreCard {
                wallet: row.wallet.clone(),
                raw_score,
                normalized_score,
                credit_score: (normalized_score * scale).floor().clamp(0.0, scale) as u16,
            })
            .collect();

        tracing::debug!(
            "Raw score range [{:.6}, {:.6}] over {} wallets",
            raw.min_skipnan(),
            raw.max_skipnan(),
            cards.len()
        );
        metrics::counter!("wallets_scored_total").increment(cards.len() as u64);

        cards
    }
}

/// Weighted sum of the scaled columns
fn raw_scores(scaled: &ndarray::Array2<f64>, features: &[Feature]) -> Array1<f64> {
    let mut raw = Array1::<f64>::zeros(scaled.nrows());

    for (j, feature) in features.iter().enumerate() {
        let w = weight(*feature);
        let column = scaled.column(j);
        if w >= 0.0 {
            raw.zip_mut_with(&column, |r, &x| *r += x * w);
        } else {
            let penalty = w.abs();
            raw.zip_mut_with(&column, |r, &x| *r -= x * penalty);
        }
    }

    raw
}

/// Rescale raw scores to [0, 1]; a flat population sits at 0.5
fn rescale(raw: &Array1<f64>) -> Array1<f64> {
    let lo = *raw.min_skipnan();
    let hi = *raw.max_skipnan();
    let span = hi - lo;

    if span == 0.0 {
        Array1::from_elem(raw.len(), 0.5)
    } else {
        raw.mapv(|x| (x - lo) / span)
    }
}
