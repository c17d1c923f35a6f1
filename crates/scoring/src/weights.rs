// crates/scoring/src/weights.rs
use common::Feature;

/// Fixed linear model. Positive weights reward, negative weights penalize.
pub const FEATURE_WEIGHTS: [(Feature, f64); 20] = [
    (Feature::TotalTransactions, 0.05),
    (Feature::NumDeposits, 0.08),
    (Feature::NumBorrows, 0.02),
    (Feature::NumRepays, 0.10),
    (Feature::NumRedeemUnderlying, 0.03),
    (Feature::TotalDepositUsd, 0.10),
    (Feature::TotalBorrowUsd, 0.05),
    (Feature::TotalRepayUsd, 0.12),
    (Feature::TotalRedeemUsd, 0.03),
    (Feature::NumUniqueAssets, 0.05),
    (Feature::AccountAgeDays, 0.07),
    (Feature::RepayToBorrowRatio, 0.15),
    (Feature::NumUniqueActions, 0.05),
    (Feature::AvgTransactionsPerDay, 0.05),
    (Feature::NumLiquidations, -0.15),
    (Feature::TotalLiquidationUsd, -0.10),
    (Feature::LiquidationValueToBorrowValueRatio, -0.10),
    (Feature::LiquidationCallsPerTransactionRatio, -0.15),
    (Feature::DaysSinceLastTransaction, -0.07),
    (Feature::DepositUtilizationRatio, -0.05),
];

/// Weight of a scoring feature, 0 for anything outside the model
pub fn weight(feature: Feature) -> f64 {
    FEATURE_WEIGHTS
        .iter()
        .find(|(f, _)| *f == feature)
        .map(|(_, w)| *w)
        .unwrap_or(0.0)
}
