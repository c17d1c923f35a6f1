// crates/features/src/derive.rs - row-wise ratio features
use common::WalletFeatures;

/// `numerator / (denominator + epsilon)`.
/// Negative denominators and non-finite results give 0.
fn guarded_ratio(numerator: f64, denominator: f64, epsilon: f64) -> f64 {
    if denominator < 0.0 {
        return 0.0;
    }
    let ratio = numerator / (denominator + epsilon);
    if ratio.is_finite() { ratio } else { 0.0 }
}

/// Fill the five derived ratios of a single wallet
pub fn derive_row(row: &mut WalletFeatures, epsilon: f64) {
    row.repay_to_borrow_ratio =
        guarded_ratio(row.total_repay_usd, row.total_borrow_usd, epsilon).min(1.0);

    row.liquidation_value_to_borrow_value_ratio =
        guarded_ratio(row.total_liquidation_usd, row.total_borrow_usd, epsilon);

    row.liquidation_calls_per_transaction_ratio =
        guarded_ratio(row.num_liquidations, row.total_transactions, epsilon);

    row.avg_transactions_per_day =
        guarded_ratio(row.total_transactions, row.account_age_days, epsilon);

    row.deposit_utilization_ratio =
        guarded_ratio(row.total_borrow_usd, row.total_deposit_usd, epsilon).min(1.0);
}

/// Derive ratios for every wallet. No cross-wallet dependency.
pub fn derive(mut wallets: Vec<WalletFeatures>, epsilon: f64) -> Vec<WalletFeatures> {
    for row in wallets.iter_mut() {
        derive_row(row, epsilon);
    }
    wallets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    const EPS: f64 = 1e-9;

    fn row() -> WalletFeatures {
        WalletFeatures::new("0x1".into(), DateTime::<Utc>::from_timestamp(0, 0).unwrap())
    }

    #[test]
    fn test_repay_ratio_capped_at_one() {
        let mut w = row();
        w.total_borrow_usd = 100.0;
        w.total_repay_usd = 250.0;
        derive_row(&mut w, EPS);
        assert_eq!(w.repay_to_borrow_ratio, 1.0);

        w.total_repay_usd = 50.0;
        derive_row(&mut w, EPS);
        assert!((w.repay_to_borrow_ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_borrow_and_deposit_stay_bounded() {
        let mut w = row();
        w.total_repay_usd = 10.0;
        w.total_borrow_usd = 0.0;
        w.total_deposit_usd = 0.0;
        w.total_liquidation_usd = 5.0;
        derive_row(&mut w, EPS);

        assert_eq!(w.repay_to_borrow_ratio, 1.0);
        assert_eq!(w.deposit_utilization_ratio, 0.0);
        // unclamped, only finite
        assert!(w.liquidation_value_to_borrow_value_ratio.is_finite());
        assert!(w.liquidation_value_to_borrow_value_ratio > 1.0);
    }

    #[test]
    fn test_utilization_capped_at_one() {
        let mut w = row();
        w.total_deposit_usd = 10.0;
        w.total_borrow_usd = 1_000.0;
        derive_row(&mut w, EPS);
        assert_eq!(w.deposit_utilization_ratio, 1.0);
    }

    #[test]
    fn test_rates() {
        let mut w = row();
        w.total_transactions = 10.0;
        w.num_liquidations = 2.0;
        w.account_age_days = 5.0;
        derive_row(&mut w, EPS);
        assert!((w.liquidation_calls_per_transaction_ratio - 0.2).abs() < 1e-9);
        assert!((w.avg_transactions_per_day - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_denominator_is_zero() {
        assert_eq!(guarded_ratio(5.0, -1.0, EPS), 0.0);
        assert_eq!(guarded_ratio(f64::INFINITY, 1.0, EPS), 0.0);
        assert_eq!(guarded_ratio(0.0, 0.0, EPS), 0.0);
    }

    #[test]
    fn test_derive_whole_population() {
        let mut a = row();
        a.total_deposit_usd = 100.0;
        a.total_borrow_usd = 25.0;
        let b = row();

        let out = derive(vec![a, b], EPS);
        assert!((out[0].deposit_utilization_ratio - 0.25).abs() < 1e-9);
        assert_eq!(out[1].deposit_utilization_ratio, 0.0);
    }
}
