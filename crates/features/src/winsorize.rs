// crates/features/src/winsorize.rs - upper-tail outlier clamping
use common::{Feature, WalletFeatures};
use ordered_float::OrderedFloat;

/// Cap applied to one column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampBound {
    pub feature: Feature,
    pub upper: f64,
}

/// Quantile with linear interpolation between closest ranks
/// (the usual dataframe default). `None` for an empty column.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted: Vec<OrderedFloat<f64>> = values.iter().copied().map(OrderedFloat).collect();
    sorted.sort_unstable();

    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let t = rank - lo as f64;
    let (a, b) = (sorted[lo].0, sorted[hi].0);

    // Interpolate from the nearer end to keep results inside [a, b]
    let diff = b - a;
    Some(if t >= 0.5 { b - diff * (1.0 - t) } else { a + diff * t })
}

/// Population bounds for the heavy-tailed columns
pub fn clamp_bounds(wallets: &[WalletFeatures], quantile: f64) -> Vec<ClampBound> {
    Feature::HEAVY_TAILED
        .iter()
        .filter_map(|&feature| {
            let column: Vec<f64> = wallets.iter().map(|w| w.get(feature)).collect();
            percentile(&column, quantile).map(|upper| ClampBound { feature, upper })
        })
        .collect()
}

/// Cap every heavy-tailed column at its population quantile.
///
/// Bounds are computed from the complete population before any wallet is
/// touched. Values at or below the bound are unchanged.
pub fn winsorize(mut wallets: Vec<WalletFeatures>, quantile: f64) -> Vec<WalletFeatures> {
    let bounds = clamp_bounds(&wallets, quantile);

    for bound in &bounds {
        let mut clamped = 0usize;
        for row in wallets.iter_mut() {
            let value = row.get_mut(bound.feature);
            if *value > bound.upper {
                *value = bound.upper;
                clamped += 1;
            }
        }
        tracing::debug!(
            feature = bound.feature.name(),
            upper = bound.upper,
            clamped,
            "Winsorized column"
        );
    }

    wallets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn population(values: &[f64]) -> Vec<WalletFeatures> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mut w = WalletFeatures::new(
                    format!("0x{i}"),
                    DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
                );
                w.total_deposit_usd = *v;
                w.num_liquidations = *v;
                w
            })
            .collect()
    }

    #[test]
    fn test_percentile_linear() {
        let values: Vec<f64> = (1..=101).map(|v| v as f64).collect();
        assert_eq!(percentile(&values, 0.99), Some(100.0));
        assert_eq!(percentile(&values, 0.5), Some(51.0));
        assert_eq!(percentile(&[1.0, 2.0], 0.5), Some(1.5));
        assert_eq!(percentile(&[7.0], 0.99), Some(7.0));
        assert_eq!(percentile(&[], 0.99), None);
    }

    #[test]
    fn test_percentile_ignores_input_order() {
        let values = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(percentile(&values, 0.75), Some(4.0));
        assert_eq!(percentile(&values, 1.0), Some(5.0));
    }

    #[test]
    fn test_winsorize_caps_tail_only() {
        let mut values: Vec<f64> = (0..100).map(|v| v as f64).collect();
        values.push(1_000_000.0);
        let upper = percentile(&values, 0.99).unwrap();

        let out = winsorize(population(&values), 0.99);

        for (before, after) in values.iter().zip(&out) {
            assert!(after.total_deposit_usd <= upper);
            if *before <= upper {
                assert_eq!(after.total_deposit_usd, *before);
            } else {
                assert_eq!(after.total_deposit_usd, upper);
            }
        }
    }

    #[test]
    fn test_num_liquidations_not_winsorized() {
        let mut values: Vec<f64> = vec![0.0; 99];
        values.push(50.0);
        let out = winsorize(population(&values), 0.99);
        assert_eq!(out[99].num_liquidations, 50.0);
        assert!(out[99].total_deposit_usd < 50.0);
    }

    #[test]
    fn test_single_wallet_untouched() {
        let out = winsorize(population(&[42.0]), 0.99);
        assert_eq!(out[0].total_deposit_usd, 42.0);
    }
}
