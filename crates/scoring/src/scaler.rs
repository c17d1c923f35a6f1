// crates/scoring/src/scaler.rs - population min-max scaling
use common::{Feature, WalletFeatures};
use ndarray::{Array2, ArrayView1, Axis};
use ndarray_stats::QuantileExt;

/// Observed range of one column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRange {
    pub min: f64,
    pub max: f64,
}

impl ColumnRange {
    pub fn of(column: ArrayView1<'_, f64>) -> Self {
        Self {
            min: *column.min_skipnan(),
            max: *column.max_skipnan(),
        }
    }

    /// `(x - min) / (max - min)`, 0 when the column has no spread
    pub fn scale(&self, x: f64) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 { (x - self.min) / span } else { 0.0 }
    }
}

/// Wallets x features matrix; infinities and NaN become 0
pub fn feature_matrix(wallets: &[WalletFeatures], features: &[Feature]) -> Array2<f64> {
    Array2::from_shape_fn((wallets.len(), features.len()), |(i, j)| {
        let value = wallets[i].get(features[j]);
        if value.is_finite() { value } else { 0.0 }
    })
}

/// Scale every column to [0, 1] in place, returning the ranges used
pub fn min_max_scale(matrix: &mut Array2<f64>) -> Vec<ColumnRange> {
    if matrix.nrows() == 0 {
        return vec![ColumnRange { min: 0.0, max: 0.0 }; matrix.ncols()];
    }

    let ranges: Vec<ColumnRange> = matrix.axis_iter(Axis(1)).map(ColumnRange::of).collect();

    for (mut column, range) in matrix.axis_iter_mut(Axis(1)).zip(&ranges) {
        column.mapv_inplace(|x| range.scale(x));
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_columns_scaled_independently() {
        let mut m = array![[0.0, 10.0, 5.0], [5.0, 20.0, 5.0], [10.0, 30.0, 5.0]];
        let ranges = min_max_scale(&mut m);

        assert_eq!(m, array![[0.0, 0.0, 0.0], [0.5, 0.5, 0.0], [1.0, 1.0, 0.0]]);
        assert_eq!(ranges[1], ColumnRange { min: 10.0, max: 30.0 });
    }

    #[test]
    fn test_degenerate_column_is_zero() {
        let mut m = array![[3.0], [3.0]];
        min_max_scale(&mut m);
        assert_eq!(m, array![[0.0], [0.0]]);
    }

    #[test]
    fn test_empty_matrix() {
        let mut m = Array2::<f64>::zeros((0, 4));
        assert_eq!(min_max_scale(&mut m).len(), 4);
    }

    #[test]
    fn test_feature_matrix_sanitizes() {
        use chrono::{DateTime, Utc};

        let mut w = WalletFeatures::new("0x1".into(), DateTime::<Utc>::from_timestamp(0, 0).unwrap());
        w.avg_transactions_per_day = f64::INFINITY;
        w.total_deposit_usd = f64::NAN;
        w.num_repays = 3.0;

        let m = feature_matrix(
            &[w],
            &[Feature::AvgTransactionsPerDay, Feature::TotalDepositUsd, Feature::NumRepays],
        );
        assert_eq!(m, array![[0.0, 0.0, 3.0]]);
    }
}
