// crates/common/src/wallet.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric wallet feature, one column of the feature table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    TotalTransactions,
    NumDeposits,
    NumBorrows,
    NumRepays,
    NumRedeemUnderlying,
    NumLiquidations,
    TotalDepositUsd,
    TotalBorrowUsd,
    TotalRepayUsd,
    TotalRedeemUsd,
    TotalLiquidationUsd,
    NumUniqueAssets,
    AccountAgeDays,
    DaysSinceLastTransaction,
    RepayToBorrowRatio,
    LiquidationValueToBorrowValueRatio,
    LiquidationCallsPerTransactionRatio,
    DepositUtilizationRatio,
    NumUniqueActions,
    AvgTransactionsPerDay,
}

impl Feature {
    /// Columns fed to the scorer, in model order
    pub const SCORING: [Feature; 20] = [
        Feature::TotalTransactions,
        Feature::NumDeposits,
        Feature::NumBorrows,
        Feature::NumRepays,
        Feature::NumRedeemUnderlying,
        Feature::NumLiquidations,
        Feature::TotalDepositUsd,
        Feature::TotalBorrowUsd,
        Feature::TotalRepayUsd,
        Feature::TotalRedeemUsd,
        Feature::TotalLiquidationUsd,
        Feature::NumUniqueAssets,
        Feature::AccountAgeDays,
        Feature::DaysSinceLastTransaction,
        Feature::RepayToBorrowRatio,
        Feature::LiquidationValueToBorrowValueRatio,
        Feature::LiquidationCallsPerTransactionRatio,
        Feature::DepositUtilizationRatio,
        Feature::NumUniqueActions,
        Feature::AvgTransactionsPerDay,
    ];

    /// Heavy-tailed columns capped at the population percentile.
    /// `num_liquidations`, unique counts and recency are left alone.
    pub const HEAVY_TAILED: [Feature; 15] = [
        Feature::TotalTransactions,
        Feature::NumDeposits,
        Feature::NumBorrows,
        Feature::NumRepays,
        Feature::NumRedeemUnderlying,
        Feature::TotalDepositUsd,
        Feature::TotalBorrowUsd,
        Feature::TotalRepayUsd,
        Feature::TotalRedeemUsd,
        Feature::TotalLiquidationUsd,
        Feature::RepayToBorrowRatio,
        Feature::LiquidationValueToBorrowValueRatio,
        Feature::LiquidationCallsPerTransactionRatio,
        Feature::DepositUtilizationRatio,
        Feature::AvgTransactionsPerDay,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::TotalTransactions => "total_transactions",
            Feature::NumDeposits => "num_deposits",
            Feature::NumBorrows => "num_borrows",
            Feature::NumRepays => "num_repays",
            Feature::NumRedeemUnderlying => "num_redeemunderlying",
            Feature::NumLiquidations => "num_liquidations",
            Feature::TotalDepositUsd => "total_deposit_usd",
            Feature::TotalBorrowUsd => "total_borrow_usd",
            Feature::TotalRepayUsd => "total_repay_usd",
            Feature::TotalRedeemUsd => "total_redeem_usd",
            Feature::TotalLiquidationUsd => "total_liquidation_usd",
            Feature::NumUniqueAssets => "num_unique_assets",
            Feature::AccountAgeDays => "account_age_days",
            Feature::DaysSinceLastTransaction => "days_since_last_transaction",
            Feature::RepayToBorrowRatio => "repay_to_borrow_ratio",
            Feature::LiquidationValueToBorrowValueRatio => "liquidation_value_to_borrow_value_ratio",
            Feature::LiquidationCallsPerTransactionRatio => "liquidation_calls_per_transaction_ratio",
            Feature::DepositUtilizationRatio => "deposit_utilization_ratio",
            Feature::NumUniqueActions => "num_unique_actions",
            Feature::AvgTransactionsPerDay => "avg_transactions_per_day",
        }
    }
}

/// One row per wallet.
///
/// Counts are stored as `f64` because winsorization may cap them at a
/// fractional percentile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletFeatures {
    pub wallet: String,

    // Raw aggregates
    pub total_transactions: f64,
    pub num_deposits: f64,
    pub num_borrows: f64,
    pub num_repays: f64,
    pub num_redeemunderlying: f64,
    pub num_liquidations: f64,
    pub total_deposit_usd: f64,
    pub total_borrow_usd: f64,
    pub total_repay_usd: f64,
    pub total_redeem_usd: f64,
    pub total_liquidation_usd: f64,
    pub num_unique_assets: f64,
    pub num_unique_actions: f64,
    pub first_transaction_date: DateTime<Utc>,
    pub last_transaction_date: DateTime<Utc>,

    // Recency, relative to the latest event of the whole dataset
    pub account_age_days: f64,
    pub days_since_last_transaction: f64,

    // Derived
    pub repay_to_borrow_ratio: f64,
    pub liquidation_value_to_borrow_value_ratio: f64,
    pub liquidation_calls_per_transaction_ratio: f64,
    pub avg_transactions_per_day: f64,
    pub deposit_utilization_ratio: f64,
}

impl WalletFeatures {
    /// Empty row for a wallet first seen at `timestamp`
    pub fn new(wallet: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            wallet,
            total_transactions: 0.0,
            num_deposits: 0.0,
            num_borrows: 0.0,
            num_repays: 0.0,
            num_redeemunderlying: 0.0,
            num_liquidations: 0.0,
            total_deposit_usd: 0.0,
            total_borrow_usd: 0.0,
            total_repay_usd: 0.0,
            total_redeem_usd: 0.0,
            total_liquidation_usd: 0.0,
            num_unique_assets: 0.0,
            num_unique_actions: 0.0,
            first_transaction_date: timestamp,
            last_transaction_date: timestamp,
            account_age_days: 0.0,
            days_since_last_transaction: 0.0,
            repay_to_borrow_ratio: 0.0,
            liquidation_value_to_borrow_value_ratio: 0.0,
            liquidation_calls_per_transaction_ratio: 0.0,
            avg_transactions_per_day: 0.0,
            deposit_utilization_ratio: 0.0,
        }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::TotalTransactions => self.total_transactions,
            Feature::NumDeposits => self.num_deposits,
            Feature::NumBorrows => self.num_borrows,
            Feature::NumRepays => self.num_repays,
            Feature::NumRedeemUnderlying => self.num_redeemunderlying,
            Feature::NumLiquidations => self.num_liquidations,
            Feature::TotalDepositUsd => self.total_deposit_usd,
            Feature::TotalBorrowUsd => self.total_borrow_usd,
            Feature::TotalRepayUsd => self.total_repay_usd,
            Feature::TotalRedeemUsd => self.total_redeem_usd,
            Feature::TotalLiquidationUsd => self.total_liquidation_usd,
            Feature::NumUniqueAssets => self.num_unique_assets,
            Feature::AccountAgeDays => self.account_age_days,
            Feature::DaysSinceLastTransaction => self.days_since_last_transaction,
            Feature::RepayToBorrowRatio => self.repay_to_borrow_ratio,
            Feature::LiquidationValueToBorrowValueRatio => self.liquidation_value_to_borrow_value_ratio,
            Feature::LiquidationCallsPerTransactionRatio => self.liquidation_calls_per_transaction_ratio,
            Feature::DepositUtilizationRatio => self.deposit_utilization_ratio,
            Feature::NumUniqueActions => self.num_unique_actions,
            Feature::AvgTransactionsPerDay => self.avg_transactions_per_day,
        }
    }

    pub fn get_mut(&mut self, feature: Feature) -> &mut f64 {
        match feature {
            Feature::TotalTransactions => &mut self.total_transactions,
            Feature::NumDeposits => &mut self.num_deposits,
            Feature::NumBorrows => &mut self.num_borrows,
            Feature::NumRepays => &mut self.num_repays,
            Feature::NumRedeemUnderlying => &mut self.num_redeemunderlying,
            Feature::NumLiquidations => &mut self.num_liquidations,
            Feature::TotalDepositUsd => &mut self.total_deposit_usd,
            Feature::TotalBorrowUsd => &mut self.total_borrow_usd,
            Feature::TotalRepayUsd => &mut self.total_repay_usd,
            Feature::TotalRedeemUsd => &mut self.total_redeem_usd,
            Feature::TotalLiquidationUsd => &mut self.total_liquidation_usd,
            Feature::NumUniqueAssets => &mut self.num_unique_assets,
            Feature::AccountAgeDays => &mut self.account_age_days,
            Feature::DaysSinceLastTransaction => &mut self.days_since_last_transaction,
            Feature::RepayToBorrowRatio => &mut self.repay_to_borrow_ratio,
            Feature::LiquidationValueToBorrowValueRatio => &mut self.liquidation_value_to_borrow_value_ratio,
            Feature::LiquidationCallsPerTransactionRatio => &mut self.liquidation_calls_per_transaction_ratio,
            Feature::DepositUtilizationRatio => &mut self.deposit_utilization_ratio,
            Feature::NumUniqueActions => &mut self.num_unique_actions,
            Feature::AvgTransactionsPerDay => &mut self.avg_transactions_per_day,
        }
    }
}

/// Terminal output row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredWallet {
    #[serde(rename = "userWallet")]
    pub wallet: String,
    pub credit_score: u16,
}
