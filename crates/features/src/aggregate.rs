// crates/features/src/aggregate.rs - per-wallet statistics
use chrono::{DateTime, Utc};
use common::{ActionKind, NormalizedEvent, WalletFeatures};
use std::collections::{HashMap, HashSet};

/// Running state for one wallet while events stream past
struct WalletAccumulator {
    row: WalletFeatures,
    tx_hashes: HashSet<String>,
    assets: HashSet<String>,
    actions: HashSet<String>,
}

impl WalletAccumulator {
    fn new(wallet: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            row: WalletFeatures::new(wallet.to_string(), timestamp),
            tx_hashes: HashSet::new(),
            assets: HashSet::new(),
            actions: HashSet::new(),
        }
    }

    fn push(&mut self, normalized: &NormalizedEvent) {
        let event = &normalized.event;
        let row = &mut self.row;

        if let Some(hash) = &event.tx_hash {
            self.tx_hashes.insert(hash.clone());
        }
        if let Some(symbol) = event.action.payload_asset_symbol() {
            self.assets.insert(symbol.to_string());
        }
        self.actions.insert(event.action.name().to_string());

        row.first_transaction_date = row.first_transaction_date.min(event.timestamp);
        row.last_transaction_date = row.last_transaction_date.max(event.timestamp);

        let value = normalized.value_usd;
        match event.action.kind() {
            ActionKind::Deposit => {
                row.num_deposits += 1.0;
                row.total_deposit_usd += value;
            }
            ActionKind::Borrow => {
                row.num_borrows += 1.0;
                row.total_borrow_usd += value;
            }
            ActionKind::Repay => {
                row.num_repays += 1.0;
                row.total_repay_usd += value;
            }
            ActionKind::RedeemUnderlying => {
                row.num_redeemunderlying += 1.0;
                row.total_redeem_usd += value;
            }
            ActionKind::LiquidationCall => {
                row.num_liquidations += 1.0;
                row.total_liquidation_usd += value;
            }
            ActionKind::Unknown => {}
        }
    }

    fn finish(mut self, current_date: DateTime<Utc>) -> WalletFeatures {
        let row = &mut self.row;
        row.total_transactions = self.tx_hashes.len() as f64;
        row.num_unique_assets = self.assets.len() as f64;
        row.num_unique_actions = self.actions.len() as f64;
        row.account_age_days = whole_days(current_date - row.first_transaction_date);
        row.days_since_last_transaction = whole_days(current_date - row.last_transaction_date);
        self.row
    }
}

/// Group events by wallet.
///
/// Rows come out in first-encounter order. Recency is measured against the
/// latest timestamp of the whole event set, not the wall clock.
pub fn aggregate(events: &[NormalizedEvent]) -> Vec<WalletFeatures> {
    let Some(current_date) = events.iter().map(|e| e.event.timestamp).max() else {
        return Vec::new();
    };

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut wallets: Vec<WalletAccumulator> = Vec::new();

    for normalized in events {
        let wallet = normalized.event.wallet.as_str();
        let slot = *index.entry(wallet).or_insert_with(|| {
            wallets.push(WalletAccumulator::new(wallet, normalized.event.timestamp));
            wallets.len() - 1
        });
        wallets[slot].push(normalized);
    }

    tracing::debug!(
        "Aggregated {} events into {} wallets (reference date {})",
        events.len(),
        wallets.len(),
        current_date
    );

    wallets
        .into_iter()
        .map(|acc| acc.finish(current_date))
        .collect()
}

fn whole_days(delta: chrono::TimeDelta) -> f64 {
    delta.num_days().max(0) as f64
}
