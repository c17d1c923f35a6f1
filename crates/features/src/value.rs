// crates/features/src/value.rs - USD valuation of a single event
use common::assets::scale_amount;
use common::{Event, EventAction, LiquidationLeg, NormalizedEvent};
use thiserror::Error;

/// Why an event could not be valued. Never escapes this module as a
/// failure: the caller always gets 0.0 instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("unparseable {field}: {raw:?}")]
    Unparseable { field: &'static str, raw: String },

    #[error("non-positive collateral price {0}")]
    NonPositivePrice(f64),

    #[error("negative or non-finite value {0}")]
    OutOfRange(f64),
}

impl ValueError {
    pub fn reason(&self) -> &'static str {
        match self {
            ValueError::MissingField(_) => "missing_field",
            ValueError::Unparseable { .. } => "unparseable",
            ValueError::NonPositivePrice(_) => "non_positive_price",
            ValueError::OutOfRange(_) => "out_of_range",
        }
    }
}

/// Strict valuation: `(amount / 10^decimals) * price`
pub fn try_value_usd(action: &EventAction) -> Result<f64, ValueError> {
    let value = match action {
        EventAction::LiquidationCall(LiquidationLeg::Collateral(leg)) => {
            let amount = present(leg.amount.as_deref(), "collateralAmount")?;
            let price = present(leg.price_usd.as_deref(), "collateralAssetPriceUSD")?;
            let price = parse(price, "collateralAssetPriceUSD")?;
            if !(price > 0.0) {
                return Err(ValueError::NonPositivePrice(price));
            }
            let amount = parse(amount, "collateralAmount")?;
            scale_amount(amount, leg.symbol.as_deref()) * price
        }
        EventAction::Deposit(leg)
        | EventAction::Borrow(leg)
        | EventAction::Repay(leg)
        | EventAction::RedeemUnderlying(leg)
        | EventAction::LiquidationCall(LiquidationLeg::Flat(leg))
        | EventAction::Unknown { leg, .. } => {
            let amount = present(leg.amount.as_deref(), "amount")?;
            let price = present(leg.price_usd.as_deref(), "assetPriceUSD")?;
            let amount = parse(amount, "amount")?;
            let price = parse(price, "assetPriceUSD")?;
            scale_amount(amount, leg.symbol.as_deref()) * price
        }
    };

    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ValueError::OutOfRange(value))
    }
}

/// Lenient valuation used by the pipeline: any failure degrades to 0.0
pub fn value_usd(event: &Event) -> f64 {
    match try_value_usd(&event.action) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(
                wallet = %event.wallet,
                tx_hash = event.tx_hash.as_deref().unwrap_or("-"),
                action = event.action.name(),
                reason = %e,
                "Event valued at zero"
            );
            metrics::counter!("value_fallback_total", "reason" => e.reason()).increment(1);
            0.0
        }
    }
}

/// Attach `value_usd` to every event
pub fn normalize(events: Vec<Event>) -> Vec<NormalizedEvent> {
    events
        .into_iter()
        .map(|event| {
            let value_usd = value_usd(&event);
            NormalizedEvent { event, value_usd }
        })
        .collect()
}

fn present<'a>(raw: Option<&'a str>, field: &'static str) -> Result<&'a str, ValueError> {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(ValueError::MissingField(field)),
    }
}

fn parse(raw: &str, field: &'static str) -> Result<f64, ValueError> {
    raw.parse::<f64>().map_err(|_| ValueError::Unparseable {
        field,
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{AssetLeg, CollateralLeg};

    fn leg(amount: &str, price: &str, symbol: &str) -> AssetLeg {
        AssetLeg {
            amount: Some(amount.to_string()),
            price_usd: Some(price.to_string()),
            symbol: Some(symbol.to_string()),
            embedded: true,
        }
    }

    fn collateral(amount: &str, price: &str, symbol: &str) -> EventAction {
        EventAction::LiquidationCall(LiquidationLeg::Collateral(CollateralLeg {
            amount: Some(amount.to_string()),
            price_usd: Some(price.to_string()),
            symbol: Some(symbol.to_string()),
            asset_symbol: None,
        }))
    }

    #[test]
    fn test_usdc_deposit() {
        let action = EventAction::Deposit(leg("1000000", "1.00", "USDC"));
        assert_eq!(try_value_usd(&action), Ok(1.0));
    }

    #[test]
    fn test_weth_liquidation() {
        let action = collateral("2000000000000000000", "3000", "WETH");
        assert_eq!(try_value_usd(&action), Ok(6000.0));
    }

    #[test]
    fn test_liquidation_zero_price() {
        let action = collateral("2000000000000000000", "0", "WETH");
        assert_eq!(try_value_usd(&action), Err(ValueError::NonPositivePrice(0.0)));

        let action = collateral("2000000000000000000", "-5", "WETH");
        assert!(matches!(try_value_usd(&action), Err(ValueError::NonPositivePrice(_))));
    }

    #[test]
    fn test_unknown_symbol_uses_18_decimals() {
        let action = EventAction::Borrow(leg("5000000000000000000", "2", "CRV"));
        assert_eq!(try_value_usd(&action), Ok(10.0));
    }

    #[test]
    fn test_wbtc_decimals() {
        let action = EventAction::Repay(leg("50000000", "40000", "WBTC"));
        assert_eq!(try_value_usd(&action), Ok(20000.0));
    }

    #[test]
    fn test_missing_and_malformed_fields() {
        let empty = EventAction::Deposit(leg("", "1.0", "USDC"));
        assert_eq!(try_value_usd(&empty), Err(ValueError::MissingField("amount")));

        let no_price = EventAction::Deposit(AssetLeg {
            amount: Some("10".into()),
            ..Default::default()
        });
        assert_eq!(try_value_usd(&no_price), Err(ValueError::MissingField("assetPriceUSD")));

        let garbage = EventAction::Repay(leg("12abc", "1.0", "DAI"));
        assert!(matches!(try_value_usd(&garbage), Err(ValueError::Unparseable { .. })));

        let negative = EventAction::Repay(leg("-1000000", "1.0", "USDC"));
        assert!(matches!(try_value_usd(&negative), Err(ValueError::OutOfRange(_))));
    }

    #[test]
    fn test_lenient_value_is_zero_on_failure() {
        let event = Event {
            wallet: "0xabc".into(),
            tx_hash: None,
            action: EventAction::Deposit(leg("not-a-number", "1", "USDC")),
            timestamp: chrono::DateTime::<chrono::Utc>::from_timestamp(0, 0).unwrap(),
        };
        assert_eq!(value_usd(&event), 0.0);

        let normalized = normalize(vec![event]);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].value_usd, 0.0);
    }

    #[test]
    fn test_flat_liquidation_uses_asset_fields() {
        let action = EventAction::LiquidationCall(LiquidationLeg::Flat(AssetLeg {
            amount: Some("3000000".into()),
            price_usd: Some("1".into()),
            symbol: Some("USDT".into()),
            embedded: false,
        }));
        assert_eq!(try_value_usd(&action), Ok(3.0));
    }
}
