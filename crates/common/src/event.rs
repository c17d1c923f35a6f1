// crates/common/src/event.rs
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Ledger record exactly as exported by the lending protocol indexer.
///
/// Every field is optional and loosely typed; [`Event::try_from`] decides
/// whether the record is usable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default)]
    pub user_wallet: Option<Value>,
    #[serde(default)]
    pub tx_hash: Option<Value>,
    #[serde(default)]
    pub action: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub action_data: Option<Value>,

    // Flat fallbacks used when `actionData` is not an object
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default, rename = "assetPriceUSD")]
    pub asset_price_usd: Option<Value>,
    #[serde(default)]
    pub asset_symbol: Option<Value>,
}

/// Action kind without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Deposit,
    Borrow,
    Repay,
    RedeemUnderlying,
    LiquidationCall,
    Unknown,
}

impl ActionKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "deposit" => ActionKind::Deposit,
            "borrow" => ActionKind::Borrow,
            "repay" => ActionKind::Repay,
            "redeemunderlying" => ActionKind::RedeemUnderlying,
            "liquidationcall" => ActionKind::LiquidationCall,
            _ => ActionKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Deposit => "deposit",
            ActionKind::Borrow => "borrow",
            ActionKind::Repay => "repay",
            ActionKind::RedeemUnderlying => "redeemunderlying",
            ActionKind::LiquidationCall => "liquidationcall",
            ActionKind::Unknown => "unknown",
        }
    }
}

/// Amount / price / symbol triple of a reserve movement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetLeg {
    pub amount: Option<String>,
    pub price_usd: Option<String>,
    pub symbol: Option<String>,
    /// Read from an `actionData` object rather than the record's top level
    pub embedded: bool,
}

/// Collateral side of a liquidation payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollateralLeg {
    pub amount: Option<String>,
    pub price_usd: Option<String>,
    pub symbol: Option<String>,
    /// `assetSymbol` if the payload happens to carry one
    pub asset_symbol: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiquidationLeg {
    Collateral(CollateralLeg),
    /// `actionData` was not an object, only top-level fields are available
    Flat(AssetLeg),
}

/// Action with the payload shape that belongs to it
#[derive(Debug, Clone, PartialEq)]
pub enum EventAction {
    Deposit(AssetLeg),
    Borrow(AssetLeg),
    Repay(AssetLeg),
    RedeemUnderlying(AssetLeg),
    LiquidationCall(LiquidationLeg),
    Unknown { name: String, leg: AssetLeg },
}

impl EventAction {
    fn parse(name: &str, raw: &RawEvent) -> Self {
        let payload = raw.action_data.as_ref().and_then(Value::as_object);

        let asset_leg = || match payload {
            Some(obj) => AssetLeg {
                amount: field(obj, "amount"),
                price_usd: field(obj, "assetPriceUSD"),
                symbol: field(obj, "assetSymbol"),
                embedded: true,
            },
            None => AssetLeg {
                amount: raw.amount.as_ref().and_then(text),
                price_usd: raw.asset_price_usd.as_ref().and_then(text),
                symbol: raw.asset_symbol.as_ref().and_then(text),
                embedded: false,
            },
        };

        match ActionKind::from_name(name) {
            ActionKind::Deposit => EventAction::Deposit(asset_leg()),
            ActionKind::Borrow => EventAction::Borrow(asset_leg()),
            ActionKind::Repay => EventAction::Repay(asset_leg()),
            ActionKind::RedeemUnderlying => EventAction::RedeemUnderlying(asset_leg()),
            ActionKind::LiquidationCall => match payload {
                Some(obj) => EventAction::LiquidationCall(LiquidationLeg::Collateral(CollateralLeg {
                    amount: field(obj, "collateralAmount"),
                    price_usd: field(obj, "collateralAssetPriceUSD"),
                    symbol: field(obj, "collateralReserveSymbol"),
                    asset_symbol: field(obj, "assetSymbol"),
                })),
                None => EventAction::LiquidationCall(LiquidationLeg::Flat(asset_leg())),
            },
            ActionKind::Unknown => EventAction::Unknown {
                name: name.to_string(),
                leg: asset_leg(),
            },
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            EventAction::Deposit(_) => ActionKind::Deposit,
            EventAction::Borrow(_) => ActionKind::Borrow,
            EventAction::Repay(_) => ActionKind::Repay,
            EventAction::RedeemUnderlying(_) => ActionKind::RedeemUnderlying,
            EventAction::LiquidationCall(_) => ActionKind::LiquidationCall,
            EventAction::Unknown { .. } => ActionKind::Unknown,
        }
    }

    /// Action name as it appeared in the record
    pub fn name(&self) -> &str {
        match self {
            EventAction::Unknown { name, .. } => name,
            other => other.kind().as_str(),
        }
    }

    /// `assetSymbol` carried inside an `actionData` object, if any
    pub fn payload_asset_symbol(&self) -> Option<&str> {
        match self {
            EventAction::Deposit(leg)
            | EventAction::Borrow(leg)
            | EventAction::Repay(leg)
            | EventAction::RedeemUnderlying(leg)
            | EventAction::Unknown { leg, .. } => {
                leg.embedded.then_some(leg.symbol.as_deref()).flatten()
            }
            EventAction::LiquidationCall(LiquidationLeg::Collateral(leg)) => leg.asset_symbol.as_deref(),
            EventAction::LiquidationCall(LiquidationLeg::Flat(_)) => None,
        }
    }
}

/// Usable ledger event: wallet, action and timestamp are guaranteed present
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub wallet: String,
    pub tx_hash: Option<String>,
    pub action: EventAction,
    pub timestamp: DateTime<Utc>,
}

/// Event with its USD valuation attached
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEvent {
    pub event: Event,
    pub value_usd: f64,
}

/// Why a raw record was dropped before aggregation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordRejection {
    #[error("missing wallet")]
    MissingWallet,

    #[error("missing action")]
    MissingAction,

    #[error("missing timestamp")]
    MissingTimestamp,

    #[error("unparseable timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("malformed record: {0}")]
    Malformed(String),
}

impl RecordRejection {
    /// Short label for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            RecordRejection::MissingWallet => "missing_wallet",
            RecordRejection::MissingAction => "missing_action",
            RecordRejection::MissingTimestamp => "missing_timestamp",
            RecordRejection::InvalidTimestamp(_) => "invalid_timestamp",
            RecordRejection::Malformed(_) => "malformed",
        }
    }
}

impl TryFrom<Value> for RawEvent {
    type Error = RecordRejection;

    /// Anything that is not an object with the expected field shapes
    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        serde_json::from_value(value).map_err(|e| RecordRejection::Malformed(e.to_string()))
    }
}

impl TryFrom<Value> for Event {
    type Error = RecordRejection;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        Event::try_from(RawEvent::try_from(value)?)
    }
}

impl TryFrom<RawEvent> for Event {
    type Error = RecordRejection;

    fn try_from(raw: RawEvent) -> std::result::Result<Self, Self::Error> {
        let wallet = raw
            .user_wallet
            .as_ref()
            .and_then(text)
            .ok_or(RecordRejection::MissingWallet)?;
        let name = raw
            .action
            .as_ref()
            .and_then(text)
            .ok_or(RecordRejection::MissingAction)?;
        let timestamp = match raw.timestamp.as_ref() {
            None | Some(Value::Null) => return Err(RecordRejection::MissingTimestamp),
            Some(value) => parse_timestamp(value)
                .ok_or_else(|| RecordRejection::InvalidTimestamp(value.to_string()))?,
        };

        let action = EventAction::parse(&name, &raw);

        Ok(Self {
            wallet,
            tx_hash: raw.tx_hash.as_ref().and_then(text),
            action,
            timestamp,
        })
    }
}

fn field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(text)
}

/// Scalar JSON value as text; null, arrays and objects have none
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Seconds since the Unix epoch, as integer, float or numeric string
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let secs = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return DateTime::<Utc>::from_timestamp(i, 0);
            }
            n.as_f64()?
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return DateTime::<Utc>::from_timestamp(i, 0);
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };

    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    DateTime::<Utc>::from_timestamp(whole as i64, nanos)
}
