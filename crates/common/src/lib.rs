// crates/common/src/lib.rs
pub mod assets;
pub mod config;
pub mod error;
pub mod event;
pub mod wallet;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use event::{
    ActionKind, AssetLeg, CollateralLeg, Event, EventAction, LiquidationLeg, NormalizedEvent,
    RawEvent, RecordRejection,
};
pub use wallet::{Feature, ScoredWallet, WalletFeatures};
