// crates/adapters/src/lib.rs
use common::*;
use serde_json::Value;

pub mod loader;
pub mod writer;

pub use loader::{load_events, open_source, parse_records, JsonFileSource, LoadReport, ZipArchiveSource};
pub use writer::{write_json, write_scores};

/// Source of raw ledger records
pub trait EventSource {
    /// Human readable origin, used in logs
    fn describe(&self) -> String;

    /// Read every record as untyped JSON, valid or not
    fn read_raw(&self) -> Result<Vec<Value>>;
}
