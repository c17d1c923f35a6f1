// crates/adapters/src/loader.rs
use crate::EventSource;
use common::*;
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Plain JSON file: one array of records, or a stream of objects
/// (newline-delimited or concatenated)
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventSource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read_raw(&self) -> Result<Vec<Value>> {
        let content = read_input(&self.path)?;
        parse_records(&content)
    }
}

/// Zip archive holding the JSON export.
///
/// Prefers the entry named after the archive (`data.zip` -> `data.json`),
/// otherwise takes the first `.json` entry.
pub struct ZipArchiveSource {
    path: PathBuf,
}

impl ZipArchiveSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn pick_entry(&self, names: &[String]) -> Option<String> {
        let preferred = self
            .path
            .file_stem()
            .map(|stem| format!("{}.json", stem.to_string_lossy()));

        preferred
            .and_then(|want| names.iter().find(|n| basename(n).as_deref() == Some(want.as_str())))
            .or_else(|| {
                names
                    .iter()
                    .find(|n| n.to_ascii_lowercase().ends_with(".json") && !n.ends_with('/'))
            })
            .cloned()
    }
}

impl EventSource for ZipArchiveSource {
    fn describe(&self) -> String {
        format!("{} (zip)", self.path.display())
    }

    fn read_raw(&self) -> Result<Vec<Value>> {
        let file = open_input(&self.path)?;
        let mut archive = zip::ZipArchive::new(file)?;

        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        let entry = self.pick_entry(&names).ok_or_else(|| {
            Error::NotFound(format!("no JSON entry in archive {}", self.path.display()))
        })?;
        tracing::info!("Reading {} from {}", entry, self.path.display());

        let mut content = String::new();
        archive.by_name(&entry)?.read_to_string(&mut content)?;
        parse_records(&content)
    }
}

fn basename(name: &str) -> Option<String> {
    Path::new(name)
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
}

/// Pick the source implementation from the file extension
pub fn open_source(path: &Path) -> Box<dyn EventSource> {
    let is_zip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));

    if is_zip {
        Box::new(ZipArchiveSource::new(path))
    } else {
        Box::new(JsonFileSource::new(path))
    }
}

/// Split the input into records, either one JSON array or a stream of
/// JSON values. Only input that is not JSON at all fails here; the shape
/// of each record is checked later, one record at a time.
pub fn parse_records(content: &str) -> Result<Vec<Value>> {
    let trimmed = content.trim_start_matches('\u{feff}').trim_start();
    if trimmed.is_empty() {
        return Err(Error::InvalidData("input contains no JSON".to_string()));
    }

    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    serde_json::Deserializer::from_str(trimmed)
        .into_iter::<Value>()
        .enumerate()
        .map(|(i, record)| {
            record.map_err(|e| Error::InvalidData(format!("record {}: {}", i + 1, e)))
        })
        .collect()
}

/// Events that survived validation plus what was dropped
#[derive(Debug, Default)]
pub struct LoadReport {
    pub events: Vec<Event>,
    pub records: usize,
    pub dropped: usize,
}

/// Read a source and keep only records with wallet, action and timestamp
pub fn load_events(source: &dyn EventSource) -> Result<LoadReport> {
    let raw = source.read_raw()?;
    let records = raw.len();
    tracing::info!("Loaded {} records from {}", records, source.describe());
    metrics::counter!("events_loaded_total").increment(records as u64);

    let mut report = LoadReport {
        events: Vec::with_capacity(records),
        records,
        dropped: 0,
    };

    for (i, record) in raw.into_iter().enumerate() {
        match Event::try_from(record) {
            Ok(event) => report.events.push(event),
            Err(rejection) => {
                tracing::debug!(record = i, reason = %rejection, "Dropping record");
                metrics::counter!("events_dropped_total", "reason" => rejection.reason()).increment(1);
                report.dropped += 1;
            }
        }
    }

    if report.dropped > 0 {
        tracing::warn!(
            "Dropped {} of {} records that were malformed or missing wallet, action or timestamp",
            report.dropped,
            records
        );
    }

    Ok(report)
}

fn open_input(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| missing_or_io(path, e))
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| missing_or_io(path, e))
}

fn missing_or_io(path: &Path, e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        Error::NotFound(format!("input file {}", path.display()))
    } else {
        Error::Io(e)
    }
}
