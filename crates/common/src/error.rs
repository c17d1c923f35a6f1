// crates/common/src/error.rs
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Errors that abort a run before any output is produced
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::Serialization(_)
                | Error::Archive(_)
                | Error::NotFound(_)
                | Error::Config(_)
                | Error::InvalidData(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_errors_are_fatal() {
        let missing = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(missing.is_fatal());
        assert!(Error::NotFound("data.json".into()).is_fatal());
        let csv_err = Error::from(csv::Error::from(std::io::Error::other("disk full")));
        assert!(!csv_err.is_fatal());
    }
}
