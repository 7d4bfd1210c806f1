use crate::storage::StorageError;

/// Errors surfaced by the tracker, vault and command layers.
///
/// The prediction engine itself never fails: insufficient or noisy data
/// degrades to default values instead of producing an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("date {date} is outside the supported range 1900-01-01 to 2199-12-31")]
    DateOutOfRange { date: chrono::NaiveDate },
    #[error("invalid period: {0}")]
    InvalidPeriod(String),
    #[error("invalid lifestyle profile: {0}")]
    InvalidLifestyle(String),
    #[error("app is locked")]
    Locked,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
