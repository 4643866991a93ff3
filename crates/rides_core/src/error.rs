use chrono::NaiveDate;
use thiserror::Error;

/// Invalid generator input, detected before any day is generated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("target daily mean must be a positive finite number, got {0}")]
    InvalidMean(f64),
    #[error("city catalog is empty")]
    EmptyCatalog,
    #[error("city `{city}` is invalid: {reason}")]
    InvalidCity { city: String, reason: String },
    #[error("city `{0}` is not in the catalog")]
    UnknownCity(String),
    #[error("days back must be at least 1")]
    ZeroDaysBack,
    #[error("date range out of bounds: {0}")]
    DateOutOfRange(String),
    #[error("failed to load city catalog from {path}: {reason}")]
    CatalogFile { path: String, reason: String },
}

/// A probability vector or distribution parameter that cannot be sampled.
///
/// This indicates a bug in the model constants, not bad user input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    #[error("{what} probabilities have no positive mass: {weights:?}")]
    NoMass { what: &'static str, weights: Vec<f64> },
    #[error("{what} probabilities contain a non-finite component: {weights:?}")]
    NonFinite { what: &'static str, weights: Vec<f64> },
    #[error("invalid {what} parameters: {reason}")]
    InvalidParameters { what: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("sampling invariant violated: {0}")]
    Sampling(#[from] SamplingError),
    #[error("sink failed for {date}: {source}")]
    Sink {
        date: NaiveDate,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
