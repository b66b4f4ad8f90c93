//! Result and Error types for the tally module

/// Type alias for `Result<T, tally::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for `mcpost-tally`
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Malformed JSON, as opposed to valid JSON with missing fields
    #[error("failed serde JSON operation")]
    Json(#[from] serde_json::Error),

    /// Failure reading or writing a tally table
    #[error("failed CSV operation")]
    Csv(#[from] csv::Error),

    /// A derived quantity would need a division by zero
    #[error("division by zero computing {quantity} ({denominator} is zero)")]
    DivisionByZero {
        quantity: &'static str,
        denominator: &'static str,
    },

    /// Runtimes must be positive and finite
    #[error("invalid runtime of {0} minutes")]
    InvalidRuntime(f64),

    /// Requested tally is not in the source
    #[error("tally {0} not found")]
    TallyNotFound(u32),

    /// Requested runtime phase is not recorded in the source
    #[error("runtime phase \"{0}\" not recorded")]
    MissingRuntimePhase(String),

    /// A record or document lacks a field the metrics depend on
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
}
