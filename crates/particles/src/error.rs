//! Result and Error types for the particles module

/// Type alias for `Result<T, particles::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for `mcpost-particles`
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Failure to serialize/deserialize a byte stream
    #[error("failed binary (de)serialization")]
    Binary(#[from] Box<bincode::ErrorKind>),

    /// Failure to serialise to a JSON string
    #[error("failed serde JSON operation")]
    Json(#[from] serde_json::Error),

    /// File does not start with the particle list magic bytes
    #[error("not a particle list file (found magic bytes {0:?})")]
    InvalidMagic([u8; 4]),

    /// Particle list written by an unknown format version
    #[error("unsupported particle list version {0}")]
    UnsupportedVersion(u32),

    /// Header metadata is larger than the file or the size limit allows
    #[error("particle list header exceeds {limit} bytes")]
    OversizedHeader { limit: u64 },

    /// The file ended part way through the particle records
    #[error("file ends at particle {index} of {expected}")]
    TruncatedRecord { index: u64, expected: u64 },

    /// Numeric record with a PDG code that is not an integer
    #[error("PDG code {0} is not an integer")]
    InvalidPdgCode(f64),

    /// A derived quantity would need a division by zero
    #[error("division by zero computing {quantity} ({denominator} is zero)")]
    DivisionByZero {
        quantity: &'static str,
        denominator: &'static str,
    },

    /// PDG code outside of the supported particle kinds
    #[error("unrecognised particle type {0}")]
    UnrecognisedParticle(i32),

    /// Name or symbol that does not correspond to a particle kind
    #[error("failed to infer particle type from \"{0}\"")]
    FailedToInferParticle(String),

    /// No re-weighting rule for a particle and the policy is to reject
    #[error("no rule for particle type {0}")]
    UnmappedParticle(i32),

    /// Progress bar could not be initialised
    #[error("progress bar failure: {0}")]
    ProgressBar(String),
}
