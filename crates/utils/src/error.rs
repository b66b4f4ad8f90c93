//! Result and Error types for the utils module

use std::path::PathBuf;

/// Type alias for `Result<T, utils::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for `mcpost-utils`
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Nothing on disk matched the requested pattern
    #[error("no file matching \"{pattern}\" found in {dir:?}")]
    InputNotFound { pattern: String, dir: PathBuf },
}
