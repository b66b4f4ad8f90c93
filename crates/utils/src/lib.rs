//! Common utilities shared by the mcpost crates
//!
//! These are left public for convenience.
//!
//! Report formatting for tally values and the discovery of simulation outputs
//! on disk are needed almost everywhere, so they live here.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod discover;
mod error;
mod option_ext;
mod value_ext;

// Flatten
pub use discover::{latest_match, matches_pattern};
pub use error::{Error, Result};
pub use option_ext::OptionExt;
pub use value_ext::ValueExt;
