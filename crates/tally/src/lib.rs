//! Tally extraction and statistical quality metrics
//!
//! Tally results from a transport run are only as useful as their
//! statistics. This crate pulls tallies out of a statepoint and derives the
//! relative error and figure of merit for every result.
//!
//! - [Statepoint] - Tallies and run timings, read from a JSON dump
//! - [TallySource] - Trait for anything else that can provide tallies
//! - [metrics] - Relative error and figure of merit calculations
//! - [TallyTable] - Records paired with their metrics, exportable to CSV
//! - [TallyReport] - Console summary of several tallies
//!
//! # Quickstart example
//!
//! ```rust, no_run
//! # use mcpost_tally::{Statepoint, TallyReport, SIMULATION};
//! # use mcpost_utils::latest_match;
//! // Use the most recent statepoint in the run directory
//! let path = latest_match("./run", "statepoint.*.json").unwrap();
//! let statepoint = Statepoint::from_file(path).unwrap();
//!
//! // Derive metrics for the flux and heating tallies
//! let report = TallyReport::build(&statepoint, &[2, 3], SIMULATION).unwrap();
//! println!("{report}");
//!
//! // Keep the full flux table for later
//! report.get_table(2).unwrap().write_csv("flux.csv").unwrap();
//! ```
//!
//! Undefined metrics are never hidden. A zero mean, zero relative error, or
//! zero runtime is an [Error::DivisionByZero] rather than an infinite or zero
//! figure of merit.

// Split into subfiles for development, but anything important is re-exported
mod error;
mod report;
mod statepoint;
mod table;
mod tally;

pub mod metrics;

// flatten public API and inline the documentation
#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use metrics::{compute_metrics, DerivedMetrics};

#[doc(inline)]
pub use report::TallyReport;

#[doc(inline)]
pub use statepoint::{extract_tally, RunMetadata, Statepoint, TallySource, SIMULATION};

#[doc(inline)]
pub use table::{read_csv, TallyTable, COLUMNS};

#[doc(inline)]
pub use tally::{Tally, TallyRecord};
