//! Statistical quality metrics for tally results
//!
//! The relative error measures the precision of a result, and the figure of
//! merit folds in the cost of obtaining it:
//!
//! ```text
//! R   = σ / |x̄|
//! FOM = 1 / (R² T)
//! ```
//!
//! with `T` the runtime in minutes. For a well converged tally `R²` falls as
//! `1/T`, so the FOM should settle to a constant. Higher is better.

// crate modules
use crate::error::{Error, Result};
use crate::tally::TallyRecord;

// external crates
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Quality metrics derived from a single [TallyRecord]
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Relative error of the mean
    #[serde(rename = "RErr")]
    pub relative_error: f64,
    /// Figure of merit (1/min)
    #[serde(rename = "FOM")]
    pub figure_of_merit: f64,
}

/// Relative error of a tally mean
///
/// ```rust
/// # use mcpost_tally::metrics::relative_error;
/// assert_eq!(relative_error(100.0, 5.0).unwrap(), 0.05);
/// assert_eq!(relative_error(-100.0, 5.0).unwrap(), 0.05);
/// assert!(relative_error(0.0, 1.0).is_err());
/// ```
pub fn relative_error(mean: f64, std_dev: f64) -> Result<f64> {
    if mean == 0.0 {
        return Err(Error::DivisionByZero {
            quantity: "relative error",
            denominator: "mean",
        });
    }
    Ok((std_dev / mean).abs())
}

/// Figure of merit for a relative error and runtime in minutes
///
/// ```rust
/// # use mcpost_tally::metrics::figure_of_merit;
/// assert_eq!(figure_of_merit(0.5, 4.0).unwrap(), 1.0);
/// assert!(figure_of_merit(0.0, 4.0).is_err());
/// assert!(figure_of_merit(0.5, 0.0).is_err());
/// ```
pub fn figure_of_merit(relative_error: f64, runtime_minutes: f64) -> Result<f64> {
    if !runtime_minutes.is_finite() || runtime_minutes < 0.0 {
        return Err(Error::InvalidRuntime(runtime_minutes));
    }

    if relative_error == 0.0 {
        return Err(Error::DivisionByZero {
            quantity: "figure of merit",
            denominator: "relative error",
        });
    }

    if runtime_minutes == 0.0 {
        return Err(Error::DivisionByZero {
            quantity: "figure of merit",
            denominator: "runtime",
        });
    }

    Ok(1.0 / (relative_error * relative_error * runtime_minutes))
}

/// Metrics for every record, in order
///
/// Records are evaluated in parallel. If any record fails, the error for the
/// earliest failing record is returned so the outcome does not depend on
/// scheduling.
pub fn compute_metrics(
    records: &[TallyRecord],
    runtime_minutes: f64,
) -> Result<Vec<DerivedMetrics>> {
    records
        .par_iter()
        .map(|record| record.metrics(runtime_minutes))
        .collect::<Vec<Result<DerivedMetrics>>>()
        .into_iter()
        .collect()
}
