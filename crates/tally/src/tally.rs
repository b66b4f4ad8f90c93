// crate modules
use crate::error::Result;
use crate::metrics::{self, DerivedMetrics};

// external crates
use serde::{Deserialize, Serialize};

/// A single tally with all of its results
///
/// Results are stored in the order they were written by the transport code,
/// one [TallyRecord] per combination of filter bins.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    /// Tally number
    pub id: u32,
    /// Optional user label
    #[serde(default)]
    pub name: String,
    /// Every bin combination of the tally
    pub records: Vec<TallyRecord>,
}

impl Tally {
    /// Number of result rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the tally contains no results
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Tally result for one combination of filter bins
///
/// Only the `mean` and `std. dev.` are required. The bin identifiers are
/// optional because which of them exist depends on the filters applied to the
/// tally.
///
/// Field names follow the tabular export of the tally data, so the same
/// struct deserialises from the statepoint JSON and from CSV tables:
///
/// | Field         | Column             |
/// | ------------- | ------------------ |
/// | `cell`        | `cell`             |
/// | `nuclide`     | `nuclide`          |
/// | `score`       | `score`            |
/// | `energy_low`  | `energy low [eV]`  |
/// | `energy_high` | `energy high [eV]` |
/// | `mean`        | `mean`             |
/// | `std_dev`     | `std. dev.`        |
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyRecord {
    /// Cell filter bin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<u32>,
    /// Nuclide bin, e.g. `U235` or `total`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nuclide: Option<String>,
    /// Score, e.g. `flux` or `heating`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    /// Lower energy bound (eV)
    #[serde(
        rename = "energy low [eV]",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub energy_low: Option<f64>,
    /// Upper energy bound (eV)
    #[serde(
        rename = "energy high [eV]",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub energy_high: Option<f64>,
    /// Tally mean
    pub mean: f64,
    /// Standard deviation of the mean
    #[serde(rename = "std. dev.")]
    pub std_dev: f64,
}

impl TallyRecord {
    /// Record with no bin identifiers
    ///
    /// ```rust
    /// # use mcpost_tally::TallyRecord;
    /// let record = TallyRecord::new(100.0, 5.0);
    /// assert_eq!(record.relative_error().unwrap(), 0.05);
    /// ```
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self {
            mean,
            std_dev,
            ..Default::default()
        }
    }

    /// Relative error, `std_dev / |mean|`
    ///
    /// Fails with [Error::DivisionByZero](crate::Error::DivisionByZero) for a
    /// zero mean.
    pub fn relative_error(&self) -> Result<f64> {
        metrics::relative_error(self.mean, self.std_dev)
    }

    /// Relative error and figure of merit for a run of `runtime_minutes`
    ///
    /// ```rust
    /// # use mcpost_tally::TallyRecord;
    /// let metrics = TallyRecord::new(100.0, 5.0).metrics(10.0).unwrap();
    /// assert!((metrics.figure_of_merit - 40.0).abs() < 1e-9);
    /// ```
    pub fn metrics(&self, runtime_minutes: f64) -> Result<DerivedMetrics> {
        let relative_error = self.relative_error()?;
        let figure_of_merit = metrics::figure_of_merit(relative_error, runtime_minutes)?;
        Ok(DerivedMetrics {
            relative_error,
            figure_of_merit,
        })
    }
}
