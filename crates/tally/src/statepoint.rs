//! Sources of tally data
//!
//! The transport code owns the statepoint format. Anything that can hand over
//! tallies and run timings implements [TallySource], and the rest of the crate
//! only ever talks to that trait.

// standard library
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::tally::{Tally, TallyRecord};

// external crates
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::error::Category;

/// Runtime phase covering the transport of all batches
pub const SIMULATION: &str = "simulation";

/// Anything that provides tallies and run timings
pub trait TallySource {
    /// Elapsed wall time of a run phase in seconds
    fn runtime(&self, phase: &str) -> Result<f64>;

    /// Find a tally by number
    fn get_tally(&self, id: u32) -> Result<&Tally>;

    /// Numbers of every tally available
    fn tally_ids(&self) -> Vec<u32>;

    /// Timing of a run phase as [RunMetadata]
    fn run_metadata(&self, phase: &str) -> Result<RunMetadata> {
        Ok(RunMetadata {
            phase: phase.to_string(),
            runtime_seconds: self.runtime(phase)?,
        })
    }
}

/// Timing information for a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetadata {
    /// Name of the timed phase, e.g. `simulation`
    pub phase: String,
    /// Elapsed wall time (s)
    pub runtime_seconds: f64,
}

impl RunMetadata {
    /// Elapsed wall time (min)
    ///
    /// ```rust
    /// # use mcpost_tally::RunMetadata;
    /// let metadata = RunMetadata {
    ///     phase: "simulation".to_string(),
    ///     runtime_seconds: 600.0,
    /// };
    /// assert_eq!(metadata.runtime_minutes(), 10.0);
    /// ```
    pub fn runtime_minutes(&self) -> f64 {
        self.runtime_seconds / 60.0
    }
}

/// Results of a tally along with the timing of the run that produced them
///
/// A straight pass-through of the source data, the records are not modified.
///
/// ```rust
/// # use mcpost_tally::{extract_tally, Statepoint, SIMULATION};
/// let statepoint = Statepoint::from_json(r#"{
///     "runtime": {"simulation": 600.0},
///     "tallies": [{"id": 2, "records": [{"mean": 100.0, "std. dev.": 5.0}]}]
/// }"#).unwrap();
///
/// let (records, metadata) = extract_tally(&statepoint, 2, SIMULATION).unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(metadata.runtime_minutes(), 10.0);
/// ```
pub fn extract_tally<S>(
    source: &S,
    id: u32,
    phase: &str,
) -> Result<(Vec<TallyRecord>, RunMetadata)>
where
    S: TallySource + ?Sized,
{
    let tally = source.get_tally(id)?;
    if tally.is_empty() {
        warn!("Tally {id} contains no results");
    }
    let metadata = source.run_metadata(phase)?;
    debug!(
        "Extracted {} records from tally {id}, {} runtime {:.3} min",
        tally.len(),
        metadata.phase,
        metadata.runtime_minutes()
    );
    Ok((tally.records.clone(), metadata))
}

/// Statepoint data dumped to JSON
///
/// Holds the accumulated tallies and run timings for one batch count:
///
/// ```json
/// {
///     "batches": 50,
///     "runtime": {"simulation": 600.0, "total": 612.4},
///     "tallies": [
///         {
///             "id": 2,
///             "name": "flux",
///             "records": [
///                 {"cell": 10, "score": "flux", "mean": 100.0, "std. dev.": 5.0}
///             ]
///         }
///     ]
/// }
/// ```
///
/// The whole file is read on construction and the handle closed straight
/// away.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statepoint {
    /// Number of batches accumulated
    #[serde(default)]
    pub batches: u32,
    /// Wall time per run phase (s)
    pub runtime: BTreeMap<String, f64>,
    /// Every tally in the dump
    pub tallies: Vec<Tally>,
}

impl Statepoint {
    /// Read a statepoint JSON file
    ///
    /// ```rust, no_run
    /// # use mcpost_tally::Statepoint;
    /// let statepoint = Statepoint::from_file("path/to/statepoint.50.json").unwrap();
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Reading {:?}", path.as_ref());
        let reader = BufReader::new(File::open(path)?);
        let statepoint: Self = serde_json::from_reader(reader).map_err(Self::classify)?;
        statepoint.log_summary();
        Ok(statepoint)
    }

    /// Parse statepoint JSON from a string
    pub fn from_json(s: &str) -> Result<Self> {
        let statepoint: Self = serde_json::from_str(s).map_err(Self::classify)?;
        statepoint.log_summary();
        Ok(statepoint)
    }

    /// Elapsed wall time of a run phase in seconds
    pub fn runtime(&self, phase: &str) -> Result<f64> {
        self.runtime
            .get(phase)
            .copied()
            .ok_or_else(|| Error::MissingRuntimePhase(phase.to_string()))
    }

    /// Find a specific tally
    ///
    /// ```rust
    /// # use mcpost_tally::{Statepoint, Tally};
    /// let statepoint = Statepoint {
    ///     tallies: vec![Tally { id: 104, ..Default::default() }],
    ///     ..Default::default()
    /// };
    ///
    /// assert!(statepoint.get_tally(104).is_ok());
    /// assert!(statepoint.get_tally(114).is_err());
    /// ```
    pub fn get_tally(&self, id: u32) -> Result<&Tally> {
        self.tallies
            .iter()
            .find(|tally| tally.id == id)
            .ok_or(Error::TallyNotFound(id))
    }

    // Valid JSON with missing or mistyped fields is a schema problem
    fn classify(e: serde_json::Error) -> Error {
        match e.classify() {
            Category::Data => Error::SchemaMismatch(e.to_string()),
            _ => Error::Json(e),
        }
    }

    fn log_summary(&self) {
        debug!(
            "Statepoint at {} batches with {} tallies",
            self.batches,
            self.tallies.len()
        );
    }
}

impl TallySource for Statepoint {
    fn runtime(&self, phase: &str) -> Result<f64> {
        Statepoint::runtime(self, phase)
    }

    fn get_tally(&self, id: u32) -> Result<&Tally> {
        Statepoint::get_tally(self, id)
    }

    fn tally_ids(&self) -> Vec<u32> {
        self.tallies.iter().map(|tally| tally.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "batches": 50,
        "runtime": {"simulation": 90.0},
        "tallies": [
            {"id": 3, "name": "heating", "records": [
                {"cell": 1, "score": "heating", "mean": 2.0, "std. dev.": 0.2},
                {"cell": 2, "score": "heating", "mean": 4.0, "std. dev.": 0.1}
            ]}
        ]
    }"#;

    #[test]
    fn parse_minimal() {
        let statepoint = Statepoint::from_json(MINIMAL).unwrap();
        assert_eq!(statepoint.batches, 50);
        assert_eq!(statepoint.tally_ids(), vec![3]);

        let tally = statepoint.get_tally(3).unwrap();
        assert_eq!(tally.name, "heating");
        assert_eq!(tally.records[1].cell, Some(2));
        assert_eq!(tally.records[1].nuclide, None);
        assert_eq!(tally.records[1].std_dev, 0.1);
    }

    #[test]
    fn runtime_in_minutes() {
        let statepoint = Statepoint::from_json(MINIMAL).unwrap();
        let metadata = statepoint.run_metadata(SIMULATION).unwrap();
        assert_eq!(metadata.runtime_minutes(), 1.5);
    }

    #[test]
    fn missing_phase() {
        let statepoint = Statepoint::from_json(MINIMAL).unwrap();
        assert!(matches!(
            statepoint.runtime("transport"),
            Err(Error::MissingRuntimePhase(p)) if p == "transport"
        ));
    }

    #[test]
    fn missing_tally() {
        let statepoint = Statepoint::from_json(MINIMAL).unwrap();
        assert!(matches!(
            extract_tally(&statepoint, 9, SIMULATION),
            Err(Error::TallyNotFound(9))
        ));
    }

    #[test]
    fn missing_std_dev_is_schema_mismatch() {
        let json = r#"{"runtime": {}, "tallies": [{"id": 1, "records": [{"mean": 1.0}]}]}"#;
        assert!(matches!(
            Statepoint::from_json(json),
            Err(Error::SchemaMismatch(_))
        ));
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            Statepoint::from_json("{\"runtime\": "),
            Err(Error::Json(_))
        ));
    }
}
