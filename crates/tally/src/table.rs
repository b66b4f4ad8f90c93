//! Tabular tally results with derived metrics

// standard library
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::metrics::{compute_metrics, DerivedMetrics};
use crate::tally::{Tally, TallyRecord};

// mcpost modules
use mcpost_utils::f;

// external crates
use log::{debug, info};
use serde::Serialize;

/// Column headings of an exported table, in order
pub const COLUMNS: [&str; 9] = [
    "cell",
    "nuclide",
    "score",
    "energy low [eV]",
    "energy high [eV]",
    "mean",
    "std. dev.",
    "RErr",
    "FOM",
];

/// Columns any imported table must provide
const REQUIRED: [&str; 2] = ["mean", "std. dev."];

/// Tally records paired with their [DerivedMetrics]
///
/// Every record has exactly one set of metrics, so the table is built in one
/// go and fails as a whole if any record has undefined metrics.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TallyTable {
    /// Tally number
    pub id: u32,
    /// Tally label
    pub name: String,
    records: Vec<TallyRecord>,
    metrics: Vec<DerivedMetrics>,
}

impl TallyTable {
    /// Derive metrics for every record of a tally
    pub fn new(tally: &Tally, runtime_minutes: f64) -> Result<Self> {
        Self::from_records(tally.id, &tally.name, tally.records.clone(), runtime_minutes)
    }

    /// Derive metrics for an arbitrary set of records
    ///
    /// ```rust
    /// # use mcpost_tally::{TallyRecord, TallyTable};
    /// let records = vec![TallyRecord::new(100.0, 5.0), TallyRecord::new(50.0, 10.0)];
    /// let table = TallyTable::from_records(2, "flux", records, 10.0).unwrap();
    ///
    /// let (_, metrics) = table.rows().nth(1).unwrap();
    /// assert!((metrics.figure_of_merit - 2.5).abs() < 1e-9);
    /// ```
    pub fn from_records(
        id: u32,
        name: &str,
        records: Vec<TallyRecord>,
        runtime_minutes: f64,
    ) -> Result<Self> {
        let metrics = compute_metrics(&records, runtime_minutes)?;
        debug!("Derived metrics for {} records of tally {id}", records.len());
        Ok(Self {
            id,
            name: name.to_string(),
            records,
            metrics,
        })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if there are no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in their original order
    pub fn records(&self) -> &[TallyRecord] {
        &self.records
    }

    /// Metrics in record order
    pub fn metrics(&self) -> &[DerivedMetrics] {
        &self.metrics
    }

    /// Iterator over (record, metrics) rows
    pub fn rows(&self) -> impl Iterator<Item = (&TallyRecord, &DerivedMetrics)> {
        self.records.iter().zip(self.metrics.iter())
    }

    /// The last `n` rows, or all of them for short tables
    pub fn tail(&self, n: usize) -> impl Iterator<Item = (&TallyRecord, &DerivedMetrics)> {
        self.rows().skip(self.len().saturating_sub(n))
    }

    /// Write the table to CSV with the derived `RErr` and `FOM` columns
    ///
    /// Column headings are given by [COLUMNS]. Missing bin identifiers are
    /// left as empty fields.
    ///
    /// ```rust, no_run
    /// # use mcpost_tally::{Statepoint, TallyTable};
    /// let statepoint = Statepoint::from_file("statepoint.50.json").unwrap();
    /// let tally = statepoint.get_tally(2).unwrap();
    /// let table = TallyTable::new(tally, 10.0).unwrap();
    /// table.write_csv("tally_2.csv").unwrap();
    /// ```
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        info!("Writing tally {} to {:?}", self.id, path.as_ref());
        let file = BufWriter::new(File::create(path)?);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        writer.write_record(COLUMNS)?;
        for (record, metrics) in self.rows() {
            writer.serialize(CsvRow::new(record, metrics))?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Read tally records from a CSV table
///
/// The table must contain `mean` and `std. dev.` columns. Any bin columns
/// from [COLUMNS] are picked up when present, and anything else (an index
/// column, previously derived `RErr`/`FOM`) is ignored.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<TallyRecord>> {
    info!("Reading {:?}", path.as_ref());
    let file = BufReader::new(File::open(path)?);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    for required in REQUIRED {
        if !headers.iter().any(|h| h == required) {
            return Err(Error::SchemaMismatch(f!("missing \"{required}\" column")));
        }
    }

    let records = reader
        .deserialize::<TallyRecord>()
        .collect::<std::result::Result<Vec<TallyRecord>, csv::Error>>()?;

    debug!("Read {} records", records.len());
    Ok(records)
}

/// Flat row layout for CSV output, optional fields become empty cells
#[derive(Serialize)]
struct CsvRow<'a> {
    cell: Option<u32>,
    nuclide: Option<&'a str>,
    score: Option<&'a str>,
    energy_low: Option<f64>,
    energy_high: Option<f64>,
    mean: f64,
    std_dev: f64,
    relative_error: f64,
    figure_of_merit: f64,
}

impl<'a> CsvRow<'a> {
    fn new(record: &'a TallyRecord, metrics: &DerivedMetrics) -> Self {
        Self {
            cell: record.cell,
            nuclide: record.nuclide.as_deref(),
            score: record.score.as_deref(),
            energy_low: record.energy_low,
            energy_high: record.energy_high,
            mean: record.mean,
            std_dev: record.std_dev,
            relative_error: metrics.relative_error,
            figure_of_merit: metrics.figure_of_merit,
        }
    }
}
