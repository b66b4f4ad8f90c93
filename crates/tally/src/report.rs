//! Console summaries of tally quality

// crate modules
use crate::error::Result;
use crate::statepoint::{extract_tally, RunMetadata, TallySource};
use crate::table::TallyTable;
use crate::tally::{Tally, TallyRecord};
use crate::DerivedMetrics;

// mcpost modules
use mcpost_utils::{f, OptionExt, ValueExt};

// external crates
use itertools::Itertools;
use log::info;

/// Quality metrics for a selection of tallies from one run
///
/// Build one from any [TallySource] and print it:
///
/// ```rust
/// # use mcpost_tally::{Statepoint, TallyReport, SIMULATION};
/// let statepoint = Statepoint::from_json(r#"{
///     "runtime": {"simulation": 600.0},
///     "tallies": [{"id": 2, "records": [{"mean": 100.0, "std. dev.": 5.0}]}]
/// }"#).unwrap();
///
/// let report = TallyReport::build(&statepoint, &[2], SIMULATION).unwrap();
/// println!("{report}");
/// ```
///
/// Only the last few rows of each tally are printed, see
/// [with_tail()](TallyReport::with_tail). The full tables remain available
/// through [tables()](TallyReport::tables).
///
/// Tallies where the metrics are meaningless, such as event counters with a
/// zero mean, can be listed as plain records with
/// [with_raw()](TallyReport::with_raw).
#[derive(Debug)]
pub struct TallyReport {
    metadata: RunMetadata,
    tables: Vec<TallyTable>,
    raw: Vec<Tally>,
    tail: usize,
}

impl TallyReport {
    /// Extract the requested tallies and derive their metrics
    pub fn build<S>(source: &S, ids: &[u32], phase: &str) -> Result<Self>
    where
        S: TallySource + ?Sized,
    {
        let metadata = source.run_metadata(phase)?;
        info!(
            "Total {} time: {:.3} minutes",
            metadata.phase,
            metadata.runtime_minutes()
        );

        let mut tables = Vec::with_capacity(ids.len());
        for &id in ids {
            let (records, _) = extract_tally(source, id, phase)?;
            let name = &source.get_tally(id)?.name;
            tables.push(TallyTable::from_records(
                id,
                name,
                records,
                metadata.runtime_minutes(),
            )?);
        }

        Ok(Self {
            metadata,
            tables,
            raw: Vec::new(),
            tail: 6,
        })
    }

    /// Also list tallies as plain records, without metrics
    ///
    /// ```rust
    /// # use mcpost_tally::{Statepoint, TallyReport, SIMULATION};
    /// let statepoint = Statepoint::from_json(r#"{
    ///     "runtime": {"simulation": 600.0},
    ///     "tallies": [
    ///         {"id": 2, "records": [{"mean": 100.0, "std. dev.": 5.0}]},
    ///         {"id": 9991, "records": [{"mean": 0.0, "std. dev.": 0.0}]}
    ///     ]
    /// }"#).unwrap();
    ///
    /// let report = TallyReport::build(&statepoint, &[2], SIMULATION)
    ///     .unwrap()
    ///     .with_raw(&statepoint, &[9991])
    ///     .unwrap();
    ///
    /// assert_eq!(report.raw_tallies().len(), 1);
    /// ```
    pub fn with_raw<S>(mut self, source: &S, ids: &[u32]) -> Result<Self>
    where
        S: TallySource + ?Sized,
    {
        for &id in ids {
            let (records, _) = extract_tally(source, id, &self.metadata.phase)?;
            let name = source.get_tally(id)?.name.clone();
            self.raw.push(Tally { id, name, records });
        }
        Ok(self)
    }

    /// Number of trailing rows printed per tally (default 6)
    pub fn with_tail(mut self, n: usize) -> Self {
        self.tail = n;
        self
    }

    /// Timing of the run
    pub fn metadata(&self) -> &RunMetadata {
        &self.metadata
    }

    /// All tables, in the order requested
    pub fn tables(&self) -> &[TallyTable] {
        &self.tables
    }

    /// Find the table for a specific tally
    pub fn get_table(&self, id: u32) -> Option<&TallyTable> {
        self.tables.iter().find(|table| table.id == id)
    }

    /// Tallies listed without metrics, in the order requested
    pub fn raw_tallies(&self) -> &[Tally] {
        &self.raw
    }

    fn heading(with_metrics: bool) -> String {
        let mut columns = vec![
            "cell", "nuclide", "score", "E low", "E high", "mean", "std. dev.",
        ];
        if with_metrics {
            columns.extend(["RErr", "FOM"]);
        }
        columns.iter().map(|h| f!("{h:>11}")).join(" ")
    }

    fn row(record: &TallyRecord, metrics: Option<&DerivedMetrics>) -> String {
        let mut cells = vec![
            record.cell.display(),
            record.nuclide.display(),
            record.score.display(),
            record.energy_low.map(|e| e.sci(3, 2)).display(),
            record.energy_high.map(|e| e.sci(3, 2)).display(),
            record.mean.sci(4, 2),
            record.std_dev.sci(4, 2),
        ];
        if let Some(metrics) = metrics {
            cells.push(f!("{:.4}", metrics.relative_error));
            cells.push(metrics.figure_of_merit.sci(4, 2));
        }
        cells.iter().map(|cell| f!("{cell:>11}")).join(" ")
    }
}

impl std::fmt::Display for TallyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "Total {} time: {:.3} minutes",
            self.metadata.phase,
            self.metadata.runtime_minutes()
        )?;

        for table in &self.tables {
            let shown = table.len().min(self.tail);
            writeln!(f)?;
            writeln!(
                f,
                "Tally {} {:?} (last {shown} of {} rows)",
                table.id,
                table.name,
                table.len()
            )?;
            writeln!(f, "{}", Self::heading(true))?;
            for (record, metrics) in table.tail(self.tail) {
                writeln!(f, "{}", Self::row(record, Some(metrics)))?;
            }
        }

        for tally in &self.raw {
            let shown = tally.len().min(self.tail);
            writeln!(f)?;
            writeln!(
                f,
                "Tally {} {:?} (last {shown} of {} rows, no metrics)",
                tally.id,
                tally.name,
                tally.len()
            )?;
            writeln!(f, "{}", Self::heading(false))?;
            let skip = tally.len().saturating_sub(self.tail);
            for record in tally.records.iter().skip(skip) {
                writeln!(f, "{}", Self::row(record, None))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Statepoint, SIMULATION};

    const RUN: &str = r#"{
        "runtime": {"simulation": 600.0},
        "tallies": [
            {"id": 2, "name": "flux", "records": [
                {"cell": 10, "mean": 100.0, "std. dev.": 5.0},
                {"cell": 11, "mean": 50.0, "std. dev.": 10.0}
            ]},
            {"id": 7, "records": [{"mean": 0.0, "std. dev.": 0.0}]}
        ]
    }"#;

    #[test]
    fn report_for_selected_tallies() {
        let statepoint = Statepoint::from_json(RUN).unwrap();
        let report = TallyReport::build(&statepoint, &[2], SIMULATION)
            .unwrap()
            .with_tail(1);

        assert_eq!(report.metadata().runtime_minutes(), 10.0);
        assert_eq!(report.tables().len(), 1);

        let text = report.to_string();
        assert!(text.starts_with("Total simulation time: 10.000 minutes"));
        assert!(text.contains("Tally 2 \"flux\" (last 1 of 2 rows)"));
        assert!(text.contains("2.5000e+00"));
        assert!(!text.contains("4.0000e+01"));
    }

    #[test]
    fn raw_tallies_skip_metrics() {
        let statepoint = Statepoint::from_json(RUN).unwrap();
        let report = TallyReport::build(&statepoint, &[2], SIMULATION)
            .unwrap()
            .with_raw(&statepoint, &[7])
            .unwrap();

        assert_eq!(report.raw_tallies()[0].id, 7);

        let text = report.to_string();
        assert!(text.contains("Tally 7 \"\" (last 1 of 1 rows, no metrics)"));
        let raw_row = text.lines().last().unwrap();
        assert_eq!(raw_row.split_whitespace().count(), 7);
        assert!(raw_row.ends_with("0.0000e+00"));
    }

    #[test]
    fn unknown_raw_tally() {
        let statepoint = Statepoint::from_json(RUN).unwrap();
        let result = TallyReport::build(&statepoint, &[2], SIMULATION)
            .unwrap()
            .with_raw(&statepoint, &[8]);
        assert!(matches!(result, Err(Error::TallyNotFound(8))));
    }

    #[test]
    fn undefined_metrics_abort_the_report() {
        let statepoint = Statepoint::from_json(RUN).unwrap();
        let result = TallyReport::build(&statepoint, &[2, 7], SIMULATION);
        assert!(matches!(result, Err(Error::DivisionByZero { .. })));
    }
}
