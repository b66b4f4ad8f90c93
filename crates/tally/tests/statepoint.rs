//! Integration tests for the tally quality pipeline

use mcpost_tally::{
    extract_tally, read_csv, Error, Statepoint, TallyReport, TallySource, TallyTable, SIMULATION,
};
use mcpost_utils::latest_match;
use rstest::{fixture, rstest};

#[fixture]
fn statepoint() -> Statepoint {
    Statepoint::from_file("./data/statepoint.50.json").unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * b.abs().max(1.0)
}

#[rstest]
fn discover_statepoint() {
    let path = latest_match("./data", "statepoint.*.json").unwrap();
    assert!(path.ends_with("statepoint.50.json"));

    let result = latest_match("./data", "statepoint.*.h5");
    assert!(matches!(
        result,
        Err(mcpost_utils::Error::InputNotFound { .. })
    ));
}

#[rstest]
fn runtime_and_ids(statepoint: Statepoint) {
    assert_eq!(statepoint.batches, 50);
    assert_eq!(statepoint.tally_ids(), vec![2, 3, 4, 5, 9991]);
    assert_eq!(statepoint.runtime(SIMULATION).unwrap(), 600.0);
}

#[rstest]
#[case(2, 4)]
#[case(3, 2)]
#[case(4, 8)]
#[case(5, 4)]
#[case(9991, 1)]
fn extract_each_tally(statepoint: Statepoint, #[case] id: u32, #[case] n_records: usize) {
    let (records, metadata) = extract_tally(&statepoint, id, SIMULATION).unwrap();
    assert_eq!(records.len(), n_records);
    assert_eq!(metadata.runtime_minutes(), 10.0);
}

#[rstest]
#[case(0, 0.05, 40.0)]
#[case(1, 0.2, 2.5)]
#[case(2, 0.05, 40.0)]
#[case(3, 0.25, 1.6)]
fn flux_metrics(
    statepoint: Statepoint,
    #[case] row: usize,
    #[case] relative_error: f64,
    #[case] figure_of_merit: f64,
) {
    let tally = statepoint.get_tally(2).unwrap();
    let table = TallyTable::new(tally, 10.0).unwrap();
    let metrics = table.metrics()[row];

    assert!(close(metrics.relative_error, relative_error));
    assert!(close(metrics.figure_of_merit, figure_of_merit));
}

#[rstest]
fn report_shows_tail(statepoint: Statepoint) {
    let report = TallyReport::build(&statepoint, &[4, 5], SIMULATION).unwrap();

    let shield = report.get_table(4).unwrap();
    assert_eq!(shield.len(), 8);

    let text = report.to_string();
    assert!(text.contains("Tally 4 \"shield flux\" (last 6 of 8 rows)"));
    assert!(text.contains("Tally 5 \"shield heating\" (last 4 of 4 rows)"));
}

#[rstest]
fn zero_mean_tally_is_an_error(statepoint: Statepoint) {
    let result = TallyReport::build(&statepoint, &[2, 9991], SIMULATION);
    assert!(matches!(
        result,
        Err(Error::DivisionByZero {
            denominator: "mean",
            ..
        })
    ));
}

#[rstest]
fn zero_mean_tally_listed_raw(statepoint: Statepoint) {
    let report = TallyReport::build(&statepoint, &[2, 3, 4, 5], SIMULATION)
        .unwrap()
        .with_raw(&statepoint, &[9991])
        .unwrap();

    assert_eq!(report.tables().len(), 4);
    assert_eq!(report.raw_tallies()[0].records, statepoint.get_tally(9991).unwrap().records);

    let text = report.to_string();
    assert!(text.contains("Tally 9991 \"detector events\" (last 1 of 1 rows, no metrics)"));
}

#[rstest]
fn unknown_phase_is_an_error(statepoint: Statepoint) {
    let result = TallyReport::build(&statepoint, &[2], "active batches");
    assert!(matches!(result, Err(Error::MissingRuntimePhase(_))));
}

#[rstest]
fn export_and_reload(statepoint: Statepoint) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tally_3.csv");

    let tally = statepoint.get_tally(3).unwrap();
    TallyTable::new(tally, 10.0).unwrap().write_csv(&path).unwrap();

    let records = read_csv(&path).unwrap();
    assert_eq!(records, tally.records);
}
