use std::io::Cursor;

use autocrr::reader::read_data_sets;
use autocrr::report::{self, ReportOptions};
use autocrr::{AutocrrConfig, AutocrrError, CorrelationAccumulator, DataSetReader};

fn run_text(text: &str, cfg: AutocrrConfig, opts: ReportOptions) -> autocrr::Result<String> {
    let mut acc = CorrelationAccumulator::<f64>::new(cfg)?;
    for data_set in DataSetReader::<_, f64>::new(Cursor::new(text), "pipeline") {
        acc.accumulate_single(&data_set?.samples)?;
    }
    let curve = acc.finalize();
    let mut out = Vec::new();
    report::write_text(&mut out, curve.rows(), opts)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_text_to_report() {
    let cfg = AutocrrConfig { subtract_ave: false, report_nsum: true, ..Default::default() };
    let opts = ReportOptions { rms: false, nsum: true };
    let out = run_text("1\n-1\n1\n-1\n", cfg, opts).unwrap();
    assert_eq!(out, "0 1 4\n1 -1 3\n");
}

#[test]
fn test_csv_report() {
    let sets = read_data_sets::<_, f64>(Cursor::new("# header\n1\n-1\n1\n-1\n"), "csv").unwrap();
    let cfg = AutocrrConfig { subtract_ave: false, ..Default::default() };
    let mut acc = CorrelationAccumulator::<f64>::new(cfg).unwrap();
    acc.accumulate(&sets).unwrap();

    let mut out = Vec::new();
    report::write_csv(&mut out, acc.finalize().rows(), ReportOptions { rms: false, nsum: true })
        .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "lag,c,nsum\n0,1,4\n1,-1,3\n");
}

#[test]
fn test_blank_line_starts_new_data_set() {
    // Two data sets of two samples: no pair crosses the gap.
    let cfg = AutocrrConfig { subtract_ave: false, threshold: Some(-1.0), ..Default::default() };
    let opts = ReportOptions { rms: false, nsum: true };
    let out = run_text("1\n2\n\n3\n4\n", cfg, opts).unwrap();
    // lag 0: (1 + 4 + 9 + 16) / 4, lag 1: (2 + 12) / 2
    assert_eq!(out, "0 7.5 4\n1 7 2\n");
}

#[test]
fn test_explicit_threshold_with_several_data_sets() {
    let cfg = AutocrrConfig { threshold: Some(0.2), ..Default::default() };
    let err = run_text("1\n2\n3\n\n4\n5\n", cfg, ReportOptions::default()).unwrap_err();
    assert!(matches!(err, AutocrrError::Configuration(_)), "got {err:?}");
}

#[test]
fn test_ragged_rows_are_rejected() {
    let err = run_text("1 2\n3\n", AutocrrConfig::default(), ReportOptions::default())
        .unwrap_err();
    match err {
        AutocrrError::DimensionMismatch { data_set, row, expected, found } => {
            assert_eq!((data_set, row, expected, found), (1, 2, 2, 1));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_bad_token_reports_position() {
    let err = run_text("1\n2\nabc\n", AutocrrConfig::default(), ReportOptions::default())
        .unwrap_err();
    match err {
        AutocrrError::Format { line, token, .. } => {
            assert_eq!(line, 3);
            assert_eq!(token.as_deref(), Some("abc"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(format!("{}", AutocrrError::format("x", 1, Some("q"), "bad")).contains("x"));
}
