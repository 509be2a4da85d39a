//! Summaries and reports of scanned runs

use super::scan;
use crate::common::fixtures::{flat_run_ab, solid_run};
use runscan::report::{
    render, Anomaly, OutputDestination, ReportError, ReportFormat, ReportWriter, RunSummary,
};

#[test]
fn test_report_lists_both_samples() {
    let fixture = flat_run_ab();
    let run = scan(fixture.path()).unwrap();
    let summary = RunSummary::from_run(&run);
    assert_eq!(summary.samples, 2);
    assert_eq!(summary.files, 2);
    assert!(!summary.has_anomalies());

    for format in ReportFormat::formats() {
        let output = render(&run, &summary, format, false).unwrap();
        assert!(output.contains("A_R1.fastq"), "{} report lacks sample A", format);
        assert!(output.contains("B/B_S2_R1.fastq"), "{} report lacks sample B", format);
    }
}

#[test]
fn test_reports_are_byte_identical_across_invocations() {
    let fixture = solid_run();
    for format in ReportFormat::formats() {
        let first = {
            let run = scan(fixture.path()).unwrap();
            render(&run, &RunSummary::from_run(&run), format, true).unwrap()
        };
        let second = {
            let run = scan(fixture.path()).unwrap();
            render(&run, &RunSummary::from_run(&run), format, true).unwrap()
        };
        assert_eq!(first, second, "{} report differs between runs", format);
    }
}

#[test]
fn test_solid_summary() {
    let fixture = solid_run();
    let run = scan(fixture.path()).unwrap();
    let summary = RunSummary::from_run(&run);

    assert_eq!(summary.samples, 2);
    assert_eq!(summary.libraries, 3);
    assert_eq!(summary.files, 5);

    let jb = summary.sample("JB").unwrap();
    assert!(jb.paired_end);
    assert_eq!(jb.tags, vec!["F3", "F5"]);

    let stems: Vec<&str> = summary.projects.iter().map(|p| p.stem.as_str()).collect();
    assert_eq!(stems, vec!["KC_lib", "PB_JB"]);
    assert_eq!(summary.projects[1].libraries, vec!["PB_JB1", "PB_JB2"]);

    assert_eq!(summary.anomalies.len(), 3);
    assert_eq!(
        summary.anomalies[0],
        Anomaly::QualityMismatch {
            sample: "JB".to_string(),
            library: Some("PB_JB2".to_string()),
            sequence: 1,
            quality: 0,
        }
    );
    assert_eq!(
        summary.anomalies[1],
        Anomaly::SampleWithoutFiles {
            sample: "KC".to_string()
        }
    );
    assert!(matches!(summary.anomalies[2], Anomaly::UnassignedFile { .. }));
}

#[test]
fn test_non_text_formats_never_carry_colour() {
    let fixture = solid_run();
    let run = scan(fixture.path()).unwrap();
    let summary = RunSummary::from_run(&run);
    for format in ReportFormat::formats().filter(|f| !f.supports_color()) {
        let output = render(&run, &summary, format, true).unwrap();
        assert!(!output.contains('\x1b'), "{} report contains escapes", format);
    }
}

#[test]
fn test_unwritable_destination_is_write_error() {
    let fixture = flat_run_ab();
    let run = scan(fixture.path()).unwrap();
    let summary = RunSummary::from_run(&run);
    let content = render(&run, &summary, ReportFormat::Text, false).unwrap();

    let destination = fixture.scratch().join("no-such-dir").join("report.txt");
    let err = ReportWriter::new(OutputDestination::File(destination.clone()))
        .write(&content, &mut Vec::new())
        .unwrap_err();
    match err {
        ReportError::Write { destination: d, .. } => {
            assert_eq!(d, destination.display().to_string())
        }
        other => panic!("expected write error, got {:?}", other),
    }
}
