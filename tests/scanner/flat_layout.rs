//! Flat layout scans

use super::scan;
use crate::common::fixtures::{flat_run_ab, flat_run_with_samples, RunFixture, FASTQ_RECORD};
use runscan::scanner::ReadKind;
use std::path::{Path, PathBuf};

#[test]
fn test_sheet_with_two_samples() {
    let fixture = flat_run_ab();
    let run = scan(fixture.path()).unwrap();

    assert_eq!(run.layout(), "flat@1");
    assert_eq!(run.name(), "run_20240102_flat");
    assert_eq!(run.root(), std::fs::canonicalize(fixture.path()).unwrap());
    assert_eq!(run.sample_sheet(), Some(Path::new("SampleSheet.csv")));

    let names: Vec<&str> = run.samples().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["A", "B"]);

    let a = run.sample("A").unwrap();
    assert_eq!(a.description(), Some("first sample"));
    let a_files: Vec<PathBuf> = a.files().map(|f| f.path().to_path_buf()).collect();
    assert_eq!(a_files, vec![PathBuf::from("A_R1.fastq")]);

    let b = run.sample("B").unwrap();
    let b_file = b.files().next().unwrap();
    assert_eq!(b_file.path(), Path::new("B/B_S2_R1.fastq"));
    assert_eq!(b_file.kind(), ReadKind::Sequence);
    assert_eq!(b_file.tag(), Some("R1"));
    assert_eq!(b_file.size(), FASTQ_RECORD.len() as u64);

    assert!(run.unassigned().is_empty());
}

#[test]
fn test_sheet_with_n_samples_yields_n_samples_with_files() {
    let fixture = flat_run_with_samples(12);
    let run = scan(fixture.path()).unwrap();

    assert_eq!(run.samples().len(), 12);
    for (i, sample) in run.samples().iter().enumerate() {
        assert_eq!(sample.name(), format!("S{:02}", i + 1));
        assert_eq!(sample.file_count(), 2);
        assert_eq!(sample.libraries().len(), 1);
        assert_eq!(sample.libraries()[0].barcodes(), [format!("ACGT{}", i + 1)]);
    }
}

#[test]
fn test_samples_inferred_without_sheet() {
    let fixture = RunFixture::new("run_20240105_nosheet");
    fixture
        .file("X_S1_R1.fastq", FASTQ_RECORD)
        .file("X_S1_R2.fastq", FASTQ_RECORD)
        .file("W_R1.fastq.gz", "")
        .file("notes.txt", "not a read file");

    let run = scan(fixture.path()).unwrap();
    assert_eq!(run.layout(), "flat@1");
    assert_eq!(run.sample_sheet(), None);
    let names: Vec<&str> = run.samples().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["W", "X_S1"]);
    assert_eq!(run.sample("X_S1").unwrap().file_count(), 2);
    assert_eq!(run.sample("W").unwrap().file_count(), 1);
}

#[test]
fn test_inferred_samples_own_the_files_they_came_from() {
    let fixture = RunFixture::new("run_20240106_lanes");
    fixture
        .file("lane1/A_R1.fastq", FASTQ_RECORD)
        .file("lane1/A_R2.fastq", FASTQ_RECORD)
        .file("B_R1.fastq", FASTQ_RECORD);

    let run = scan(fixture.path()).unwrap();
    let names: Vec<&str> = run.samples().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["B"]);
    assert!(run.samples().iter().all(|s| s.file_count() > 0));

    let unassigned: Vec<&Path> = run.unassigned().iter().map(|f| f.path()).collect();
    assert_eq!(
        unassigned,
        vec![Path::new("lane1/A_R1.fastq"), Path::new("lane1/A_R2.fastq")]
    );
}

#[test]
fn test_reads_only_in_foreign_directory_are_not_a_run() {
    let fixture = RunFixture::new("run_20240106_lane_only");
    fixture
        .file("lane1/A_R1.fastq", FASTQ_RECORD)
        .file("lane1/A_R2.fastq", FASTQ_RECORD);

    let err = scan(fixture.path()).unwrap_err();
    assert!(matches!(err, runscan::scanner::ScanError::MalformedRun { .. }));
}

#[test]
fn test_file_for_unlisted_sample_is_unassigned() {
    let fixture = flat_run_ab();
    fixture.file("Z_R1.fastq", FASTQ_RECORD);

    let run = scan(fixture.path()).unwrap();
    assert_eq!(run.samples().len(), 2);
    let unassigned: Vec<&Path> = run.unassigned().iter().map(|f| f.path()).collect();
    assert_eq!(unassigned, vec![Path::new("Z_R1.fastq")]);
}

#[test]
fn test_longer_sample_name_claims_its_files() {
    let fixture = RunFixture::new("run_20240106_prefix");
    fixture
        .file("SampleSheet.csv", "Sample\nA\nA_B\n")
        .file("A_R1.fastq", FASTQ_RECORD)
        .file("A_B_R1.fastq", FASTQ_RECORD);

    let run = scan(fixture.path()).unwrap();
    let a: Vec<&Path> = run.sample("A").unwrap().files().map(|f| f.path()).collect();
    let ab: Vec<&Path> = run.sample("A_B").unwrap().files().map(|f| f.path()).collect();
    assert_eq!(a, vec![Path::new("A_R1.fastq")]);
    assert_eq!(ab, vec![Path::new("A_B_R1.fastq")]);
}

#[test]
fn test_empty_marker_is_kept() {
    let fixture = RunFixture::new("run_20240107_empty");
    fixture
        .file("SampleSheet.csv", "Sample,Empty\nA,\nNTC,yes\n")
        .file("A_R1.fastq", FASTQ_RECORD);

    let run = scan(fixture.path()).unwrap();
    let ntc = run.sample("NTC").unwrap();
    assert!(ntc.expected_empty());
    assert_eq!(ntc.file_count(), 0);
}

#[test]
fn test_scan_is_repeatable() {
    let fixture = flat_run_with_samples(3);
    let first = scan(fixture.path()).unwrap();
    let second = scan(fixture.path()).unwrap();
    assert_eq!(first, second);
}
