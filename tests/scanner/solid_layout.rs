//! SOLiD 4 layout scans

use super::scan;
use crate::common::fixtures::{solid_run, SOLID_RUN};
use chrono::NaiveDate;
use runscan::scanner::ReadKind;
use std::path::PathBuf;

#[test]
fn test_solid_run_structure() {
    let fixture = solid_run();
    let run = scan(fixture.path()).unwrap();

    assert_eq!(run.layout(), "solid4@1");
    assert!(run.expects_quality());
    assert_eq!(
        run.sample_sheet().unwrap().to_str(),
        Some(format!("{}_run_definition.txt", SOLID_RUN).as_str())
    );

    let names: Vec<&str> = run.samples().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["JB", "KC"]);
    assert_eq!(run.library_count(), 3);

    let jb = run.sample("JB").unwrap();
    assert_eq!(jb.description(), Some("pilot"));
    let libraries: Vec<&str> = jb.libraries().iter().map(|l| l.name()).collect();
    assert_eq!(libraries, vec!["PB_JB1", "PB_JB2"]);
    assert_eq!(jb.libraries()[0].barcodes(), ["1".to_string()]);
    assert_eq!(jb.libraries()[0].files().len(), 4);
    assert_eq!(jb.libraries()[1].files().len(), 1);
    assert!(jb.sample_files().is_empty());

    let kc = run.sample("KC").unwrap();
    assert_eq!(kc.file_count(), 0);
}

#[test]
fn test_solid_file_kinds_and_tags() {
    let fixture = solid_run();
    let run = scan(fixture.path()).unwrap();
    let lib1 = &run.sample("JB").unwrap().libraries()[0];

    let described: Vec<(ReadKind, Option<&str>)> =
        lib1.files().iter().map(|f| (f.kind(), f.tag())).collect();
    assert_eq!(
        described,
        vec![
            (ReadKind::Sequence, Some("F3")),
            (ReadKind::Quality, Some("F3")),
            (ReadKind::Sequence, Some("F5")),
            (ReadKind::Quality, Some("F5")),
        ]
    );
    assert!(lib1
        .files()
        .iter()
        .all(|f| f.path().starts_with("JB/results.F1B1/libraries/PB_JB1")));
}

#[test]
fn test_solid_metadata_from_run_name_and_definition() {
    let fixture = solid_run();
    let run = scan(fixture.path()).unwrap();
    let metadata = run.metadata();

    assert_eq!(metadata.instrument(), Some("solid0127"));
    assert_eq!(metadata.date(), NaiveDate::from_ymd_opt(2011, 4, 12));
    assert_eq!(metadata.get("label"), Some("FRAG_BC"));
    assert_eq!(metadata.get("runType"), Some("FRAGMENT"));
    assert_eq!(metadata.get("version"), Some("v1.3"));
}

#[test]
fn test_unknown_library_reads_are_unassigned() {
    let fixture = solid_run();
    let run = scan(fixture.path()).unwrap();

    let unassigned: Vec<PathBuf> = run
        .unassigned()
        .iter()
        .map(|f| f.path().to_path_buf())
        .collect();
    assert_eq!(
        unassigned,
        vec![PathBuf::from(format!(
            "JB/results.F1B1/libraries/PB_OLD/primary.20110413/reads/{}_PB_OLD_F3.csfasta",
            SOLID_RUN
        ))]
    );
}

#[test]
fn test_reads_below_tmp_directories_are_ignored() {
    let fixture = solid_run();
    fixture.file(
        &format!(
            "JB/results.F1B1/libraries/PB_JB2/primary.20110414.tmp/reads/{}_PB_JB2_F3.csfasta",
            SOLID_RUN
        ),
        ">partial\n",
    );
    let run = scan(fixture.path()).unwrap();

    assert_eq!(run.sample("JB").unwrap().libraries()[1].files().len(), 1);
    assert!(run
        .unassigned()
        .iter()
        .all(|f| !f.path().to_string_lossy().contains(".tmp")));
}
