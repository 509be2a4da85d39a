//! Layout profiles supplied through configuration

use crate::common::fixtures::{RunFixture, FASTQ_RECORD};
use runscan::scanner::{LayoutProfile, LayoutRegistry, RunScanner};

const NEXTSEQ: &str = r#"
name = "nextseq"
version = 2
description = "NextSeq style run"
sample-sheet = "samples.tsv"
run-name-pattern = '^(?P<date>\d{6})_(?P<instrument>[^_]+)_.*$'
date-format = "%y%m%d"
reads = [{ pattern = "Data/{sample}_S*_R?_001.fastq.gz" }]
read-tag-pattern = '_(?P<tag>R[12])_'

[sheet]
delimiter = "\t"
sample-column = "Sample_ID"
description-column = "Description"
"#;

fn nextseq_profile() -> LayoutProfile {
    toml::from_str(NEXTSEQ).unwrap()
}

#[test]
fn test_configured_profile_drives_the_scan() {
    let fixture = RunFixture::new("240315_NB501234_0042_AHXYZ");
    fixture
        .file("samples.tsv", "Sample_ID\tDescription\nN1\tliver\nN2\tlung\n")
        .file("Data/N1_S1_R1_001.fastq.gz", FASTQ_RECORD)
        .file("Data/N1_S1_R2_001.fastq.gz", FASTQ_RECORD)
        .file("Data/N2_S2_R1_001.fastq.gz", FASTQ_RECORD);

    let registry = LayoutRegistry::with_configured(vec![nextseq_profile()]).unwrap();
    let run = RunScanner::new(registry).scan(fixture.path()).unwrap();

    assert_eq!(run.layout(), "nextseq@2");
    assert_eq!(run.metadata().instrument(), Some("NB501234"));
    assert_eq!(
        run.metadata().date(),
        chrono::NaiveDate::from_ymd_opt(2024, 3, 15)
    );
    assert_eq!(run.sample("N1").unwrap().description(), Some("liver"));
    assert_eq!(run.sample("N1").unwrap().file_count(), 2);
    assert_eq!(run.sample("N2").unwrap().file_count(), 1);
    let tags: Vec<Option<&str>> = run.sample("N1").unwrap().files().map(|f| f.tag()).collect();
    assert_eq!(tags, vec![Some("R1"), Some("R2")]);
}

#[test]
fn test_configured_profile_is_tried_before_builtins() {
    let fixture = RunFixture::new("run_20240101_both");
    fixture
        .file("samples.tsv", "Sample_ID\nN1\n")
        .file("SampleSheet.csv", "Sample\nA\n")
        .file("Data/N1_S1_R1_001.fastq.gz", FASTQ_RECORD);

    let builtin = RunScanner::new(LayoutRegistry::builtin().unwrap())
        .scan(fixture.path())
        .unwrap();
    assert_eq!(builtin.layout(), "flat@1");

    let registry = LayoutRegistry::with_configured(vec![nextseq_profile()]).unwrap();
    let configured = RunScanner::new(registry).scan(fixture.path()).unwrap();
    assert_eq!(configured.layout(), "nextseq@2");
}

#[test]
fn test_configured_profile_replaces_builtin_of_same_name() {
    let mut flat = nextseq_profile();
    flat.name = "flat".to_string();
    flat.version = 7;
    let registry = LayoutRegistry::with_configured(vec![flat]).unwrap();
    assert_eq!(registry.names(), vec!["flat", "solid4"]);
    assert_eq!(registry.get("flat").unwrap().id(), "flat@7");
}
