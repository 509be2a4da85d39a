//! Run analysis
//!
//! Derives everything the formatters print beyond the raw model: totals,
//! layout anomalies, library projects and paired-end detection. `RunSummary`
//! is a pure function of the `Run`.

use crate::scanner::types::{ReadFile, ReadKind, Run, Sample};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

/// Something about the run layout that deserves attention
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Anomaly {
    SampleWithoutFiles {
        sample: String,
    },
    LibraryWithoutFiles {
        sample: String,
        library: String,
    },
    ExpectedEmptyHasFiles {
        sample: String,
        files: usize,
    },
    QualityMismatch {
        sample: String,
        library: Option<String>,
        sequence: usize,
        quality: usize,
    },
    UnassignedFile {
        path: PathBuf,
    },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::SampleWithoutFiles { sample } => {
                write!(f, "sample '{}' has no read files", sample)
            }
            Anomaly::LibraryWithoutFiles { sample, library } => {
                write!(f, "library '{}' of sample '{}' has no read files", library, sample)
            }
            Anomaly::ExpectedEmptyHasFiles { sample, files } => write!(
                f,
                "sample '{}' is marked empty but has {} read files",
                sample, files
            ),
            Anomaly::QualityMismatch {
                sample,
                library,
                sequence,
                quality,
            } => {
                match library {
                    Some(library) => write!(f, "library '{}' of sample '{}'", library, sample)?,
                    None => write!(f, "sample '{}'", sample)?,
                }
                write!(
                    f,
                    " has {} sequence files but {} quality files",
                    sequence, quality
                )
            }
            Anomaly::UnassignedFile { path } => {
                write!(f, "read file '{}' belongs to no sample", path.display())
            }
        }
    }
}

/// Per-sample figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleSummary {
    pub name: String,
    pub libraries: usize,
    pub files: usize,
    pub bytes: u64,
    pub paired_end: bool,
    pub tags: Vec<String>,
}

/// Libraries sharing a name stem across the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub stem: String,
    pub libraries: Vec<String>,
    pub samples: Vec<String>,
}

/// Everything derived from a run for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub samples: usize,
    pub libraries: usize,
    pub files: usize,
    pub bytes: u64,
    pub per_sample: Vec<SampleSummary>,
    pub projects: Vec<Project>,
    pub anomalies: Vec<Anomaly>,
}

impl RunSummary {
    pub fn from_run(run: &Run) -> Self {
        let per_sample: Vec<SampleSummary> = run.samples().iter().map(summarise_sample).collect();
        let files = per_sample.iter().map(|s| s.files).sum();
        let bytes = per_sample.iter().map(|s| s.bytes).sum();

        Self {
            samples: run.samples().len(),
            libraries: run.library_count(),
            files,
            bytes,
            per_sample,
            projects: projects(run),
            anomalies: anomalies(run),
        }
    }

    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }

    pub fn sample(&self, name: &str) -> Option<&SampleSummary> {
        self.per_sample.iter().find(|s| s.name == name)
    }
}

fn summarise_sample(sample: &Sample) -> SampleSummary {
    let tags: BTreeSet<String> = sample
        .files()
        .filter_map(|f| f.tag().map(str::to_string))
        .collect();
    SampleSummary {
        name: sample.name().to_string(),
        libraries: sample.libraries().len(),
        files: sample.file_count(),
        bytes: sample.total_size(),
        paired_end: tags.len() >= 2,
        tags: tags.into_iter().collect(),
    }
}

fn projects(run: &Run) -> Vec<Project> {
    let mut grouped: BTreeMap<String, (Vec<String>, Vec<String>)> = BTreeMap::new();
    for sample in run.samples() {
        for library in sample.libraries() {
            let (libraries, samples) = grouped.entry(library.stem().to_string()).or_default();
            if !libraries.iter().any(|l| l == library.name()) {
                libraries.push(library.name().to_string());
            }
            if !samples.iter().any(|s| s == sample.name()) {
                samples.push(sample.name().to_string());
            }
        }
    }
    grouped
        .into_iter()
        .map(|(stem, (libraries, samples))| Project {
            stem,
            libraries,
            samples,
        })
        .collect()
}

fn count_kinds<'a>(files: impl Iterator<Item = &'a ReadFile>) -> (usize, usize) {
    files.fold((0, 0), |(seq, qual), f| match f.kind() {
        ReadKind::Sequence => (seq + 1, qual),
        ReadKind::Quality => (seq, qual + 1),
    })
}

fn anomalies(run: &Run) -> Vec<Anomaly> {
    let mut found = Vec::new();

    for sample in run.samples() {
        let file_count = sample.file_count();
        if sample.expected_empty() {
            if file_count > 0 {
                found.push(Anomaly::ExpectedEmptyHasFiles {
                    sample: sample.name().to_string(),
                    files: file_count,
                });
            }
            continue;
        }
        if file_count == 0 {
            found.push(Anomaly::SampleWithoutFiles {
                sample: sample.name().to_string(),
            });
            continue;
        }

        // Layouts whose read patterns ignore libraries leave every library empty
        let libraries_hold_files = sample.libraries().iter().any(|l| !l.files().is_empty());
        for library in sample.libraries() {
            if library.files().is_empty() {
                if !libraries_hold_files {
                    continue;
                }
                found.push(Anomaly::LibraryWithoutFiles {
                    sample: sample.name().to_string(),
                    library: library.name().to_string(),
                });
            } else if run.expects_quality() {
                let (sequence, quality) = count_kinds(library.files().iter());
                if sequence != quality {
                    found.push(Anomaly::QualityMismatch {
                        sample: sample.name().to_string(),
                        library: Some(library.name().to_string()),
                        sequence,
                        quality,
                    });
                }
            }
        }

        if run.expects_quality() && !sample.sample_files().is_empty() {
            let (sequence, quality) = count_kinds(sample.sample_files().iter());
            if sequence != quality {
                found.push(Anomaly::QualityMismatch {
                    sample: sample.name().to_string(),
                    library: None,
                    sequence,
                    quality,
                });
            }
        }
    }

    for file in run.unassigned() {
        found.push(Anomaly::UnassignedFile {
            path: file.path().to_path_buf(),
        });
    }
    found
}
