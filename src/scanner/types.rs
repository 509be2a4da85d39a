//! Run model types
//!
//! A `Run` owns its samples, a sample owns its libraries. Everything is built
//! once by the scanner and exposed read-only afterwards.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Kind of read data a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadKind {
    /// Base or colour-space calls (csfasta, fastq, ...)
    Sequence,
    /// Quality values stored separately from the calls (qual)
    Quality,
}

impl ReadKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sequence => "sequence",
            Self::Quality => "quality",
        }
    }
}

/// A read data file discovered under the run root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadFile {
    path: PathBuf,
    kind: ReadKind,
    size: u64,
    tag: Option<String>,
}

impl ReadFile {
    pub(crate) fn new(path: PathBuf, kind: ReadKind, size: u64, tag: Option<String>) -> Self {
        Self {
            path,
            kind,
            size,
            tag,
        }
    }

    /// Path relative to the run root
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ReadKind {
        self.kind
    }

    /// Size in bytes at scan time
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read tag (e.g. `F3`, `F5`, `R1`) extracted from the file name
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

/// A grouping of reads within a sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Library {
    name: String,
    barcodes: Vec<String>,
    files: Vec<ReadFile>,
}

impl Library {
    pub(crate) fn new(name: String, barcodes: Vec<String>, mut files: Vec<ReadFile>) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Self {
            name,
            barcodes,
            files,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn barcodes(&self) -> &[String] {
        &self.barcodes
    }

    pub fn files(&self) -> &[ReadFile] {
        &self.files
    }

    /// Library name without trailing digits, used to group libraries into projects
    pub fn stem(&self) -> &str {
        let stem = self.name.trim_end_matches(|c: char| c.is_ascii_digit());
        if stem.is_empty() {
            &self.name
        } else {
            stem
        }
    }
}

/// A named subset of the run's reads, one per sample-sheet sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sample {
    name: String,
    description: Option<String>,
    expected_empty: bool,
    libraries: Vec<Library>,
    files: Vec<ReadFile>,
}

impl Sample {
    pub(crate) fn new(
        name: String,
        description: Option<String>,
        expected_empty: bool,
        libraries: Vec<Library>,
        mut files: Vec<ReadFile>,
    ) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Self {
            name,
            description,
            expected_empty,
            libraries,
            files,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// True when the sample sheet explicitly marks this sample as having no data
    pub fn expected_empty(&self) -> bool {
        self.expected_empty
    }

    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    /// Files attached directly to the sample rather than to one of its libraries
    pub fn sample_files(&self) -> &[ReadFile] {
        &self.files
    }

    /// Every file of the sample: sample-level files first, then per library
    pub fn files(&self) -> impl Iterator<Item = &ReadFile> {
        self.files
            .iter()
            .chain(self.libraries.iter().flat_map(|l| l.files.iter()))
    }

    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    pub fn total_size(&self) -> u64 {
        self.files().map(|f| f.size).sum()
    }
}

/// Run-level metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunMetadata {
    instrument: Option<String>,
    date: Option<NaiveDate>,
    fields: BTreeMap<String, String>,
}

impl RunMetadata {
    pub(crate) fn new(
        instrument: Option<String>,
        date: Option<NaiveDate>,
        fields: BTreeMap<String, String>,
    ) -> Self {
        Self {
            instrument,
            date,
            fields,
        }
    }

    pub fn instrument(&self) -> Option<&str> {
        self.instrument.as_deref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Further key/value fields, ordered by key
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// One sequencer output directory and what it contains
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    root: PathBuf,
    name: String,
    layout: String,
    sample_sheet: Option<PathBuf>,
    expects_quality: bool,
    metadata: RunMetadata,
    samples: Vec<Sample>,
    unassigned: Vec<ReadFile>,
}

impl Run {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        root: PathBuf,
        name: String,
        layout: String,
        sample_sheet: Option<PathBuf>,
        expects_quality: bool,
        metadata: RunMetadata,
        samples: Vec<Sample>,
        mut unassigned: Vec<ReadFile>,
    ) -> Self {
        unassigned.sort_by(|a, b| a.path.cmp(&b.path));
        Self {
            root,
            name,
            layout,
            sample_sheet,
            expects_quality,
            metadata,
            samples,
            unassigned,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run name (final component of the run directory)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Layout profile identifier, `name@version`
    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// Sample sheet path relative to the root; `None` when samples were inferred from files
    pub fn sample_sheet(&self) -> Option<&Path> {
        self.sample_sheet.as_deref()
    }

    /// True when the layout stores qualities in files separate from the calls
    pub fn expects_quality(&self) -> bool {
        self.expects_quality
    }

    pub fn metadata(&self) -> &RunMetadata {
        &self.metadata
    }

    /// Samples in sample-sheet order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn sample(&self, name: &str) -> Option<&Sample> {
        self.samples.iter().find(|s| s.name == name)
    }

    /// Files that matched a read pattern but belong to no sample
    pub fn unassigned(&self) -> &[ReadFile] {
        &self.unassigned
    }

    pub fn library_count(&self) -> usize {
        self.samples.iter().map(|s| s.libraries.len()).sum()
    }
}
