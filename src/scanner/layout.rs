//! Layout profiles
//!
//! A layout profile is a named, versioned description of how one instrument
//! lays out a run directory: where the sample sheet lives and how it is
//! delimited, how run names encode metadata, and which globs find read files.
//! The scanner only ever consults profiles, so supporting a new instrument
//! layout means adding a profile (built-in or `[[layouts]]` in the config
//! file), never touching scan logic.

use crate::core::pattern_parser::{self, ExcludeMatcher, KNOWN_PLACEHOLDERS};
use crate::core::validation::{validate_delimiter, validate_glob_pattern, validate_regex};
use crate::scanner::error::{ScanError, ScanResult};
use crate::scanner::types::ReadKind;
use regex::Regex;
use serde::{Deserialize, Serialize};

fn default_version() -> u32 {
    1
}

fn default_date_format() -> String {
    "%Y%m%d".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_sample_column() -> String {
    "Sample".to_string()
}

fn default_kind() -> ReadKind {
    ReadKind::Sequence
}

/// How the sample sheet is laid out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct SheetFormat {
    /// Single field delimiter character
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Header of the sample name column; its header row starts the sample table
    #[serde(default = "default_sample_column")]
    pub sample_column: String,
    #[serde(default)]
    pub library_column: Option<String>,
    #[serde(default)]
    pub description_column: Option<String>,
    /// Column holding barcodes (several may be separated by `,`, `;` or whitespace)
    #[serde(default)]
    pub barcode_column: Option<String>,
    /// Column whose truthy value marks a sample as deliberately empty
    #[serde(default)]
    pub empty_column: Option<String>,
    #[serde(default)]
    pub comment_prefix: Option<String>,
}

impl Default for SheetFormat {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            sample_column: default_sample_column(),
            library_column: None,
            description_column: None,
            barcode_column: None,
            empty_column: None,
            comment_prefix: None,
        }
    }
}

/// Glob locating read files, relative to the run root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadPattern {
    pub pattern: String,
    #[serde(default = "default_kind")]
    pub kind: ReadKind,
}

impl ReadPattern {
    pub fn new(pattern: &str, kind: ReadKind) -> Self {
        Self {
            pattern: pattern.to_string(),
            kind,
        }
    }
}

/// Named, versioned run-directory layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct LayoutProfile {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub description: String,
    /// Glob (relative to the run root) matching the sample sheet
    #[serde(default)]
    pub sample_sheet: Option<String>,
    #[serde(default)]
    pub sheet: SheetFormat,
    /// Regex applied to the run name; named groups become metadata
    #[serde(default)]
    pub run_name_pattern: Option<String>,
    /// chrono format used to parse a `date` capture
    #[serde(default = "default_date_format")]
    pub date_format: String,
    pub reads: Vec<ReadPattern>,
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Regex with a `tag` group applied to read file names
    #[serde(default)]
    pub read_tag_pattern: Option<String>,
    /// Regex with a `sample` group used to infer samples when there is no sheet
    #[serde(default)]
    pub sample_from_file: Option<String>,
}

impl LayoutProfile {
    /// Identifier reported in the run model, `name@version`
    pub fn id(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    /// Validate the profile and compile its patterns
    pub fn compile(&self) -> ScanResult<CompiledLayout> {
        let fail = |msg: String| ScanError::configuration(format!("Layout '{}': {}", self.name, msg));

        if self.name.trim().is_empty() || self.name.contains('@') {
            return Err(ScanError::configuration(format!(
                "Layout name '{}' must be non-empty and must not contain '@'",
                self.name
            )));
        }
        if self.version == 0 {
            return Err(fail("version must be at least 1".to_string()));
        }
        if self.reads.is_empty() {
            return Err(fail("at least one read pattern is required".to_string()));
        }
        if self.sample_sheet.is_none() && self.sample_from_file.is_none() {
            return Err(fail(
                "either sample-sheet or sample-from-file must be set".to_string(),
            ));
        }
        if self.sheet.sample_column.trim().is_empty() {
            return Err(fail("sheet sample-column cannot be empty".to_string()));
        }
        if matches!(&self.sheet.comment_prefix, Some(p) if p.is_empty()) {
            return Err(fail("sheet comment-prefix cannot be empty".to_string()));
        }
        let delimiter = validate_delimiter(&self.sheet.delimiter).map_err(fail)?;

        if let Some(sheet_glob) = &self.sample_sheet {
            validate_glob_pattern(sheet_glob).map_err(fail)?;
        }

        for read in &self.reads {
            for placeholder in pattern_parser::placeholders(&read.pattern) {
                if !KNOWN_PLACEHOLDERS.contains(&placeholder.as_str()) {
                    return Err(fail(format!(
                        "unknown placeholder '{{{}}}' in read pattern '{}'",
                        placeholder, read.pattern
                    )));
                }
            }
            if pattern_parser::has_placeholder(&read.pattern, "library")
                && self.sample_sheet.is_some()
                && self.sheet.library_column.is_none()
            {
                return Err(fail(format!(
                    "read pattern '{}' uses {{library}} but the sheet has no library-column",
                    read.pattern
                )));
            }
            validate_glob_pattern(&pattern_parser::wildcard_placeholders(&read.pattern))
                .map_err(fail)?;
        }

        let exclude = ExcludeMatcher::new(&self.exclude).map_err(fail)?;
        let run_name = self
            .run_name_pattern
            .as_deref()
            .map(|p| validate_regex(p, &[]))
            .transpose()
            .map_err(fail)?;
        let read_tag = self
            .read_tag_pattern
            .as_deref()
            .map(|p| validate_regex(p, &["tag"]))
            .transpose()
            .map_err(fail)?;
        let sample_from_file = self
            .sample_from_file
            .as_deref()
            .map(|p| validate_regex(p, &["sample"]))
            .transpose()
            .map_err(fail)?;

        Ok(CompiledLayout {
            profile: self.clone(),
            delimiter,
            run_name,
            read_tag,
            sample_from_file,
            exclude,
        })
    }
}

/// A validated profile with its patterns compiled
#[derive(Debug, Clone)]
pub struct CompiledLayout {
    profile: LayoutProfile,
    delimiter: u8,
    run_name: Option<Regex>,
    read_tag: Option<Regex>,
    sample_from_file: Option<Regex>,
    exclude: ExcludeMatcher,
}

impl CompiledLayout {
    pub fn profile(&self) -> &LayoutProfile {
        &self.profile
    }

    pub fn id(&self) -> String {
        self.profile.id()
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn run_name(&self) -> Option<&Regex> {
        self.run_name.as_ref()
    }

    pub fn sample_from_file(&self) -> Option<&Regex> {
        self.sample_from_file.as_ref()
    }

    pub fn exclude(&self) -> &ExcludeMatcher {
        &self.exclude
    }

    /// True when any read pattern yields separate quality files
    pub fn expects_quality(&self) -> bool {
        self.profile
            .reads
            .iter()
            .any(|r| r.kind == ReadKind::Quality)
    }

    /// Extract the read tag from a file name
    pub fn read_tag(&self, file_name: &str) -> Option<String> {
        self.read_tag
            .as_ref()?
            .captures(file_name)?
            .name("tag")
            .map(|m| m.as_str().to_string())
    }
}

/// SOLiD 4 run layout: `<run>_run_definition.txt` plus per-sample
/// `results*/libraries/<library>/primary.*/reads` trees of csfasta/qual pairs
pub fn solid4_layout() -> LayoutProfile {
    LayoutProfile {
        name: "solid4".to_string(),
        version: 1,
        description: "SOLiD 4 run directory with run definition file".to_string(),
        sample_sheet: Some("*_run_definition.txt".to_string()),
        sheet: SheetFormat {
            delimiter: "\t".to_string(),
            sample_column: "sampleName".to_string(),
            library_column: Some("library".to_string()),
            description_column: Some("sampleDesc".to_string()),
            barcode_column: Some("barcodes".to_string()),
            empty_column: None,
            comment_prefix: None,
        },
        run_name_pattern: Some(
            r"^(?P<instrument>[^_]+)_(?P<date>\d{8})_(?P<label>.+)$".to_string(),
        ),
        date_format: default_date_format(),
        reads: vec![
            ReadPattern::new(
                "{sample}/results*/libraries/{library}/primary.*/reads/*.csfasta",
                ReadKind::Sequence,
            ),
            ReadPattern::new(
                "{sample}/results*/libraries/{library}/primary.*/reads/*.qual",
                ReadKind::Quality,
            ),
        ],
        exclude: vec!["**/*.tmp/**".to_string()],
        read_tag_pattern: Some(r"_(?P<tag>F3|F5)[_.]".to_string()),
        sample_from_file: None,
    }
}

/// Generic flat layout: `SampleSheet.csv` plus FASTQ files per sample
pub fn flat_layout() -> LayoutProfile {
    LayoutProfile {
        name: "flat".to_string(),
        version: 1,
        description: "CSV sample sheet with FASTQ files per sample".to_string(),
        sample_sheet: Some("SampleSheet.csv".to_string()),
        sheet: SheetFormat {
            delimiter: ",".to_string(),
            sample_column: "Sample".to_string(),
            library_column: Some("Library".to_string()),
            description_column: Some("Description".to_string()),
            barcode_column: Some("Barcode".to_string()),
            empty_column: Some("Empty".to_string()),
            comment_prefix: Some("#".to_string()),
        },
        run_name_pattern: None,
        date_format: default_date_format(),
        reads: vec![
            ReadPattern::new("{sample}/*.fastq", ReadKind::Sequence),
            ReadPattern::new("{sample}/*.fastq.gz", ReadKind::Sequence),
            ReadPattern::new("{sample}_*.fastq", ReadKind::Sequence),
            ReadPattern::new("{sample}_*.fastq.gz", ReadKind::Sequence),
        ],
        exclude: Vec::new(),
        read_tag_pattern: Some(r"_(?P<tag>R[12])[_.]".to_string()),
        sample_from_file: Some(r"^(?P<sample>.+?)_R[12][_.]".to_string()),
    }
}

/// Built-in profiles in the order they are tried
pub fn builtin_layouts() -> Vec<LayoutProfile> {
    vec![solid4_layout(), flat_layout()]
}

/// Ordered set of compiled layout profiles
#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    layouts: Vec<CompiledLayout>,
}

impl LayoutRegistry {
    /// Registry of the built-in profiles
    pub fn builtin() -> ScanResult<Self> {
        Self::with_configured(Vec::new())
    }

    /// Configured profiles first, then built-ins not shadowed by a configured name
    pub fn with_configured(configured: Vec<LayoutProfile>) -> ScanResult<Self> {
        let mut profiles: Vec<LayoutProfile> = Vec::new();
        for profile in configured {
            if profiles.iter().any(|p| p.name == profile.name) {
                return Err(ScanError::configuration(format!(
                    "Layout '{}' is configured more than once",
                    profile.name
                )));
            }
            profiles.push(profile);
        }
        for builtin in builtin_layouts() {
            if profiles.iter().any(|p| p.name == builtin.name) {
                log::debug!("Configured layout '{}' replaces built-in", builtin.name);
            } else {
                profiles.push(builtin);
            }
        }

        let layouts = profiles
            .iter()
            .map(LayoutProfile::compile)
            .collect::<ScanResult<Vec<_>>>()?;
        Ok(Self { layouts })
    }

    pub fn layouts(&self) -> &[CompiledLayout] {
        &self.layouts
    }

    /// Look up a profile by `name` or by its full `name@version` id
    pub fn get(&self, name: &str) -> Option<&CompiledLayout> {
        self.layouts
            .iter()
            .find(|l| l.profile.name == name || l.id() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.layouts.iter().map(|l| l.profile.name.as_str()).collect()
    }
}
