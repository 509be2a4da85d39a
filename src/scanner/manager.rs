//! Run scanner
//!
//! `RunScanner` turns a run directory into a fully populated `Run`, or fails
//! without returning anything partial. The scan is a single synchronous pass:
//!
//! 1. validate the root directory,
//! 2. pick a layout profile (forced, or the first whose sample sheet is present),
//! 3. parse the sample sheet, or infer samples from read file names,
//! 4. expand the profile's read patterns per sample and library and attribute files.

use crate::core::pattern_parser::{self, match_options};
use crate::scanner::error::{ScanError, ScanResult};
use crate::scanner::layout::{CompiledLayout, LayoutRegistry, ReadPattern};
use crate::scanner::sheet::{self, SampleSheet};
use crate::scanner::types::{Library, ReadFile, ReadKind, Run, RunMetadata, Sample};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Scans run directories using a registry of layout profiles
#[derive(Debug, Clone)]
pub struct RunScanner {
    registry: LayoutRegistry,
    forced_layout: Option<String>,
}

impl RunScanner {
    pub fn new(registry: LayoutRegistry) -> Self {
        Self {
            registry,
            forced_layout: None,
        }
    }

    /// Restrict scanning to a single named layout
    pub fn with_layout(mut self, name: impl Into<String>) -> Self {
        self.forced_layout = Some(name.into());
        self
    }

    /// Scan `path` and build the run model
    pub fn scan(&self, path: &Path) -> ScanResult<Run> {
        let root = validate_root(path)?;
        let run_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        log::debug!("Scanning run '{}' at {}", run_name, root.display());

        let candidates = self.candidate_layouts()?;
        let (layout, source) = select_layout(&root, &candidates)?;
        log::debug!("Selected layout {}", layout.id());

        let metadata = run_metadata(&run_name, layout, source.preamble());
        let mut drafts = match &source {
            SampleSource::Sheet { sheet, .. } => drafts_from_sheet(sheet),
            SampleSource::Inferred { samples } => samples.clone(),
        };

        let unassigned = attribute_files(&root, &run_name, layout, &mut drafts)?;
        let samples: Vec<Sample> = drafts.into_iter().map(SampleDraft::into_sample).collect();

        let sheet_path = match &source {
            SampleSource::Sheet { path, .. } => Some(relative_to(&root, path)),
            SampleSource::Inferred { .. } => None,
        };

        let run = Run::new(
            root,
            run_name,
            layout.id(),
            sheet_path,
            layout.expects_quality(),
            metadata,
            samples,
            unassigned,
        );
        log::info!(
            "Scanned run {} with layout {}: {} samples, {} libraries, {} unassigned files",
            run.name(),
            run.layout(),
            run.samples().len(),
            run.library_count(),
            run.unassigned().len()
        );
        Ok(run)
    }

    fn candidate_layouts(&self) -> ScanResult<Vec<&CompiledLayout>> {
        match &self.forced_layout {
            Some(name) => self
                .registry
                .get(name)
                .map(|layout| vec![layout])
                .ok_or_else(|| {
                    ScanError::configuration(format!(
                        "Unknown layout '{}' (available: {})",
                        name,
                        self.registry.names().join(", ")
                    ))
                }),
            None => Ok(self.registry.layouts().iter().collect()),
        }
    }
}

fn validate_root(path: &Path) -> ScanResult<PathBuf> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ScanError::RunNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(ScanError::io(path, e)),
    };
    if !metadata.is_dir() {
        return Err(ScanError::malformed(path, "not a directory"));
    }
    fs::canonicalize(path).map_err(|e| ScanError::io(path, e))
}

/// Where the sample list came from
#[derive(Debug)]
enum SampleSource {
    Sheet { path: PathBuf, sheet: SampleSheet },
    Inferred { samples: Vec<SampleDraft> },
}

impl SampleSource {
    fn preamble(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            SampleSource::Sheet { sheet, .. } => Some(&sheet.preamble),
            SampleSource::Inferred { .. } => None,
        }
    }
}

fn select_layout<'a>(
    root: &Path,
    candidates: &[&'a CompiledLayout],
) -> ScanResult<(&'a CompiledLayout, SampleSource)> {
    for &layout in candidates {
        let Some(sheet_glob) = layout.profile().sample_sheet.as_deref() else {
            continue;
        };
        let mut sheets = glob_files(root, sheet_glob)?;
        match sheets.len() {
            0 => log::debug!("Layout {}: no sample sheet matching '{}'", layout.id(), sheet_glob),
            1 => {
                let (sheet_path, _) = sheets.remove(0);
                let sheet_path = root.join(sheet_path);
                log::debug!("Layout {}: sample sheet {}", layout.id(), sheet_path.display());
                let sheet = sheet::read_sample_sheet(&sheet_path, layout)?;
                return Ok((
                    layout,
                    SampleSource::Sheet {
                        path: sheet_path,
                        sheet,
                    },
                ));
            }
            _ => {
                let names: Vec<String> = sheets
                    .iter()
                    .map(|(p, _)| p.display().to_string())
                    .collect();
                return Err(ScanError::malformed(
                    root,
                    format!(
                        "ambiguous sample sheet for layout {}: {}",
                        layout.id(),
                        names.join(", ")
                    ),
                ));
            }
        }
    }

    for &layout in candidates {
        if let Some(samples) = infer_samples(root, layout)? {
            log::debug!(
                "Layout {}: inferred {} samples from read files",
                layout.id(),
                samples.len()
            );
            return Ok((layout, SampleSource::Inferred { samples }));
        }
    }

    let tried: Vec<String> = candidates.iter().map(|l| l.id()).collect();
    Err(ScanError::malformed(
        root,
        format!(
            "no recognizable sample sheet or read files (layouts tried: {})",
            tried.join(", ")
        ),
    ))
}

#[derive(Debug, Clone)]
struct LibraryDraft {
    name: String,
    barcodes: Vec<String>,
    files: Vec<ReadFile>,
}

#[derive(Debug, Clone)]
struct SampleDraft {
    name: String,
    description: Option<String>,
    empty: bool,
    libraries: Vec<LibraryDraft>,
    files: Vec<ReadFile>,
}

impl SampleDraft {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            empty: false,
            libraries: Vec::new(),
            files: Vec::new(),
        }
    }

    fn into_sample(self) -> Sample {
        let libraries = self
            .libraries
            .into_iter()
            .map(|l| Library::new(l.name, l.barcodes, l.files))
            .collect();
        Sample::new(self.name, self.description, self.empty, libraries, self.files)
    }
}

// Rows naming the same sample merge; order follows first appearance
fn drafts_from_sheet(sheet: &SampleSheet) -> Vec<SampleDraft> {
    let mut drafts: Vec<SampleDraft> = Vec::new();
    for row in &sheet.rows {
        let index = match drafts.iter().position(|d| d.name == row.sample) {
            Some(index) => index,
            None => {
                drafts.push(SampleDraft::new(&row.sample));
                drafts.len() - 1
            }
        };
        let draft = &mut drafts[index];
        if draft.description.is_none() {
            draft.description = row.description.clone();
        }
        draft.empty |= row.empty;

        if let Some(library) = &row.library {
            let lib_index = match draft.libraries.iter().position(|l| l.name == *library) {
                Some(i) => i,
                None => {
                    draft.libraries.push(LibraryDraft {
                        name: library.clone(),
                        barcodes: Vec::new(),
                        files: Vec::new(),
                    });
                    draft.libraries.len() - 1
                }
            };
            let lib = &mut draft.libraries[lib_index];
            for barcode in &row.barcodes {
                if !lib.barcodes.contains(barcode) {
                    lib.barcodes.push(barcode.clone());
                }
            }
        }
    }
    drafts
}

fn run_metadata(
    run_name: &str,
    layout: &CompiledLayout,
    preamble: Option<&BTreeMap<String, String>>,
) -> RunMetadata {
    let mut instrument = None;
    let mut date = None;
    let mut fields = BTreeMap::new();

    if let Some(re) = layout.run_name() {
        match re.captures(run_name) {
            Some(caps) => {
                for name in re.capture_names().flatten() {
                    let Some(value) = caps.name(name).map(|m| m.as_str()) else {
                        continue;
                    };
                    match name {
                        "instrument" => instrument = Some(value.to_string()),
                        "date" => match NaiveDate::parse_from_str(value, &layout.profile().date_format) {
                            Ok(parsed) => date = Some(parsed),
                            Err(e) => {
                                log::warn!("Run date '{}' does not parse: {}", value, e);
                                fields.insert(name.to_string(), value.to_string());
                            }
                        },
                        _ => {
                            fields.insert(name.to_string(), value.to_string());
                        }
                    }
                }
            }
            None => log::debug!("Run name '{}' does not match layout run name pattern", run_name),
        }
    }

    if let Some(preamble) = preamble {
        for (key, value) in preamble {
            fields.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    RunMetadata::new(instrument, date, fields)
}

/// Which sample (and optionally library) a file was attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Claim {
    weight: usize,
    sample: usize,
    library: Option<usize>,
    kind: ReadKind,
}

impl Claim {
    // More literal text wins; ties go to the earlier sheet position
    fn beats(&self, other: &Claim) -> bool {
        self.weight > other.weight
            || (self.weight == other.weight
                && (self.sample, self.library) < (other.sample, other.library))
    }
}

fn attribute_files(
    root: &Path,
    run_name: &str,
    layout: &CompiledLayout,
    drafts: &mut [SampleDraft],
) -> ScanResult<Vec<ReadFile>> {
    let mut claims: BTreeMap<PathBuf, (Claim, u64)> = BTreeMap::new();

    for read in &layout.profile().reads {
        let uses_library = pattern_parser::has_placeholder(&read.pattern, "library");
        for (sample_index, draft) in drafts.iter().enumerate() {
            let mut targets: Vec<(Option<usize>, Vec<(&str, &str)>)> = Vec::new();
            if uses_library {
                for (lib_index, lib) in draft.libraries.iter().enumerate() {
                    targets.push((
                        Some(lib_index),
                        vec![
                            ("run", run_name),
                            ("sample", draft.name.as_str()),
                            ("library", lib.name.as_str()),
                        ],
                    ));
                }
            } else {
                targets.push((None, vec![("run", run_name), ("sample", draft.name.as_str())]));
            }

            for (library, values) in targets {
                let pattern = pattern_parser::expand_placeholders(&read.pattern, &values);
                let claim = Claim {
                    weight: pattern_parser::literal_weight(&read.pattern, &values),
                    sample: sample_index,
                    library,
                    kind: read.kind,
                };
                for (relative, size) in glob_files(root, &pattern)? {
                    if layout.exclude().is_excluded(&relative) {
                        continue;
                    }
                    let replace = claims
                        .get(&relative)
                        .map_or(true, |(existing, _)| claim.beats(existing));
                    if replace {
                        claims.insert(relative, (claim, size));
                    }
                }
            }
        }
    }

    for (relative, (claim, size)) in claims.iter() {
        let file = make_read_file(layout, relative.clone(), claim.kind, *size);
        let draft = &mut drafts[claim.sample];
        match claim.library {
            Some(lib_index) => draft.libraries[lib_index].files.push(file),
            None => draft.files.push(file),
        }
    }

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut unassigned = Vec::new();
    for read in &layout.profile().reads {
        for (relative, size) in wildcard_matches(root, layout, read)? {
            if claims.contains_key(&relative) || !seen.insert(relative.clone()) {
                continue;
            }
            log::debug!("Unassigned read file {}", relative.display());
            unassigned.push(make_read_file(layout, relative, read.kind, size));
        }
    }
    Ok(unassigned)
}

fn infer_samples(root: &Path, layout: &CompiledLayout) -> ScanResult<Option<Vec<SampleDraft>>> {
    let Some(sample_re) = layout.sample_from_file() else {
        return Ok(None);
    };

    let mut names: Vec<String> = Vec::new();
    for read in &layout.profile().reads {
        for (relative, _) in wildcard_matches(root, layout, read)? {
            let Some(file_name) = relative.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(sample) = sample_re.captures(file_name).and_then(|c| c.name("sample")) else {
                continue;
            };
            let sample = sample.as_str();
            // The name must own the file it came from under this pattern
            if !pattern_parser::matches_expanded(&read.pattern, &[("sample", sample)], &relative) {
                log::debug!(
                    "Sample '{}' from {} does not match '{}'",
                    sample,
                    relative.display(),
                    read.pattern
                );
                continue;
            }
            if !names.iter().any(|n| n == sample) {
                names.push(sample.to_string());
            }
        }
    }

    if names.is_empty() {
        return Ok(None);
    }
    names.sort();
    Ok(Some(names.iter().map(|n| SampleDraft::new(n)).collect()))
}

fn wildcard_matches(
    root: &Path,
    layout: &CompiledLayout,
    read: &ReadPattern,
) -> ScanResult<Vec<(PathBuf, u64)>> {
    let pattern = pattern_parser::wildcard_placeholders(&read.pattern);
    Ok(glob_files(root, &pattern)?
        .into_iter()
        .filter(|(relative, _)| !layout.exclude().is_excluded(relative))
        .collect())
}

fn make_read_file(layout: &CompiledLayout, relative: PathBuf, kind: ReadKind, size: u64) -> ReadFile {
    let tag = relative
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| layout.read_tag(n));
    ReadFile::new(relative, kind, size, tag)
}

/// Regular files matching `relative_pattern` under `root`, as (relative path, size)
fn glob_files(root: &Path, relative_pattern: &str) -> ScanResult<Vec<(PathBuf, u64)>> {
    let pattern = pattern_parser::rooted_pattern(root, relative_pattern)
        .map_err(|reason| ScanError::malformed(root, reason))?;
    let paths = glob::glob_with(&pattern, match_options())
        .map_err(|e| ScanError::configuration(format!("Invalid pattern '{}': {}", pattern, e)))?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            ScanError::io(path, std::io::Error::from(e))
        })?;
        let metadata = fs::metadata(&path).map_err(|e| ScanError::io(&path, e))?;
        if metadata.is_file() {
            files.push((relative_to(root, &path), metadata.len()));
        }
    }
    files.sort();
    Ok(files)
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
