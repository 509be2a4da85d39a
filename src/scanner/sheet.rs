//! Sample sheet parsing
//!
//! A sheet is a delimited text file. Rows before the header row (the row
//! containing the configured sample column) are preamble: they are read as
//! pairs of key row and value row and become run metadata. Rows after the
//! header describe one sample/library combination each.

use crate::scanner::error::{ScanError, ScanResult};
use crate::scanner::layout::{CompiledLayout, SheetFormat};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One sample table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub sample: String,
    pub library: Option<String>,
    pub description: Option<String>,
    pub barcodes: Vec<String>,
    pub empty: bool,
}

/// Parsed sample sheet
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SampleSheet {
    pub rows: Vec<SheetRow>,
    pub preamble: BTreeMap<String, String>,
}

/// Open and parse the sample sheet at `path` using the layout's sheet format
pub fn read_sample_sheet(path: &Path, layout: &CompiledLayout) -> ScanResult<SampleSheet> {
    let file = File::open(path).map_err(|e| ScanError::io(path, e))?;
    parse_sample_sheet(file, path, &layout.profile().sheet, layout.delimiter())
}

/// Parse a sample sheet from any reader; `path` is used for error context only
pub fn parse_sample_sheet<R: Read>(
    reader: R,
    path: &Path,
    format: &SheetFormat,
    delimiter: u8,
) -> ScanResult<SampleSheet> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut preamble_rows: Vec<Vec<String>> = Vec::new();
    let mut columns: Option<SheetColumns> = None;
    let mut rows = Vec::new();

    for (index, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|e| csv_error(path, e))?;
        let fields: Vec<String> = record.iter().map(|f| f.to_string()).collect();

        if fields.iter().all(|f| f.is_empty()) || is_comment(&fields, format) {
            continue;
        }

        match &columns {
            None => {
                if fields.iter().any(|f| *f == format.sample_column) {
                    log::debug!("Sample table header at line {}", index + 1);
                    columns = Some(SheetColumns::from_header(&fields, format));
                } else {
                    preamble_rows.push(fields);
                }
            }
            Some(cols) => {
                if let Some(row) = cols.row(&fields, path, index + 1)? {
                    rows.push(row);
                }
            }
        }
    }

    if columns.is_none() {
        return Err(ScanError::malformed(
            path,
            format!(
                "sample sheet has no '{}' column header",
                format.sample_column
            ),
        ));
    }
    if rows.is_empty() {
        return Err(ScanError::malformed(path, "sample sheet lists no samples"));
    }

    Ok(SampleSheet {
        rows,
        preamble: preamble_metadata(&preamble_rows),
    })
}

fn csv_error(path: &Path, error: csv::Error) -> ScanError {
    if error.is_io_error() {
        match error.into_kind() {
            csv::ErrorKind::Io(io) => ScanError::io(path, io),
            other => ScanError::malformed(path, format!("unreadable sample sheet: {:?}", other)),
        }
    } else {
        ScanError::malformed(path, format!("unreadable sample sheet: {}", error))
    }
}

fn is_comment(fields: &[String], format: &SheetFormat) -> bool {
    match (&format.comment_prefix, fields.first()) {
        (Some(prefix), Some(first)) => first.starts_with(prefix.as_str()),
        _ => false,
    }
}

// Key row followed by value row
fn preamble_metadata(rows: &[Vec<String>]) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    for pair in rows.chunks(2) {
        match pair {
            [keys, values] => {
                for (key, value) in keys.iter().zip(values.iter()) {
                    if !key.is_empty() && !value.is_empty() {
                        metadata.insert(key.clone(), value.clone());
                    }
                }
            }
            [orphan] => log::debug!("Ignoring unpaired preamble row: {:?}", orphan),
            _ => {}
        }
    }
    metadata
}

/// Column positions resolved from the header row
#[derive(Debug)]
struct SheetColumns {
    sample: usize,
    library: Option<usize>,
    description: Option<usize>,
    barcodes: Option<usize>,
    empty: Option<usize>,
}

impl SheetColumns {
    fn from_header(header: &[String], format: &SheetFormat) -> Self {
        let find = |name: &Option<String>| {
            name.as_ref()
                .and_then(|n| header.iter().position(|h| h == n))
        };
        Self {
            sample: header
                .iter()
                .position(|h| *h == format.sample_column)
                .unwrap_or(0),
            library: find(&format.library_column),
            description: find(&format.description_column),
            barcodes: find(&format.barcode_column),
            empty: find(&format.empty_column),
        }
    }

    fn row(&self, fields: &[String], path: &Path, line: usize) -> ScanResult<Option<SheetRow>> {
        let get = |idx: Option<usize>| {
            idx.and_then(|i| fields.get(i))
                .map(|v| v.trim_matches('"').trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let sample = match get(Some(self.sample)) {
            Some(sample) => sample,
            None => {
                log::debug!("Skipping line {} without a sample name", line);
                return Ok(None);
            }
        };
        validate_name(&sample, "sample", path, line)?;
        let library = get(self.library);
        if let Some(library) = &library {
            validate_name(library, "library", path, line)?;
        }

        Ok(Some(SheetRow {
            sample,
            library,
            description: get(self.description),
            barcodes: get(self.barcodes).map(|b| split_barcodes(&b)).unwrap_or_default(),
            empty: get(self.empty).map(|v| is_truthy(&v)).unwrap_or(false),
        }))
    }
}

// Names end up inside glob patterns and report paths, so they must be plain path segments
fn validate_name(name: &str, what: &str, path: &Path, line: usize) -> ScanResult<()> {
    if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        return Err(ScanError::malformed(
            path,
            format!("invalid {} name '{}' on line {}", what, name, line),
        ));
    }
    Ok(())
}

fn split_barcodes(value: &str) -> Vec<String> {
    let mut barcodes: Vec<String> = Vec::new();
    for barcode in value
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(|b| b.trim_matches('"').trim())
        .filter(|b| !b.is_empty())
    {
        if !barcodes.iter().any(|b| b == barcode) {
            barcodes.push(barcode.to_string());
        }
    }
    barcodes
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "1" | "x"
    )
}
