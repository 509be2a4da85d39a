//! Run-directory scanner
//!
//! Walks a sequencer output directory and builds an immutable `Run` model
//! (samples, libraries, read files, run metadata). Instrument-specific naming
//! conventions live in layout profiles (`layout`), not in the scan logic.

pub mod error;
pub mod layout;
pub mod manager;
pub mod sheet;
pub mod types;

pub use error::{ScanError, ScanResult};
pub use layout::{LayoutProfile, LayoutRegistry, ReadPattern, SheetFormat};
pub use manager::RunScanner;
pub use types::{Library, ReadFile, ReadKind, Run, RunMetadata, Sample};
