//! Raw-table loading and raw-file discovery.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - loads every cell as text into an in-memory [`crate::types::DataSet`] (a raw table)
//!
//! Type parsing is deliberately left to [`crate::processing::conform`].
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - `excel` (feature `excel`)
//!
//! [`discovery`] locates the raw input file inside a staging directory.

pub mod csv;
pub mod discovery;
#[cfg(feature = "excel")]
pub mod excel;
pub mod unified;

pub use discovery::{find_first_compatible_file, list_compatible_files, DataLayout};
pub use unified::{
    ingest_from_path, ExcelSheetSelection, IngestionFormat, IngestionOptions, SUPPORTED_EXTENSIONS,
};

use crate::types::Value;

/// Header label for column `idx`; blank labels become `Unnamed: <idx>`.
pub(crate) fn header_label(idx: usize, raw: &str) -> String {
    if raw.trim().is_empty() {
        format!("Unnamed: {idx}")
    } else {
        raw.to_string()
    }
}

/// Raw text cell; empty text is missing.
pub(crate) fn text_cell(raw: &str) -> Value {
    if raw.is_empty() {
        Value::Null
    } else {
        Value::Utf8(raw.to_string())
    }
}
