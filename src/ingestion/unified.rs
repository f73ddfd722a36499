//! Unified raw-table loading.
//!
//! Most callers should use [`ingest_from_path`], which loads a file into an all-text
//! [`crate::types::DataSet`].
//!
//! If [`IngestionOptions::format`] is `None`, the ingestion format is inferred from the file
//! extension; extensions outside [`SUPPORTED_EXTENSIONS`] fail with
//! [`PipelineError::UnsupportedFormat`].

use std::path::Path;

use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::types::DataSet;

use super::csv;

/// File extensions (lowercase, without the dot) accepted as raw input.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls", "xlsm", "xlsb", "ods"];

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Infer the format of `path` from its extension.
    pub fn from_path(path: &Path) -> PipelineResult<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        Self::from_extension(ext).ok_or_else(|| PipelineError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: ext.to_string(),
        })
    }
}

/// How to choose sheet(s) when ingesting an Excel workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExcelSheetSelection {
    /// Ingest the first sheet (default).
    #[default]
    First,
    /// Ingest a single named sheet.
    Sheet(String),
    /// Ingest all sheets and concatenate rows.
    AllSheets,
    /// Ingest only the listed sheets (in order) and concatenate rows.
    Sheets(Vec<String>),
}

/// Options controlling raw-table loading.
///
/// Use [`Default`] for common cases.
#[derive(Debug, Clone, Default)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// Excel-specific options.
    pub excel_sheet_selection: ExcelSheetSelection,
}

/// Load `path` as a raw, all-text table.
///
/// # Examples
///
/// ```no_run
/// use sales_conform::ingestion::{ingest_from_path, IngestionOptions};
///
/// # fn main() -> Result<(), sales_conform::PipelineError> {
/// // Uses `.csv` to select CSV ingestion.
/// let raw = ingest_from_path("ventas.csv", &IngestionOptions::default())?;
/// println!("rows={} columns={}", raw.row_count(), raw.column_count());
/// # Ok(())
/// # }
/// ```
///
/// Force a format explicitly when the file has no usable extension:
///
/// ```no_run
/// use sales_conform::ingestion::{ingest_from_path, IngestionFormat, IngestionOptions};
///
/// # fn main() -> Result<(), sales_conform::PipelineError> {
/// let opts = IngestionOptions {
///     format: Some(IngestionFormat::Csv),
///     ..Default::default()
/// };
/// let raw = ingest_from_path("export_without_extension", &opts)?;
/// println!("rows={}", raw.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> PipelineResult<DataSet> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => IngestionFormat::from_path(path)?,
    };
    debug!(path = %path.display(), format = ?fmt, "loading raw table");

    match fmt {
        IngestionFormat::Csv => csv::ingest_csv_from_path(path),
        IngestionFormat::Excel => ingest_excel_dispatch(path, &options.excel_sheet_selection),
    }
}

fn ingest_excel_dispatch(path: &Path, sel: &ExcelSheetSelection) -> PipelineResult<DataSet> {
    #[cfg(feature = "excel")]
    {
        use super::excel;

        match sel {
            ExcelSheetSelection::First => excel::ingest_excel_from_path(path, None),
            ExcelSheetSelection::Sheet(name) => excel::ingest_excel_from_path(path, Some(name.as_str())),
            ExcelSheetSelection::AllSheets => excel::ingest_excel_workbook_from_path(path, None),
            ExcelSheetSelection::Sheets(names) => {
                let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
                excel::ingest_excel_workbook_from_path(path, Some(refs.as_slice()))
            }
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = sel;
        Err(PipelineError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: path
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or("")
                .to_string(),
        })
    }
}
