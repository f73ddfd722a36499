//! CSV ingestion implementation.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{DataSet, Schema, Value};

use super::{header_label, text_cell};

/// Ingest a CSV file into an all-text [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers; every header becomes a [`crate::types::DataType::Utf8`] field.
/// - Cells are kept verbatim (no trimming, no type parsing). Empty cells become [`Value::Null`].
/// - Short rows are padded with [`Value::Null`]; extra trailing cells are ignored.
/// - Input is decoded as UTF-8 (a leading BOM is dropped). Files that are not valid UTF-8 are
///   decoded as Windows-1252, the usual encoding of spreadsheet CSV exports.
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> PipelineResult<DataSet> {
    let bytes = fs::read(path)?;
    let text = decode_text(&bytes);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader.
///
/// The reader should be built with `has_headers(true)`; use `flexible(true)` to tolerate ragged
/// rows.
pub fn ingest_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> PipelineResult<DataSet> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(PipelineError::SchemaMismatch {
            message: "csv input has no header row".to_string(),
        });
    }

    let names: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(idx, h)| header_label(idx, h))
        .collect();
    let width = names.len();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row = (0..width)
            .map(|idx| record.get(idx).map(text_cell).unwrap_or(Value::Null))
            .collect();
        rows.push(row);
    }

    Ok(DataSet::new(Schema::text(names), rows))
}

fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => {
            let (decoded, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
            decoded
        }
    }
}
