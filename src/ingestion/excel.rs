#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{PipelineError, PipelineResult};
use crate::types::{DataSet, Schema, Value};

use super::header_label;

/// Ingest one sheet of an Excel document (`.xlsx`, `.xls`, `.ods`, etc.) as an all-text `DataSet`.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Renders every remaining cell as text; empty and error cells become `Value::Null`
/// - Skips data rows in which every cell is empty
pub fn ingest_excel_from_path(path: impl AsRef<Path>, sheet_name: Option<&str>) -> PipelineResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| PipelineError::SchemaMismatch {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    let (names, rows) = read_sheet_range(&sheet, &range)?;
    Ok(DataSet::new(Schema::text(names), rows))
}

/// Ingest multiple sheets from an Excel workbook and concatenate all rows into one `DataSet`.
///
/// - If `sheet_names` is `None`, ingests **all sheets** in workbook order.
/// - If `sheet_names` is `Some(&[...])`, ingests only those sheets (in the provided order).
///
/// Columns are matched by header label. The output keeps columns in first-seen order; rows from a
/// sheet lacking a column get `Value::Null` there.
pub fn ingest_excel_workbook_from_path(
    path: impl AsRef<Path>,
    sheet_names: Option<&[&str]>,
) -> PipelineResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;

    let sheets: Vec<String> = match sheet_names {
        Some(names) => names.iter().map(|s| s.to_string()).collect(),
        None => workbook.sheet_names().to_vec(),
    };
    if sheets.is_empty() {
        return Err(PipelineError::SchemaMismatch {
            message: "workbook has no sheets".to_string(),
        });
    }

    let mut names: Vec<String> = Vec::new();
    let mut all_rows: Vec<Vec<Value>> = Vec::new();
    for sheet in sheets {
        let range = workbook.worksheet_range(&sheet)?;
        let (sheet_headers, sheet_rows) = read_sheet_range(&sheet, &range)?;

        let positions: Vec<usize> = sheet_headers
            .iter()
            .map(|name| match names.iter().position(|n| n == name) {
                Some(pos) => pos,
                None => {
                    names.push(name.clone());
                    names.len() - 1
                }
            })
            .collect();

        for row in sheet_rows {
            let mut out = vec![Value::Null; names.len()];
            for (value, &pos) in row.into_iter().zip(positions.iter()) {
                out[pos] = value;
            }
            all_rows.push(out);
        }
    }

    // Rows read before a later sheet introduced new columns are shorter; pad them.
    let width = names.len();
    for row in &mut all_rows {
        row.resize(width, Value::Null);
    }

    Ok(DataSet::new(Schema::text(names), all_rows))
}

fn read_sheet_range(
    sheet: &str,
    range: &calamine::Range<Data>,
) -> PipelineResult<(Vec<String>, Vec<Vec<Value>>)> {
    let header_row_idx = range
        .rows()
        .position(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .ok_or_else(|| PipelineError::SchemaMismatch {
            message: format!("sheet '{sheet}': sheet has no non-empty rows (no header row found)"),
        })?;

    let names: Vec<String> = range
        .rows()
        .nth(header_row_idx)
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(idx, c)| header_label(idx, &cell_to_header_string(c)))
                .collect()
        })
        .unwrap_or_default();
    let width = names.len();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for row in range.rows().skip(header_row_idx + 1) {
        let out_row: Vec<Value> = (0..width)
            .map(|idx| row.get(idx).map(cell_to_value).unwrap_or(Value::Null))
            .collect();
        if out_row.iter().all(Value::is_null) {
            continue;
        }
        rows.push(out_row);
    }

    Ok((names, rows))
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Empty => "".to_string(),
        other => cell_to_text(other).unwrap_or_default(),
    }
}

fn cell_to_value(c: &Data) -> Value {
    cell_to_text(c).map(Value::Utf8).unwrap_or(Value::Null)
}

/// Render a cell the way a text-typed spreadsheet read would show it.
fn cell_to_text(c: &Data) -> Option<String> {
    match c {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                Some((*f as i64).to_string())
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(match dt.as_datetime() {
            Some(ndt) => ndt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.to_string(),
        }),
        Data::DateTimeIso(s) => Some(s.clone()),
        Data::DurationIso(s) => Some(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use calamine::Data;

    use super::cell_to_text;

    #[test]
    fn whole_floats_render_without_fraction() {
        assert_eq!(cell_to_text(&Data::Float(3.0)), Some("3".to_string()));
        assert_eq!(cell_to_text(&Data::Float(2.5)), Some("2.5".to_string()));
        assert_eq!(cell_to_text(&Data::Int(7)), Some("7".to_string()));
    }

    #[test]
    fn empty_and_error_cells_are_missing() {
        assert_eq!(cell_to_text(&Data::Empty), None);
        assert_eq!(cell_to_text(&Data::String(String::new())), None);
        assert_eq!(cell_to_text(&Data::Error(calamine::CellErrorType::NA)), None);
    }
}
