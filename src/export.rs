//! CSV sink for projected tables.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::PipelineResult;
use crate::types::{DataSet, Value};

/// Write `dataset` to `path` as CSV, creating missing parent directories.
///
/// The header row is the schema's field order; there is no index column. Rows go to a sibling
/// temporary file that is renamed over `path` once complete, so a failed export never leaves a
/// truncated or partial destination. Returns `path`.
pub fn export_csv(dataset: &DataSet, path: impl AsRef<Path>) -> PipelineResult<PathBuf> {
    let path = path.as_ref();
    info!(path = %path.display(), rows = dataset.row_count(), "exporting processed data");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path(path);
    let result = write_file(dataset, &staging)
        .and_then(|()| fs::rename(&staging, path).map_err(Into::into));
    if let Err(e) = result {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }

    info!("export finished");
    Ok(path.to_path_buf())
}

fn write_file(dataset: &DataSet, path: &Path) -> PipelineResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    write_csv(dataset, &mut wtr)?;
    wtr.flush()?;
    Ok(())
}

/// `dir/.name.tmp` next to `path`.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

/// Write `dataset` (header row first) to an existing CSV writer.
pub fn write_csv<W: std::io::Write>(dataset: &DataSet, wtr: &mut csv::Writer<W>) -> PipelineResult<()> {
    wtr.write_record(dataset.schema.field_names())?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(format_value))?;
    }
    Ok(())
}

/// Text form of a cell: missing is an empty field, dates are ISO, whole floats keep one decimal.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Float64(v) => format_float(*v),
        Value::Utf8(s) => s.clone(),
        Value::Date(d) => d.format("%Y-%m-%d").to_string(),
    }
}

fn format_float(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::{DataType, Field, Schema};

    #[test]
    fn formats_missing_dates_and_floats() {
        assert_eq!(format_value(&Value::Null), "");
        assert_eq!(format_value(&Value::Float64(10.0)), "10.0");
        assert_eq!(format_value(&Value::Float64(2.5)), "2.5");
        assert_eq!(
            format_value(&Value::Date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())),
            "2024-03-05"
        );
    }

    #[test]
    fn writes_header_then_rows() {
        let ds = DataSet::new(
            Schema::new(vec![
                Field::new("fecha", DataType::Date),
                Field::new("producto", DataType::Utf8),
                Field::new("valor_total_usd", DataType::Float64),
            ]),
            vec![
                vec![
                    Value::Date(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()),
                    Value::Utf8("Leche, entera".to_string()),
                    Value::Float64(999.0),
                ],
                vec![Value::Null, Value::Utf8("Queso".to_string()), Value::Null],
            ],
        );

        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv(&ds, &mut wtr).unwrap();
        let bytes = wtr.into_inner().map_err(|e| e.to_string()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "fecha,producto,valor_total_usd\n2024-01-10,\"Leche, entera\",999.0\n,Queso,\n"
        );
    }

    fn tmp_dir(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("sales-conform-{name}-{nanos}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn one_row() -> DataSet {
        DataSet::new(
            Schema::new(vec![Field::new("producto", DataType::Utf8)]),
            vec![vec![Value::Utf8("Queso".to_string())]],
        )
    }

    #[test]
    fn export_replaces_existing_file_without_leftovers() {
        let dir = tmp_dir("export-replace");
        let dest = dir.join("ventas.csv");
        fs::write(&dest, "old,content\n1,2\n3,4\n").unwrap();

        export_csv(&one_row(), &dest).unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "producto\nQueso\n");
        let entries: Vec<_> = fs::read_dir(&dir).unwrap().collect();
        assert_eq!(entries.len(), 1);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_export_leaves_destination_and_no_staging_file() {
        let dir = tmp_dir("export-fail");
        // A directory cannot be replaced by a file, so the final rename fails.
        let dest = dir.join("ventas.csv");
        fs::create_dir_all(dest.join("keep")).unwrap();

        assert!(export_csv(&one_row(), &dest).is_err());

        assert!(dest.join("keep").is_dir());
        assert!(!staging_path(&dest).exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
