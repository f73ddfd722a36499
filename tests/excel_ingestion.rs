#![cfg(feature = "excel")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use sales_conform::ingestion::excel::{ingest_excel_from_path, ingest_excel_workbook_from_path};
use sales_conform::ingestion::{ingest_from_path, ExcelSheetSelection, IngestionOptions};
use sales_conform::types::Value;

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("sales-conform-{name}-{nanos}.xlsx"))
}

fn text(s: &str) -> Value {
    Value::Utf8(s.to_string())
}

fn write_sales_xlsx(path: &PathBuf) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Ventas").unwrap();

    // header
    ws.write_string(0, 0, "Fecha").unwrap();
    ws.write_string(0, 1, "Producto").unwrap();
    ws.write_string(0, 2, "Cantidad Comprada").unwrap();
    ws.write_string(0, 3, "Precio Unitario USD").unwrap();

    // row 1: numeric cells
    ws.write_string(1, 0, "05/02/2024").unwrap();
    ws.write_string(1, 1, "Leche").unwrap();
    ws.write_number(1, 2, 4).unwrap();
    ws.write_number(1, 3, 2.5).unwrap();

    // row 2: left entirely empty

    // row 3: a real date cell
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let date = ExcelDateTime::from_ymd(2024, 3, 15).unwrap();
    ws.write_datetime_with_format(3, 0, &date, &date_format).unwrap();
    ws.write_string(3, 1, "Queso").unwrap();
    ws.write_number(3, 2, 2).unwrap();

    wb.save(path).unwrap();
}

fn write_multi_sheet_xlsx(path: &PathBuf) {
    let mut wb = Workbook::new();

    let ws1 = wb.add_worksheet();
    ws1.set_name("Enero").unwrap();
    ws1.write_string(0, 0, "Producto").unwrap();
    ws1.write_string(0, 1, "Cantidad").unwrap();
    ws1.write_string(1, 0, "Leche").unwrap();
    ws1.write_number(1, 1, 3).unwrap();

    let ws2 = wb.add_worksheet();
    ws2.set_name("Febrero").unwrap();
    ws2.write_string(0, 0, "Producto").unwrap();
    ws2.write_string(0, 1, "Ciudad").unwrap();
    ws2.write_string(1, 0, "Queso").unwrap();
    ws2.write_string(1, 1, "Lima").unwrap();

    wb.save(path).unwrap();
}

#[test]
fn ingest_excel_reads_cells_as_text() {
    let path = tmp_file("ventas");
    write_sales_xlsx(&path);

    let ds = ingest_excel_from_path(&path, None).unwrap();
    let names: Vec<&str> = ds.schema.field_names().collect();
    assert_eq!(
        names,
        vec!["Fecha", "Producto", "Cantidad Comprada", "Precio Unitario USD"]
    );

    // The blank row between the two records is skipped.
    assert_eq!(ds.row_count(), 2);
    assert_eq!(
        ds.rows[0],
        vec![text("05/02/2024"), text("Leche"), text("4"), text("2.5")]
    );
    assert_eq!(ds.rows[1][0], text("2024-03-15 00:00:00"));
    assert_eq!(ds.rows[1][3], Value::Null);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn ingest_excel_named_sheet_and_missing_sheet() {
    let path = tmp_file("named");
    write_multi_sheet_xlsx(&path);

    let ds = ingest_excel_from_path(&path, Some("Febrero")).unwrap();
    assert_eq!(ds.rows, vec![vec![text("Queso"), text("Lima")]]);

    assert!(ingest_excel_from_path(&path, Some("Marzo")).is_err());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn ingest_excel_first_sheet_by_default() {
    let path = tmp_file("first");
    write_multi_sheet_xlsx(&path);

    let ds = ingest_from_path(&path, &IngestionOptions::default()).unwrap();
    assert_eq!(ds.row_count(), 1);
    assert_eq!(ds.rows[0], vec![text("Leche"), text("3")]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn ingest_excel_all_sheets_unions_columns() {
    let path = tmp_file("all");
    write_multi_sheet_xlsx(&path);

    let ds = ingest_excel_workbook_from_path(&path, None).unwrap();
    let names: Vec<&str> = ds.schema.field_names().collect();
    assert_eq!(names, vec!["Producto", "Cantidad", "Ciudad"]);
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.rows[0], vec![text("Leche"), text("3"), Value::Null]);
    assert_eq!(ds.rows[1], vec![text("Queso"), Value::Null, text("Lima")]);

    let opts = IngestionOptions {
        excel_sheet_selection: ExcelSheetSelection::Sheets(vec!["Febrero".to_string()]),
        ..Default::default()
    };
    let only_second = ingest_from_path(&path, &opts).unwrap();
    assert_eq!(only_second.row_count(), 1);
    assert_eq!(only_second.rows[0][0], text("Queso"));

    let _ = std::fs::remove_file(&path);
}
