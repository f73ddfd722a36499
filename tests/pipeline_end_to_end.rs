use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use sales_conform::ingestion::DataLayout;
use sales_conform::{run, run_with, PipelineError, PipelineOptions};

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("sales-conform-{name}-{nanos}"));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[cfg(feature = "excel")]
#[test]
fn spreadsheet_run_writes_canonical_header_and_parsed_dates() {
    use rust_xlsxwriter::Workbook;

    let root = tmp_dir("e2e-xlsx");
    let layout = DataLayout::under(&root);
    fs::create_dir_all(&layout.raw_dir).unwrap();

    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "Fecha").unwrap();
    ws.write_string(0, 1, "Nombre del Vendedor").unwrap();
    ws.write_string(0, 2, "Cantidad Comprada").unwrap();
    ws.write_string(0, 3, "Precio Unitario USD").unwrap();
    ws.write_string(1, 0, "05/02/2024").unwrap();
    ws.write_string(1, 1, " Ana Pérez ").unwrap();
    ws.write_number(1, 2, 4).unwrap();
    ws.write_number(1, 3, 2.5).unwrap();
    wb.save(layout.raw_dir.join("ventas_2024.xlsx")).unwrap();

    // Nothing supplied: the source is discovered and the default destination is used.
    let written = run_with(None, None, &layout, &PipelineOptions::default()).unwrap();
    assert_eq!(written, layout.destination);

    let lines = read_lines(&written);
    assert_eq!(
        lines[0],
        "fecha,mes_venta,nombre_del_vendedor,categoria,precio_unitario_usd,cantidad_comprada,valor_total_usd,tipo_producto"
    );
    assert_eq!(
        lines[1],
        "2024-02-05,2024-02,Ana Pérez,sin_categoria,2.5,4.0,10.0,lacteo"
    );
    assert_eq!(lines.len(), 2);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn csv_run_conforms_deduplicates_and_projects() {
    let root = tmp_dir("e2e-csv");
    let destination = root.join("nested").join("out").join("ventas.csv");

    let written = run(Some(Path::new("tests/fixtures/ventas.csv")), Some(&destination)).unwrap();
    assert_eq!(written, destination);

    let lines = read_lines(&destination);
    assert_eq!(
        lines[0],
        "fecha,mes_venta,nombre_del_vendedor,nombre_del_supermercado,estado,ciudad,categoria,producto,presentacion,precio_unitario_usd,cantidad_comprada,valor_total_usd,forma_pago,tipo_producto,region"
    );
    // The first two raw rows differ only by the dropped identifier.
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[1],
        "2024-02-05,2024-02,Ana Pérez,Super Uno,Jalisco,Guadalajara,Leche,Leche entera,1L,2.5,4.0,10.0,Efectivo,Leche entera,Occidente"
    );
    assert_eq!(
        lines[2],
        "2024-03-15,2024-03,Luis Gómez,Mercado Dos,Nuevo León,Monterrey,sin_categoria,Queso,500g,,2.0,,Tarjeta,Queso,Norte"
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn unsupported_source_fails_before_writing() {
    let root = tmp_dir("e2e-unsupported");
    let source = root.join("ventas.json");
    fs::write(&source, "[]").unwrap();
    let destination = root.join("out").join("ventas.csv");

    let err = run(Some(&source), Some(&destination)).unwrap_err();
    match err {
        PipelineError::UnsupportedFormat { extension, .. } => assert_eq!(extension, "json"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!destination.exists());

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn empty_raw_directory_fails_with_no_compatible_file() {
    let root = tmp_dir("e2e-empty");
    let layout = DataLayout::under(&root);
    fs::create_dir_all(&layout.raw_dir).unwrap();

    let err = run_with(None, None, &layout, &PipelineOptions::default()).unwrap_err();
    assert!(matches!(err, PipelineError::NoCompatibleFile { .. }));
    assert!(!layout.destination.exists());

    let _ = fs::remove_dir_all(&root);
}
