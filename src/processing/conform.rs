//! Schema conformance: raw text table -> typed, deduplicated sales table.

use tracing::{debug, info};

use crate::observability::Advisory;
use crate::types::{DataSet, DataType, Value};

use super::canonicalize::{canonicalize_headers, rename_column};
use super::coerce::{date_value, numeric_column, year_month};
use super::columns;
use super::resolver::resolve_total_value;
use super::rules::ConformRules;

/// Output of [`conform_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct Conformed {
    /// The conformed table.
    pub table: DataSet,
    /// Data-quality signals raised while conforming.
    pub advisories: Vec<Advisory>,
}

/// Conform `raw` with the default [`ConformRules`].
pub fn conform(raw: &DataSet) -> DataSet {
    conform_with(raw, &ConformRules::default()).table
}

/// Conform a raw table.
///
/// Steps, in order:
///
/// - canonicalize headers (collisions keep the later column)
/// - drop identifier columns, then drop duplicate rows (first occurrence wins)
/// - apply legacy renames
/// - trim text columns; fill blank categories with the sentinel
/// - parse `fecha` (day-first) and derive `mes_venta`
/// - coerce price/quantity to numbers and resolve `valor_total_usd`
/// - derive `tipo_producto`
///
/// Unparseable cells become [`Value::Null`]; nothing here fails.
pub fn conform_with(raw: &DataSet, rules: &ConformRules) -> Conformed {
    info!(
        rows = raw.row_count(),
        columns = raw.column_count(),
        "normalizing columns and converting types"
    );

    let ds = canonicalize_headers(raw);
    let ds = drop_columns(&ds, &rules.drop_columns);
    let ds = ds.dedup_rows();
    debug!(
        removed = raw.row_count() - ds.row_count(),
        "duplicate rows removed"
    );
    let ds = rules
        .renames
        .iter()
        .fold(ds, |ds, (from, to)| rename_column(&ds, from, to));
    let ds = trim_text_columns(&ds, &rules.text_columns);
    let ds = fill_category(&ds, &rules.category_sentinel);
    let ds = parse_dates(&ds, &rules.date_formats);
    let ds = coerce_numeric(&ds, columns::PRECIO_UNITARIO_USD);
    let ds = coerce_numeric(&ds, columns::CANTIDAD_COMPRADA);

    let mut advisories = Vec::new();
    let resolution = resolve_total_value(&ds, &rules.keywords);
    if resolution.source.is_fallback() {
        advisories.push(Advisory::FallbackValueUsed {
            source: resolution.source.clone(),
        });
    }
    let totals = resolution.values.into_iter().map(Value::from_f64).collect();
    let ds = ds.with_column(columns::VALOR_TOTAL_USD, DataType::Float64, totals);

    let ds = derive_product_type(&ds, &rules.product_type_default);

    Conformed {
        table: ds,
        advisories,
    }
}

fn drop_columns(ds: &DataSet, names: &[String]) -> DataSet {
    let keep: Vec<usize> = ds
        .schema
        .fields
        .iter()
        .enumerate()
        .filter(|(_, f)| !names.contains(&f.name))
        .map(|(i, _)| i)
        .collect();
    if keep.len() == ds.column_count() {
        return ds.clone();
    }
    ds.select_indices(&keep)
}

fn trim_text_columns(ds: &DataSet, names: &[String]) -> DataSet {
    let targets: Vec<usize> = names
        .iter()
        .filter_map(|n| ds.schema.index_of(n))
        .collect();
    if targets.is_empty() {
        return ds.clone();
    }

    ds.map_rows(|row| {
        let mut out = row.to_vec();
        for &idx in &targets {
            if let Some(Value::Utf8(s)) = out.get_mut(idx) {
                let trimmed = s.trim();
                if trimmed.len() != s.len() {
                    *s = trimmed.to_string();
                }
            }
        }
        out
    })
}

fn fill_category(ds: &DataSet, sentinel: &str) -> DataSet {
    let values = match ds.schema.index_of(columns::CATEGORIA) {
        Some(idx) => ds
            .column_values(idx)
            .map(|v| match v.as_str() {
                Some(s) if !s.trim().is_empty() => v.clone(),
                _ => Value::Utf8(sentinel.to_string()),
            })
            .collect(),
        None => vec![Value::Utf8(sentinel.to_string()); ds.row_count()],
    };
    ds.with_column(columns::CATEGORIA, DataType::Utf8, values)
}

fn parse_dates(ds: &DataSet, formats: &[String]) -> DataSet {
    let dates: Vec<Option<chrono::NaiveDate>> = match ds.schema.index_of(columns::FECHA) {
        Some(idx) => ds.column_values(idx).map(|v| date_value(v, formats)).collect(),
        None => vec![None; ds.row_count()],
    };

    let periods = dates
        .iter()
        .map(|d| d.map(|d| Value::Utf8(year_month(d))).unwrap_or(Value::Null))
        .collect();
    let dates = dates
        .into_iter()
        .map(|d| d.map(Value::Date).unwrap_or(Value::Null))
        .collect();

    ds.with_column(columns::FECHA, DataType::Date, dates)
        .with_column(columns::MES_VENTA, DataType::Utf8, periods)
}

fn coerce_numeric(ds: &DataSet, name: &str) -> DataSet {
    match ds.schema.index_of(name) {
        Some(idx) => {
            let values = numeric_column(ds, idx)
                .into_iter()
                .map(Value::from_f64)
                .collect();
            ds.with_column(name, DataType::Float64, values)
        }
        None => ds.clone(),
    }
}

fn derive_product_type(ds: &DataSet, default: &str) -> DataSet {
    let values = match ds.schema.index_of(columns::PRODUCTO) {
        Some(idx) => ds.column_values(idx).cloned().collect(),
        None => vec![Value::Utf8(default.to_string()); ds.row_count()],
    };
    ds.with_column(columns::TIPO_PRODUCTO, DataType::Utf8, values)
}
