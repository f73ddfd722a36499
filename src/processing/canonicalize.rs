//! Column-name canonicalization.

use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::types::DataSet;

/// Canonical (ASCII, snake_case) form of a raw header label.
///
/// 1. Decompose accented characters (NFKD) and drop everything non-ASCII.
/// 2. Drop every character that is not alphanumeric, `_`, or whitespace.
/// 3. Trim, lowercase, and collapse whitespace runs into a single `_`.
/// 4. If nothing is left, return `raw` unchanged.
///
/// The function is total and idempotent.
///
/// ```rust
/// use sales_conform::processing::canonicalize;
///
/// assert_eq!(canonicalize("Nombre del Vendedor"), "nombre_del_vendedor");
/// assert_eq!(canonicalize("Categoría"), "categoria");
/// assert_eq!(canonicalize("Precio Unitario (USD)"), "precio_unitario_usd");
/// assert_eq!(canonicalize("¿?"), "¿?");
/// ```
pub fn canonicalize(raw: &str) -> String {
    let kept: String = raw
        .nfkd()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_ascii_whitespace())
        .collect();
    let lowered = kept.trim().to_ascii_lowercase();
    let out = lowered.split_ascii_whitespace().collect::<Vec<_>>().join("_");

    if out.is_empty() { raw.to_string() } else { out }
}

/// Rename every column to its canonical header.
///
/// Collisions are resolved keep-last: when two raw headers canonicalize to the same name, the
/// later column's values replace the earlier column's, at the earlier column's position.
pub fn canonicalize_headers(dataset: &DataSet) -> DataSet {
    let mut names: Vec<String> = Vec::with_capacity(dataset.column_count());
    let mut sources: Vec<usize> = Vec::with_capacity(dataset.column_count());

    for (idx, field) in dataset.schema.fields.iter().enumerate() {
        let name = canonicalize(&field.name);
        match names.iter().position(|n| *n == name) {
            Some(pos) => {
                debug!(
                    header = %field.name,
                    canonical = %name,
                    "header collision; later column replaces earlier one"
                );
                sources[pos] = idx;
            }
            None => {
                names.push(name);
                sources.push(idx);
            }
        }
    }

    let mut out = dataset.select_indices(&sources);
    for (field, name) in out.schema.fields.iter_mut().zip(names) {
        field.name = name;
    }
    out
}

/// Rename column `from` to `to`, if `from` exists.
///
/// If `to` already exists, the renamed column's values replace it at `to`'s position and `from`
/// is removed (the same keep-last policy as [`canonicalize_headers`]).
pub fn rename_column(dataset: &DataSet, from: &str, to: &str) -> DataSet {
    let Some(from_idx) = dataset.schema.index_of(from) else {
        return dataset.clone();
    };
    if from == to {
        return dataset.clone();
    }

    match dataset.schema.index_of(to) {
        None => {
            let mut out = dataset.clone();
            out.schema.fields[from_idx].name = to.to_string();
            out
        }
        Some(to_idx) => {
            let indices: Vec<usize> = (0..dataset.column_count())
                .filter(|&i| i != from_idx)
                .map(|i| if i == to_idx { from_idx } else { i })
                .collect();
            let mut out = dataset.select_indices(&indices);
            if let Some(field) = out.schema.fields.iter_mut().find(|f| f.name == from) {
                field.name = to.to_string();
            }
            out
        }
    }
}
