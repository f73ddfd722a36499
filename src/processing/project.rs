//! Final column projection.

use crate::types::DataSet;

use super::columns::CANONICAL_ORDER;

/// Restrict `dataset` to the canonical output columns, in canonical order.
///
/// Columns the dataset lacks are omitted (never padded). A dataset with none of them projects to
/// a zero-column dataset with the same row count.
pub fn project(dataset: &DataSet) -> DataSet {
    let indices: Vec<usize> = CANONICAL_ORDER
        .iter()
        .filter_map(|name| dataset.schema.index_of(name))
        .collect();
    dataset.select_indices(&indices)
}
