//! Total-value resolution.
//!
//! Sales exports name (or omit) the total-value measure inconsistently. [`resolve_total_value`]
//! locates or derives it with a fixed priority:
//!
//! 1. an existing `valor_total_usd` column with at least one numeric entry;
//! 2. the first column matching the *value* keyword group;
//! 3. *quantity* × *price*, when both groups match a column;
//! 4. the first column by position.
//!
//! Matching is a case-sensitive substring test on canonical headers. Keyword order within a group
//! is priority order; for one keyword, the first matching column in table order wins.

use tracing::debug;

use crate::types::DataSet;

use super::coerce::numeric_column;
use super::columns::VALOR_TOTAL_USD;
use super::rules::KeywordGroups;

/// Read access to a table as named numeric columns.
pub trait NumericColumns {
    /// Column names in table order.
    fn column_names(&self) -> Vec<&str>;

    /// Number of rows.
    fn row_count(&self) -> usize;

    /// Numeric view of the column at `idx`; cells that are not numbers are `None`.
    fn numeric_at(&self, idx: usize) -> Option<Vec<Option<f64>>>;

    /// Numeric view of the column named `name`.
    fn numeric(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.column_names().iter().position(|n| *n == name)?;
        self.numeric_at(idx)
    }
}

impl NumericColumns for DataSet {
    fn column_names(&self) -> Vec<&str> {
        self.schema.field_names().collect()
    }

    fn row_count(&self) -> usize {
        DataSet::row_count(self)
    }

    fn numeric_at(&self, idx: usize) -> Option<Vec<Option<f64>>> {
        (idx < self.column_count()).then(|| numeric_column(self, idx))
    }
}

/// Where a resolved total value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TotalValueSource {
    /// The table's own `valor_total_usd` column.
    Existing,
    /// A column matched by the value keyword group.
    Keyword { column: String },
    /// Elementwise product of a quantity and a price column.
    Product { quantity: String, price: String },
    /// The first column by position. `None` for a table without columns.
    Positional { column: Option<String> },
}

impl TotalValueSource {
    /// `true` when the value had to be derived rather than found.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Product { .. } | Self::Positional { .. })
    }
}

/// A numeric total-value column aligned row-for-row with its table.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// One entry per table row; `None` is missing.
    pub values: Vec<Option<f64>>,
    /// How the values were obtained.
    pub source: TotalValueSource,
}

/// Locate or derive the total-value column of `table`.
///
/// Never fails: unparseable cells become `None`.
pub fn resolve_total_value<T>(table: &T, keywords: &KeywordGroups) -> Resolution
where
    T: NumericColumns + ?Sized,
{
    if let Some(values) = table.numeric(VALOR_TOTAL_USD) {
        if values.iter().any(Option::is_some) {
            return Resolution {
                values,
                source: TotalValueSource::Existing,
            };
        }
    }

    let names = table.column_names();

    if let Some(column) = find_column(&names, &keywords.value) {
        debug!(column, "total value taken from keyword match");
        return Resolution {
            values: table.numeric(column).unwrap_or_default(),
            source: TotalValueSource::Keyword {
                column: column.to_string(),
            },
        };
    }

    let quantity = find_column(&names, &keywords.quantity);
    let price = find_column(&names, &keywords.price);
    if let (Some(quantity), Some(price)) = (quantity, price) {
        debug!(quantity, price, "total value derived as quantity x price");
        let q = table.numeric(quantity).unwrap_or_default();
        let p = table.numeric(price).unwrap_or_default();
        let values = q
            .iter()
            .zip(p.iter())
            .map(|(q, p)| Some((*q)? * (*p)?))
            .collect();
        return Resolution {
            values,
            source: TotalValueSource::Product {
                quantity: quantity.to_string(),
                price: price.to_string(),
            },
        };
    }

    let first = names.first().map(|s| s.to_string());
    debug!(
        column = first.as_deref().unwrap_or("<none>"),
        "no total value column detected; using the first column"
    );
    Resolution {
        values: table
            .numeric_at(0)
            .unwrap_or_else(|| vec![None; table.row_count()]),
        source: TotalValueSource::Positional { column: first },
    }
}

/// First column containing any keyword, keyword order first. The total-value column itself is
/// skipped: reaching this search means it holds no numbers.
fn find_column<'a, S: AsRef<str>>(names: &[&'a str], keywords: &[S]) -> Option<&'a str> {
    keywords.iter().find_map(|kw| {
        names
            .iter()
            .copied()
            .find(|name| *name != VALOR_TOTAL_USD && name.contains(kw.as_ref()))
    })
}
