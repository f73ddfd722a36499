//! Core data model types.
//!
//! Every pipeline stage consumes and produces an in-memory [`DataSet`]: a [`Schema`] (a list of
//! typed [`Field`]s) plus row-major [`Value`] storage. Stages never mutate their input; each one
//! returns a new dataset.

use std::collections::HashSet;

use chrono::NaiveDate;

/// Logical data type for a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit floating point number.
    Float64,
    /// UTF-8 string.
    Utf8,
    /// Calendar date (no time component).
    Date,
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// A list of fields describing the shape of a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Create an all-[`DataType::Utf8`] schema from header labels, keeping their order.
    pub fn text<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            names
                .into_iter()
                .map(|n| Field::new(n, DataType::Utf8))
                .collect(),
        )
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns `true` if a field named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }
}

/// A single typed value in a [`DataSet`].
///
/// [`Value::Null`] is the missing sentinel: it is distinct from an empty string and from zero.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
    /// Calendar date.
    Date(NaiveDate),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text of a [`Value::Utf8`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Convenience constructor mapping `None` to [`Value::Null`].
    pub fn from_f64(v: Option<f64>) -> Self {
        v.map(Value::Float64).unwrap_or(Value::Null)
    }
}

/// Hashable projection of a [`Value`], used for row identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Null,
    Float64(u64),
    Utf8(&'a str),
    Date(NaiveDate),
}

impl<'a> From<&'a Value> for CellKey<'a> {
    fn from(v: &'a Value) -> Self {
        match v {
            Value::Null => CellKey::Null,
            Value::Float64(f) => CellKey::Float64(f.to_bits()),
            Value::Utf8(s) => CellKey::Utf8(s.as_str()),
            Value::Date(d) => CellKey::Date(*d),
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// Iterate the values of column `idx`, yielding [`Value::Null`] for short rows.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows
            .iter()
            .map(move |row| row.get(idx).unwrap_or(&Value::Null))
    }

    /// Create a new dataset by applying `mapper` to every row.
    ///
    /// The returned dataset preserves the original schema.
    ///
    /// # Panics
    ///
    /// Panics if `mapper` returns a row with a different length than the schema field count.
    pub fn map_rows<F>(&self, mut mapper: F) -> Self
    where
        F: FnMut(&[Value]) -> Vec<Value>,
    {
        let expected_len = self.schema.fields.len();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let out = mapper(row.as_slice());
                assert!(
                    out.len() == expected_len,
                    "mapped row length {} does not match schema length {}",
                    out.len(),
                    expected_len
                );
                out
            })
            .collect();

        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Create a new dataset without duplicate rows.
    ///
    /// Row identity is the full tuple of values. The first occurrence of each row is kept and
    /// the relative order of kept rows is preserved.
    pub fn dedup_rows(&self) -> Self {
        let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(self.rows.len());
        let mut keep = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let key: Vec<CellKey<'_>> = row.iter().map(CellKey::from).collect();
            keep.push(seen.insert(key));
        }
        let rows = self
            .rows
            .iter()
            .zip(keep)
            .filter_map(|(row, kept)| kept.then(|| row.clone()))
            .collect();

        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Create a new dataset containing only the columns at `indices`, in that order.
    pub fn select_indices(&self, indices: &[usize]) -> Self {
        let fields = indices
            .iter()
            .filter_map(|&i| self.schema.fields.get(i).cloned())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|&i| row.get(i).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self {
            schema: Schema::new(fields),
            rows,
        }
    }

    /// Create a new dataset with column `name` replaced (or appended, if absent).
    ///
    /// `values` must be aligned row-for-row with the dataset.
    ///
    /// # Panics
    ///
    /// Panics if `values.len()` differs from the row count.
    pub fn with_column(&self, name: &str, data_type: DataType, values: Vec<Value>) -> Self {
        assert!(
            values.len() == self.rows.len(),
            "column '{name}' has {} values but dataset has {} rows",
            values.len(),
            self.rows.len()
        );

        let mut out = self.clone();
        match out.schema.index_of(name) {
            Some(idx) => {
                out.schema.fields[idx].data_type = data_type;
                for (row, v) in out.rows.iter_mut().zip(values) {
                    if row.len() <= idx {
                        row.resize(idx + 1, Value::Null);
                    }
                    row[idx] = v;
                }
            }
            None => {
                out.schema.fields.push(Field::new(name, data_type));
                for (row, v) in out.rows.iter_mut().zip(values) {
                    row.push(v);
                }
            }
        }
        out
    }
}
