//! In-memory table transformations.
//!
//! The processing layer turns a raw, all-text [`crate::types::DataSet`] into the canonical sales
//! table:
//!
//! - [`canonicalize()`]: raw header label -> canonical snake_case identifier
//! - [`resolve_total_value()`]: locate or derive the total-value measure
//! - [`conform()`] / [`conform_with()`]: dedup, trimming, date/number coercion, derived columns
//! - [`project()`]: restrict to the canonical output columns
//!
//! ## Example: conform -> project
//!
//! ```rust
//! use sales_conform::processing::{conform, project};
//! use sales_conform::types::{DataSet, Schema, Value};
//!
//! let raw = DataSet::new(
//!     Schema::text(["Fecha", "Cantidad", "Precio"]),
//!     vec![vec![
//!         Value::Utf8("05/02/2024".to_string()),
//!         Value::Utf8("4".to_string()),
//!         Value::Utf8("2.5".to_string()),
//!     ]],
//! );
//!
//! let out = project(&conform(&raw));
//! let total = out.schema.index_of("valor_total_usd").unwrap();
//! assert_eq!(out.rows[0][total], Value::Float64(10.0));
//! ```

pub mod canonicalize;
pub mod coerce;
pub mod columns;
pub mod conform;
pub mod project;
pub mod resolver;
pub mod rules;

pub use canonicalize::{canonicalize, canonicalize_headers};
pub use conform::{conform, conform_with, Conformed};
pub use project::project;
pub use resolver::{resolve_total_value, NumericColumns, Resolution, TotalValueSource};
pub use rules::{ConformRules, KeywordGroups};
