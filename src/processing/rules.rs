//! Tunable conform rules.
//!
//! [`ConformRules::default`] encodes the behavior for the dairy-sales export. Deployments can
//! override any subset of the fields from JSON; omitted fields keep their defaults.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PipelineError, PipelineResult};

use super::columns;

/// Ordered keyword groups used by the total-value resolver.
///
/// Within a group, keyword order is priority order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeywordGroups {
    /// Keywords identifying a column that already holds a total value.
    pub value: Vec<String>,
    /// Keywords identifying a quantity column.
    pub quantity: Vec<String>,
    /// Keywords identifying a unit-price column.
    pub price: Vec<String>,
}

impl Default for KeywordGroups {
    fn default() -> Self {
        Self {
            value: strings(&["valor", "total"]),
            quantity: strings(&["cantidad", "qty", "unidades", "volumen"]),
            price: strings(&["precio", "unit_price", "price"]),
        }
    }
}

/// Rules applied by [`super::conform::conform_with`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConformRules {
    /// Identifier-like canonical columns removed before deduplication.
    pub drop_columns: Vec<String>,
    /// Legacy canonical header -> current canonical header.
    pub renames: BTreeMap<String, String>,
    /// Text/categorical columns whose values are trimmed.
    pub text_columns: Vec<String>,
    /// Value used for blank or missing categories.
    pub category_sentinel: String,
    /// Product type used when the table has no product column.
    pub product_type_default: String,
    /// `chrono` date formats, most preferred first.
    pub date_formats: Vec<String>,
    /// Keyword groups for the total-value resolver.
    pub keywords: KeywordGroups,
}

impl Default for ConformRules {
    fn default() -> Self {
        Self {
            drop_columns: strings(&["id", "id_orden", "orden"]),
            renames: BTreeMap::from([(
                "forma_de_pago".to_string(),
                columns::FORMA_PAGO.to_string(),
            )]),
            text_columns: strings(&[
                columns::NOMBRE_DEL_VENDEDOR,
                columns::NOMBRE_DEL_SUPERMERCADO,
                columns::REPRESENTANTE_DE_COMPRAS,
                columns::CIUDAD,
                columns::ESTADO,
                columns::CATEGORIA,
                columns::PRODUCTO,
                columns::PRESENTACION,
                columns::FORMA_PAGO,
            ]),
            category_sentinel: "sin_categoria".to_string(),
            product_type_default: "lacteo".to_string(),
            date_formats: strings(&[
                "%Y-%m-%d",
                "%Y/%m/%d",
                "%d/%m/%Y",
                "%d-%m-%Y",
                "%d.%m.%Y",
                "%d/%m/%y",
                "%d-%m-%y",
                "%m/%d/%Y",
            ]),
            keywords: KeywordGroups::default(),
        }
    }
}

impl ConformRules {
    /// Parse rules from JSON. Missing fields fall back to [`ConformRules::default`].
    pub fn from_json_str(input: &str) -> PipelineResult<Self> {
        serde_json::from_str(input).map_err(|e| PipelineError::SchemaMismatch {
            message: format!("invalid conform rules: {e}"),
        })
    }

    /// Read rules from a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
