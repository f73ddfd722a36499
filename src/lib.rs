//! `sales-conform` turns a loosely-shaped sales export into a canonical, typed, deduplicated CSV
//! table.
//!
//! The primary entrypoint is [`pipeline::run`] (or [`pipeline::run_with`] for explicit
//! configuration), which sequences:
//!
//! 1. **load**: [`ingestion::ingest_from_path`] reads a CSV or spreadsheet with every cell as text
//! 2. **conform**: [`processing::conform_with`] canonicalizes headers, drops identifier columns and
//!    duplicate rows, trims text, parses dates, coerces numbers, and resolves the total value
//! 3. **project**: [`processing::project`] keeps the canonical output columns in canonical order
//! 4. **export**: [`export::export_csv`] writes the result
//!
//! ## What you can ingest
//!
//! - **CSV**: `.csv` (UTF-8, or Windows-1252 as a fallback)
//! - **Excel/workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xls`, `.xlsm`,
//!   `.xlsb`, `.ods`
//!
//! ## Missing values
//!
//! Cells that cannot be parsed as numbers or dates become [`types::Value::Null`], never zero or
//! an empty string, and never an error. Only structural problems (missing raw directory, no
//! compatible file, unsupported extension, unreadable file) fail a run.
//!
//! ## Quick example
//!
//! ```no_run
//! use std::path::Path;
//!
//! # fn main() -> Result<(), sales_conform::PipelineError> {
//! // Discover the first compatible file under ./data/raw and write
//! // ./data/processed/ventas_lacteos_2024.csv.
//! let written = sales_conform::run(None, None)?;
//! println!("{}", written.display());
//!
//! // Or name both ends explicitly.
//! sales_conform::run(Some(Path::new("ventas.xlsx")), Some(Path::new("out/ventas.csv")))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: raw-table loading and raw-file discovery
//! - [`processing`]: canonicalization, total-value resolution, conformance, projection
//! - [`export`]: CSV sink
//! - [`pipeline`]: orchestration and options
//! - [`observability`]: observer hooks and advisories
//! - [`types`]: schema + in-memory dataset types
//! - [`error`]: error types

pub mod error;
pub mod export;
pub mod ingestion;
pub mod observability;
pub mod pipeline;
pub mod processing;
pub mod types;

pub use error::{PipelineError, PipelineResult};
pub use pipeline::{run, run_with, PipelineOptions};
