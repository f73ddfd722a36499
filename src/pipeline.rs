//! Pipeline orchestration: load -> conform -> project -> export.
//!
//! The run is synchronous and single-pass. Structural failures (missing directory, no compatible
//! file, unsupported format, unreadable input) abort before anything is written; data-quality
//! issues only surface as [`crate::observability::Advisory`] values.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::error::PipelineResult;
use crate::export::export_csv;
use crate::ingestion::{ingest_from_path, DataLayout, IngestionOptions};
use crate::observability::{severity_for_error, PipelineContext, PipelineObserver, PipelineStats, Severity};
use crate::processing::{conform_with, project, ConformRules};

/// Options controlling a pipeline run.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct PipelineOptions {
    /// Raw-table loading options.
    pub ingestion: IngestionOptions,
    /// Conform rules.
    pub rules: ConformRules,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn PipelineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for PipelineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOptions")
            .field("ingestion", &self.ingestion)
            .field("rules", &self.rules)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            ingestion: IngestionOptions::default(),
            rules: ConformRules::default(),
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// Run the pipeline with the default [`DataLayout`] (relative to the working directory) and
/// default [`PipelineOptions`].
///
/// Returns the destination path.
pub fn run(source: Option<&Path>, destination: Option<&Path>) -> PipelineResult<PathBuf> {
    run_with(source, destination, &DataLayout::default(), &PipelineOptions::default())
}

/// Run the pipeline.
///
/// - `source`: raw input file; when `None`, the first compatible file in `layout.raw_dir`.
/// - `destination`: output CSV; when `None`, `layout.destination`.
///
/// When an observer is configured, this function reports:
///
/// - `on_advisory` once per advisory raised while conforming
/// - `on_success` on success, with row/column stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use std::sync::Arc;
///
/// use sales_conform::ingestion::DataLayout;
/// use sales_conform::observability::TracingObserver;
/// use sales_conform::pipeline::{run_with, PipelineOptions};
///
/// # fn main() -> Result<(), sales_conform::PipelineError> {
/// let opts = PipelineOptions {
///     observer: Some(Arc::new(TracingObserver)),
///     ..Default::default()
/// };
/// let written = run_with(None, Some(Path::new("out/ventas.csv")), &DataLayout::under("."), &opts)?;
/// println!("wrote {}", written.display());
/// # Ok(())
/// # }
/// ```
pub fn run_with(
    source: Option<&Path>,
    destination: Option<&Path>,
    layout: &DataLayout,
    options: &PipelineOptions,
) -> PipelineResult<PathBuf> {
    let mut ctx = PipelineContext {
        source: source.map(Path::to_path_buf),
        destination: destination
            .map(Path::to_path_buf)
            .unwrap_or_else(|| layout.destination.clone()),
    };

    let result = execute(&mut ctx, layout, options);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(stats) => obs.on_success(&ctx, *stats),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result.map(|_| ctx.destination)
}

fn execute(
    ctx: &mut PipelineContext,
    layout: &DataLayout,
    options: &PipelineOptions,
) -> PipelineResult<PipelineStats> {
    let source = match &ctx.source {
        Some(path) => path.clone(),
        None => {
            let found = layout.discover_source()?;
            ctx.source = Some(found.clone());
            found
        }
    };

    info!(path = %source.display(), "loading data");
    let raw = ingest_from_path(&source, &options.ingestion)?;

    let conformed = conform_with(&raw, &options.rules);
    if let Some(obs) = options.observer.as_ref() {
        for advisory in &conformed.advisories {
            obs.on_advisory(ctx, advisory);
        }
    }

    let projected = project(&conformed.table);
    export_csv(&projected, &ctx.destination)?;

    Ok(PipelineStats {
        raw_rows: raw.row_count(),
        output_rows: projected.row_count(),
        output_columns: projected.column_count(),
    })
}
