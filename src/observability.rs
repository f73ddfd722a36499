//! Pipeline outcome reporting.
//!
//! An optional [`PipelineObserver`] attached to [`crate::pipeline::PipelineOptions`] receives
//! success/failure/alert callbacks for every run, plus [`Advisory`] data-quality signals.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{error, info, warn};

use crate::error::PipelineError;
use crate::processing::TotalValueSource;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Severity of a pipeline failure.
pub fn severity_for_error(e: &PipelineError) -> Severity {
    match e {
        PipelineError::Io(_) => Severity::Critical,
        PipelineError::DirectoryMissing { .. } => Severity::Critical,
        PipelineError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => Severity::Critical,
            _ => Severity::Error,
        },
        #[cfg(feature = "excel")]
        PipelineError::Excel(_) => Severity::Error,
        PipelineError::NoCompatibleFile { .. } => Severity::Error,
        PipelineError::UnsupportedFormat { .. } => Severity::Error,
        PipelineError::SchemaMismatch { .. } => Severity::Error,
    }
}

/// A non-fatal data-quality signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// The total value had to be derived (quantity x price) or taken from the first column.
    FallbackValueUsed { source: TotalValueSource },
}

impl Advisory {
    /// Positional fallbacks are warnings; derivations are informational.
    pub fn severity(&self) -> Severity {
        match self {
            Advisory::FallbackValueUsed {
                source: TotalValueSource::Positional { .. },
            } => Severity::Warning,
            Advisory::FallbackValueUsed { .. } => Severity::Info,
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::FallbackValueUsed { source } => match source {
                TotalValueSource::Positional { column } => write!(
                    f,
                    "total value taken from first column '{}'",
                    column.as_deref().unwrap_or("")
                ),
                TotalValueSource::Product { quantity, price } => {
                    write!(f, "total value derived as {quantity} x {price}")
                }
                TotalValueSource::Keyword { column } => {
                    write!(f, "total value taken from '{column}'")
                }
                TotalValueSource::Existing => write!(f, "total value present"),
            },
        }
    }
}

/// Context about a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineContext {
    /// Raw input file, once known (discovery may fail before one is selected).
    pub source: Option<PathBuf>,
    /// Output file.
    pub destination: PathBuf,
}

/// Stats reported on a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    /// Rows in the raw table.
    pub raw_rows: usize,
    /// Rows written (after deduplication).
    pub output_rows: usize,
    /// Columns written.
    pub output_columns: usize,
}

/// Observer interface for pipeline outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait PipelineObserver: Send + Sync {
    /// Called when the run succeeds.
    fn on_success(&self, _ctx: &PipelineContext, _stats: PipelineStats) {}

    /// Called when the run fails.
    fn on_failure(&self, _ctx: &PipelineContext, _severity: Severity, _error: &PipelineError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &PipelineContext, severity: Severity, error: &PipelineError) {
        self.on_failure(ctx, severity, error)
    }

    /// Called once per data-quality advisory raised during the run.
    fn on_advisory(&self, _ctx: &PipelineContext, _advisory: &Advisory) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_success(&self, ctx: &PipelineContext, stats: PipelineStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: Severity, error: &PipelineError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &PipelineContext, severity: Severity, error: &PipelineError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }

    fn on_advisory(&self, ctx: &PipelineContext, advisory: &Advisory) {
        for o in &self.observers {
            o.on_advisory(ctx, advisory);
        }
    }
}

/// Forwards pipeline events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_success(&self, ctx: &PipelineContext, stats: PipelineStats) {
        info!(
            source = %display_source(ctx),
            destination = %ctx.destination.display(),
            raw_rows = stats.raw_rows,
            rows = stats.output_rows,
            columns = stats.output_columns,
            "pipeline finished"
        );
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: Severity, error: &PipelineError) {
        error!(
            ?severity,
            source = %display_source(ctx),
            destination = %ctx.destination.display(),
            %error,
            "pipeline failed"
        );
    }

    fn on_alert(&self, ctx: &PipelineContext, severity: Severity, error: &PipelineError) {
        error!(
            ?severity,
            source = %display_source(ctx),
            destination = %ctx.destination.display(),
            %error,
            "ALERT: pipeline failed"
        );
    }

    fn on_advisory(&self, ctx: &PipelineContext, advisory: &Advisory) {
        let source = display_source(ctx);
        match advisory.severity() {
            Severity::Info => info!(%source, %advisory, "data quality advisory"),
            Severity::Warning => warn!(%source, %advisory, "data quality advisory"),
            Severity::Error | Severity::Critical => {
                error!(%source, %advisory, "data quality advisory")
            }
        }
    }
}

/// Appends pipeline events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_success(&self, ctx: &PipelineContext, stats: PipelineStats) {
        self.append_line(&format!(
            "{} ok source={} destination={} rows={} columns={}",
            unix_ts(),
            display_source(ctx),
            ctx.destination.display(),
            stats.output_rows,
            stats.output_columns
        ));
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: Severity, error: &PipelineError) {
        self.append_line(&format!(
            "{} fail severity={:?} source={} err={}",
            unix_ts(),
            severity,
            display_source(ctx),
            error
        ));
    }

    fn on_alert(&self, ctx: &PipelineContext, severity: Severity, error: &PipelineError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} source={} err={}",
            unix_ts(),
            severity,
            display_source(ctx),
            error
        ));
    }

    fn on_advisory(&self, ctx: &PipelineContext, advisory: &Advisory) {
        self.append_line(&format!(
            "{} advisory severity={:?} source={} msg={}",
            unix_ts(),
            advisory.severity(),
            display_source(ctx),
            advisory
        ));
    }
}

fn display_source(ctx: &PipelineContext) -> String {
    ctx.source
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<undiscovered>".to_string())
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_and_missing_directories_are_critical() {
        let io = PipelineError::Io(std::io::Error::other("disk"));
        assert_eq!(severity_for_error(&io), Severity::Critical);
        let missing = PipelineError::DirectoryMissing {
            path: PathBuf::from("data/raw"),
        };
        assert_eq!(severity_for_error(&missing), Severity::Critical);
        let unsupported = PipelineError::UnsupportedFormat {
            path: PathBuf::from("x.json"),
            extension: "json".to_string(),
        };
        assert_eq!(severity_for_error(&unsupported), Severity::Error);
    }

    #[test]
    fn positional_fallback_is_a_warning() {
        let positional = Advisory::FallbackValueUsed {
            source: TotalValueSource::Positional { column: None },
        };
        let derived = Advisory::FallbackValueUsed {
            source: TotalValueSource::Product {
                quantity: "cantidad".to_string(),
                price: "precio".to_string(),
            },
        };
        assert_eq!(positional.severity(), Severity::Warning);
        assert_eq!(derived.severity(), Severity::Info);
        assert_eq!(derived.to_string(), "total value derived as cantidad x precio");
    }

    #[derive(Clone, Default)]
    struct LevelRecorder(Arc<Mutex<Vec<tracing::Level>>>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LevelRecorder {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            self.0.lock().unwrap().push(*event.metadata().level());
        }
    }

    #[test]
    fn tracing_observer_logs_advisories_at_their_severity() {
        use tracing_subscriber::layer::SubscriberExt;

        let recorder = LevelRecorder::default();
        let subscriber = tracing_subscriber::registry().with(recorder.clone());
        let ctx = PipelineContext {
            source: Some(PathBuf::from("ventas.csv")),
            destination: PathBuf::from("out.csv"),
        };

        tracing::subscriber::with_default(subscriber, || {
            TracingObserver.on_advisory(
                &ctx,
                &Advisory::FallbackValueUsed {
                    source: TotalValueSource::Product {
                        quantity: "cantidad".to_string(),
                        price: "precio".to_string(),
                    },
                },
            );
            TracingObserver.on_advisory(
                &ctx,
                &Advisory::FallbackValueUsed {
                    source: TotalValueSource::Positional { column: None },
                },
            );
        });

        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![tracing::Level::INFO, tracing::Level::WARN]
        );
    }

    #[test]
    fn file_observer_appends_lines() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("sales-conform-observer-{nanos}.log"));
        let obs = FileObserver::new(&path);
        let ctx = PipelineContext {
            source: Some(PathBuf::from("ventas.csv")),
            destination: PathBuf::from("out.csv"),
        };
        obs.on_success(
            &ctx,
            PipelineStats {
                raw_rows: 3,
                output_rows: 2,
                output_columns: 5,
            },
        );
        obs.on_advisory(
            &ctx,
            &Advisory::FallbackValueUsed {
                source: TotalValueSource::Positional { column: None },
            },
        );

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("ok source=ventas.csv"));
        assert!(lines[1].contains("advisory severity=Warning"));
        let _ = std::fs::remove_file(&path);
    }
}
