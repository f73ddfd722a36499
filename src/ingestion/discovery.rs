//! Raw-file discovery in the staging directory.
//!
//! The dataset acquisition step drops one or more files into a raw directory; the pipeline reads
//! the first one (by file name) with a supported extension.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{PipelineError, PipelineResult};

use super::unified::SUPPORTED_EXTENSIONS;

/// File name of the processed output under [`DataLayout::under`].
pub const DEFAULT_OUTPUT_FILE: &str = "ventas_lacteos_2024.csv";

/// Default input/output locations of a project checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    /// Directory holding raw input files.
    pub raw_dir: PathBuf,
    /// Default destination of the processed CSV.
    pub destination: PathBuf,
}

impl DataLayout {
    /// Layout rooted at `root`: `root/data/raw` and `root/data/processed/ventas_lacteos_2024.csv`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let data = root.as_ref().join("data");
        Self {
            raw_dir: data.join("raw"),
            destination: data.join("processed").join(DEFAULT_OUTPUT_FILE),
        }
    }

    /// Select the raw input file from [`Self::raw_dir`].
    pub fn discover_source(&self) -> PipelineResult<PathBuf> {
        find_first_compatible_file(&self.raw_dir)
    }
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::under(".")
    }
}

/// Lists the files in `dir` whose extension (case-insensitive) is supported.
///
/// Returns files sorted by file name. Subdirectories are ignored.
pub fn list_compatible_files(dir: &Path) -> PipelineResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PipelineError::DirectoryMissing {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|s| ext.eq_ignore_ascii_case(s))
            })
            .unwrap_or(false);
        if supported {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Returns the first compatible file in `dir` (see [`list_compatible_files`]).
///
/// Fails with [`PipelineError::DirectoryMissing`] if `dir` does not exist and
/// [`PipelineError::NoCompatibleFile`] if it holds no supported file.
pub fn find_first_compatible_file(dir: &Path) -> PipelineResult<PathBuf> {
    let selected = list_compatible_files(dir)?
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::NoCompatibleFile {
            dir: dir.to_path_buf(),
            extensions: SUPPORTED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        })?;

    info!(file = %selected.display(), "raw file selected for transformation");
    Ok(selected)
}
