//! File output for the two flatmap artifacts.
//!
//! Writes `<prefix>.svg` and `properties.json` into an output directory,
//! creating the directory if needed.  The SVG is written first.  The two
//! writes are not transactional: if the properties write fails, the SVG
//! may already be on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

/// File name of the feature properties document.
pub const PROPERTIES_FILE_NAME: &str = "properties.json";

/// Errors that can occur when writing flatmap outputs.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An output file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The properties document could not be serialized.
    #[error("failed to serialize properties: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Paths of the files written by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// The SVG drawing.
    pub svg: PathBuf,
    /// The feature properties JSON.
    pub properties: PathBuf,
}

impl OutputPaths {
    /// Paths for `prefix` inside `output_dir`.
    #[must_use]
    pub fn new(output_dir: &Path, prefix: &str) -> Self {
        Self {
            svg: output_dir.join(format!("{prefix}.svg")),
            properties: output_dir.join(PROPERTIES_FILE_NAME),
        }
    }
}

/// Write serialized SVG and properties documents.
///
/// # Errors
///
/// Returns [`WriteError::CreateDir`] if `output_dir` cannot be created
/// and [`WriteError::Write`] for the first file that cannot be written.
pub fn write_outputs(
    output_dir: &Path,
    prefix: &str,
    svg: &str,
    properties_json: &str,
) -> Result<OutputPaths, WriteError> {
    fs::create_dir_all(output_dir).map_err(|source| WriteError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let paths = OutputPaths::new(output_dir, prefix);
    write_file(&paths.svg, svg)?;
    write_file(&paths.properties, properties_json)?;

    info!(
        svg = %paths.svg.display(),
        properties = %paths.properties.display(),
        "wrote flatmap outputs"
    );
    Ok(paths)
}

fn write_file(path: &Path, contents: &str) -> Result<(), WriteError> {
    fs::write(path, contents).map_err(|source| WriteError::Write {
        path: path.to_path_buf(),
        source,
    })
}
