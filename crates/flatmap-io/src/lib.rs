//! flatmap-io: Filesystem output for flatmap exports.
//!
//! Runs the pure pipeline and serializers, then writes `<prefix>.svg`
//! and `properties.json` into an output directory.  This is the only
//! crate that touches the filesystem.

pub mod write;

use std::path::PathBuf;

use flatmap_pipeline::{FieldModel, FlatmapConfig};
use tracing::info;

pub use write::{OutputPaths, PROPERTIES_FILE_NAME, WriteError, write_outputs};

/// Where and under which name to write an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Directory receiving both files (created if missing).
    pub output_dir: PathBuf,
    /// SVG file stem; the drawing is written to `<prefix>.svg`.
    pub prefix: String,
}

impl ExportOptions {
    /// Default SVG file stem.
    pub const DEFAULT_PREFIX: &'static str = "flatmap";

    /// Options for `output_dir` with the default prefix.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: Self::DEFAULT_PREFIX.to_owned(),
        }
    }
}

/// Export a model as a flatmap: extract, serialize and write.
///
/// # Errors
///
/// Only filesystem and serialization failures escape; malformed or
/// missing source data degrades to a partial export instead.
pub fn export<M: FieldModel + ?Sized>(
    model: &M,
    config: &FlatmapConfig,
    options: &ExportOptions,
) -> Result<OutputPaths, WriteError> {
    let result = flatmap_pipeline::process(model, config);
    info!(
        curve_groups = result.curves.len(),
        markers = result.markers.len(),
        "extracted flatmap"
    );

    let svg = flatmap_export::to_svg(&result.curves, &result.markers);
    let properties = flatmap_export::build_properties(&result.groups, &result.markers);
    let properties_json = flatmap_export::to_json(&properties)?;

    write_outputs(&options.output_dir, &options.prefix, &svg, &properties_json)
}
