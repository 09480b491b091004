//! flatmap-pipeline: Pure curve and marker extraction (sans-IO).
//!
//! Reads a 1-D cubic Hermite mesh and its marker data points through
//! the read-only [`FieldModel`] query trait and produces flatmap
//! geometry:
//! element analysis -> Hermite to Bezier conversion, plus marker
//! extraction.
//!
//! This crate has **no I/O dependencies** -- it queries an in-memory
//! model and returns structured data. Serialization lives in
//! `flatmap-export` and file output in `flatmap-io`.

pub mod bezier;
pub mod elements;
pub mod identifier;
pub mod markers;
pub mod memory;
pub mod model;
pub mod parameters;
pub mod types;

pub use identifier::{IdentifierSource, IdentifierStrategyKind};
pub use memory::{FieldKind, MemoryModel, ModelError};
pub use model::{ElementFieldTemplate, ElementId, FieldModel, NodeId, Term, ValueLabel};
pub use types::{
    BezierCurve, BezierGroup, CurveGroup, FlatmapConfig, FlatmapResult, GroupKey, GroupLabel,
    GroupedSegments, HermiteSegment, Marker, NodeParameters, Point,
};

/// Run the full extraction pipeline.
///
/// Fallback marker identifiers come from a fresh source built from
/// [`FlatmapConfig::identifier_strategy`].  Use [`process_with`] to
/// supply a source directly.
///
/// # Pipeline steps
///
/// 1. Element analysis: Hermite segments from the 1-D mesh, grouped
/// 2. Marker extraction from the marker group's data points
/// 3. Hermite to Bezier conversion of every non-empty group
///
/// Never fails: missing fields, groups or parameters degrade to empty
/// or partial results.
#[must_use]
pub fn process<M: FieldModel + ?Sized>(model: &M, config: &FlatmapConfig) -> FlatmapResult {
    let mut ids = config.identifier_strategy.source();
    process_with(model, config, ids.as_mut())
}

/// Run the full extraction pipeline with an explicit identifier source.
#[must_use]
pub fn process_with<M: FieldModel + ?Sized>(
    model: &M,
    config: &FlatmapConfig,
    ids: &mut dyn IdentifierSource,
) -> FlatmapResult {
    // 1. Element analysis.
    let groups = elements::analyze_elements(
        model,
        &config.coordinate_field,
        &config.reserved_group_name,
    );

    // 2. Marker extraction.
    let markers = markers::extract_markers(model, config, ids);

    // 3. Bezier conversion.
    let curves = bezier::convert_groups(&groups);

    FlatmapResult {
        groups,
        curves,
        markers,
    }
}
