//! Hermite to Bezier conversion.
//!
//! A cubic Hermite segment with end positions `h0`, `h1` and tangents
//! `v0`, `v1` becomes the cubic Bezier
//!
//! ```text
//! b0 = h0
//! b1 = h0 - v0 / 3
//! b2 = h1 - v1 / 3
//! b3 = h1
//! ```
//!
//! using only the first two components of each vector.  Both inner
//! control points step back along their node's tangent, so a segment
//! from `(0, 0)` to `(10, 0)` with tangents `(3, 0)` has control
//! points `(-1, 0)` and `(9, 0)`.
//!
//! Tangents are not clamped or normalized: long derivatives give
//! equally long control point excursions.

use tracing::debug;

use crate::types::{BezierCurve, BezierGroup, GroupKey, GroupedSegments, HermiteSegment, Point};

/// Convert one Hermite segment to a cubic Bezier curve.
///
/// Returns `None` for a degenerate segment: any missing vector, or a
/// vector with fewer than two components.
#[must_use]
pub fn hermite_to_bezier(segment: &HermiteSegment) -> Option<BezierCurve> {
    let (h0, v0) = segment.start.planar()?;
    let (h1, v1) = segment.end.planar()?;

    Some(BezierCurve::new(
        h0,
        Point::new(h0.x - v0.x / 3.0, h0.y - v0.y / 3.0),
        Point::new(h1.x - v1.x / 3.0, h1.y - v1.y / 3.0),
        h1,
    ))
}

/// Convert every group's segments, dropping empty groups.
///
/// The ungrouped curves come first, followed by labelled groups in
/// enumeration order.  Degenerate segments are dropped; a group left
/// with no curves is omitted.
#[must_use]
pub fn convert_groups(grouped: &GroupedSegments) -> Vec<BezierGroup> {
    std::iter::once((GroupKey::Ungrouped, grouped.ungrouped.as_slice()))
        .chain(
            grouped
                .groups
                .iter()
                .map(|g| (GroupKey::Labeled(g.label.clone()), g.segments.as_slice())),
        )
        .filter_map(|(key, segments)| {
            let curves = convert_segments(segments);
            (!curves.is_empty()).then_some(BezierGroup { key, curves })
        })
        .collect()
}

fn convert_segments(segments: &[HermiteSegment]) -> Vec<BezierCurve> {
    segments
        .iter()
        .filter_map(|segment| {
            let curve = hermite_to_bezier(segment);
            if curve.is_none() {
                debug!("dropping degenerate Hermite segment");
            }
            curve
        })
        .collect()
}
