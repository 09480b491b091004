//! Shared types for the flatmap extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::identifier::IdentifierStrategyKind;
use crate::model::NodeId;

/// A 2D point in flatmap coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Build a point from the first two components of a field vector.
    ///
    /// Any further components are ignored; flatmaps are planar.
    /// Returns `None` when fewer than two components are present.
    #[must_use]
    pub fn from_components(components: &[f64]) -> Option<Self> {
        match components {
            [x, y, ..] => Some(Self::new(*x, *y)),
            _ => None,
        }
    }
}

/// Coordinate field value and first derivative at one end node of an
/// element.
///
/// Either vector is `None` when the node could not be resolved or the
/// modelling engine did not report success for that parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeParameters {
    /// Full component vector of the field value (`VALUE` parameter).
    pub values: Option<Vec<f64>>,
    /// Full component vector of the first derivative (`D_DS1` parameter).
    pub derivatives: Option<Vec<f64>>,
}

impl NodeParameters {
    /// Create parameters from known value and derivative vectors.
    #[must_use]
    pub const fn new(values: Vec<f64>, derivatives: Vec<f64>) -> Self {
        Self {
            values: Some(values),
            derivatives: Some(derivatives),
        }
    }

    /// Planar position and tangent, if both vectors carry at least two
    /// components.
    #[must_use]
    pub fn planar(&self) -> Option<(Point, Point)> {
        let position = Point::from_components(self.values.as_deref()?)?;
        let tangent = Point::from_components(self.derivatives.as_deref()?)?;
        Some((position, tangent))
    }
}

/// A cubic Hermite curve piece: position and tangent at both end nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HermiteSegment {
    /// Parameters at the element's first node.
    pub start: NodeParameters,
    /// Parameters at the element's second node.
    pub end: NodeParameters,
}

impl HermiteSegment {
    /// Create a segment from its two end parameter sets.
    #[must_use]
    pub const fn new(start: NodeParameters, end: NodeParameters) -> Self {
        Self { start, end }
    }
}

/// Stable label of a curve group.
///
/// `index` is the 1-based position of the group in the modelling
/// engine's enumeration order.  The reserved marker group still
/// consumes an index, so labels may skip a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLabel {
    /// 1-based enumeration position.
    pub index: usize,
    /// Human-readable group name from the modelling engine.
    pub name: String,
}

impl GroupLabel {
    /// Create a label for the group at 1-based position `index`.
    #[must_use]
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }

    /// Synthetic key of the group's curve list, e.g. `group_3`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("group_{}", self.index)
    }

    /// Synthetic key of the group's name entry, e.g. `group_3_name`.
    ///
    /// This is the feature key used in `properties.json` and referenced
    /// by the group's SVG `<title>`.
    #[must_use]
    pub fn name_key(&self) -> String {
        format!("group_{}_name", self.index)
    }
}

/// Curve segments of one labelled group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGroup {
    /// Group label and display name.
    pub label: GroupLabel,
    /// Segments whose source element the group contains.
    pub segments: Vec<HermiteSegment>,
}

/// Output of element analysis: curve segments partitioned by group.
///
/// A segment appears in every group whose mesh contains its source
/// element, or in `ungrouped` when no group does.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedSegments {
    /// Segments not contained in any labelled group.
    pub ungrouped: Vec<HermiteSegment>,
    /// Labelled groups in enumeration order (including empty ones).
    pub groups: Vec<CurveGroup>,
}

impl GroupedSegments {
    /// Returns `true` if there are no groups and no ungrouped segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ungrouped.is_empty() && self.groups.is_empty()
    }

    /// Look up a labelled group by its synthetic key (`group_<i>`).
    #[must_use]
    pub fn group(&self, key: &str) -> Option<&CurveGroup> {
        self.groups.iter().find(|g| g.label.key() == key)
    }

    /// Labels of all groups, in enumeration order.
    pub fn labels(&self) -> impl Iterator<Item = &GroupLabel> {
        self.groups.iter().map(|g| &g.label)
    }

    /// Total number of segment placements (a segment in two groups
    /// counts twice).
    #[must_use]
    pub fn placement_count(&self) -> usize {
        self.ungrouped.len() + self.groups.iter().map(|g| g.segments.len()).sum::<usize>()
    }
}

/// A cubic Bezier curve: start point, two control points, end point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BezierCurve {
    /// Control points `b0`, `b1`, `b2`, `b3`.
    pub points: [Point; 4],
}

impl BezierCurve {
    /// Create a cubic curve from its four control points.
    #[must_use]
    pub const fn new(b0: Point, b1: Point, b2: Point, b3: Point) -> Self {
        Self {
            points: [b0, b1, b2, b3],
        }
    }

    /// First control point (curve start).
    #[must_use]
    pub const fn start(&self) -> Point {
        self.points[0]
    }

    /// Last control point (curve end).
    #[must_use]
    pub const fn end(&self) -> Point {
        self.points[3]
    }
}

/// Identifies a converted curve group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKey {
    /// Curves not contained in any labelled group.
    Ungrouped,
    /// Curves of a labelled group.
    Labeled(GroupLabel),
}

/// Bezier curves of one non-empty group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BezierGroup {
    /// Which group the curves belong to.
    pub key: GroupKey,
    /// Converted curves, in segment order.
    pub curves: Vec<BezierCurve>,
}

/// A labelled point feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Identifier of the source data point.
    pub node: NodeId,
    /// Planar position.
    pub position: Point,
    /// Display name (synthesized when the source has none).
    pub name: String,
    /// Ontology identifier (synthesized when the source has none).
    pub ontology_id: String,
}

impl Marker {
    /// Synthetic feature key, e.g. `marker_12`.
    #[must_use]
    pub fn feature_key(&self) -> String {
        format!("marker_{}", self.node.0)
    }
}

/// Configuration for the extraction pipeline.
///
/// All field names default to the conventions of the scaffolding
/// tools that produce flatmap source models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatmapConfig {
    /// Coordinate field interpolated over the 1-D mesh.
    pub coordinate_field: String,

    /// Coordinate field evaluated at marker data points.
    pub marker_coordinate_field: String,

    /// Optional string field holding marker display names.
    pub marker_name_field: String,

    /// Optional string field holding marker ontology identifiers.
    pub marker_id_field: String,

    /// Candidate names of the marker group, probed in order.
    pub marker_group_names: Vec<String>,

    /// Group excluded from curve-group labelling.
    pub reserved_group_name: String,

    /// How fallback ontology identifiers are generated.
    pub identifier_strategy: IdentifierStrategyKind,
}

impl FlatmapConfig {
    /// Default coordinate field name.
    pub const DEFAULT_COORDINATE_FIELD: &'static str = "coordinates";
    /// Default marker coordinate field name.
    pub const DEFAULT_MARKER_COORDINATE_FIELD: &'static str = "marker_data_coordinates";
    /// Default marker name field name.
    pub const DEFAULT_MARKER_NAME_FIELD: &'static str = "marker_data_name";
    /// Default marker ontology identifier field name.
    pub const DEFAULT_MARKER_ID_FIELD: &'static str = "marker_data_id";
    /// Default candidate marker group names.
    pub const DEFAULT_MARKER_GROUP_NAMES: [&'static str; 2] = ["marker", "markers"];
    /// Default reserved group name.
    pub const DEFAULT_RESERVED_GROUP_NAME: &'static str = "marker";
}

impl Default for FlatmapConfig {
    fn default() -> Self {
        Self {
            coordinate_field: Self::DEFAULT_COORDINATE_FIELD.to_owned(),
            marker_coordinate_field: Self::DEFAULT_MARKER_COORDINATE_FIELD.to_owned(),
            marker_name_field: Self::DEFAULT_MARKER_NAME_FIELD.to_owned(),
            marker_id_field: Self::DEFAULT_MARKER_ID_FIELD.to_owned(),
            marker_group_names: Self::DEFAULT_MARKER_GROUP_NAMES
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
            reserved_group_name: Self::DEFAULT_RESERVED_GROUP_NAME.to_owned(),
            identifier_strategy: IdentifierStrategyKind::default(),
        }
    }
}

/// Result of running the full extraction pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatmapResult {
    /// Hermite segments partitioned by group.
    pub groups: GroupedSegments,
    /// Non-empty groups converted to Bezier curves.
    pub curves: Vec<BezierGroup>,
    /// Markers in data point iteration order.
    pub markers: Vec<Marker>,
}
