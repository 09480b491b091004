//! SVG export serializer.
//!
//! Converts Bezier curve groups and markers into an SVG string using
//! the [`svg`] crate for document construction and XML escaping.
//!
//! Layout of the document:
//!
//! - a fixed `1000 x 1000` canvas,
//! - ungrouped curves as bare `<path>` elements,
//! - one `<g>` per labelled group, opened by a `<title>` that references
//!   the group's feature key (`.id(group_<i>_name)`),
//! - one orange `<circle>` per marker with its own `<title>`.
//!
//! Titles share one running `title<N>` id counter, groups before
//! markers, so the output is stable for a fixed input.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::{Circle, Group, Path, Title};

use flatmap_pipeline::{BezierCurve, BezierGroup, GroupKey, Marker};

/// Canvas width and height in user units.
pub const CANVAS_SIZE: u32 = 1000;

/// Stroke colour of every curve path.
const CURVE_STROKE: &str = "blue";
/// Fill opacity of every curve path (unfilled).
const CURVE_FILL_OPACITY: &str = "0.0";
/// Marker circle radius in user units.
const MARKER_RADIUS: u32 = 3;
/// Marker circle fill colour.
const MARKER_FILL: &str = "orange";

/// Build an SVG path `d` attribute string for one cubic Bezier curve.
///
/// The curve becomes a single move-to plus cubic command,
/// `M x0 y0 C x1 y1, x2 y2, x3 y3`.  Coordinates use the shortest
/// `f64` representation that round-trips.
///
/// # Examples
///
/// ```
/// use flatmap_pipeline::{BezierCurve, Point};
/// use flatmap_export::build_path_data;
///
/// let curve = BezierCurve::new(
///     Point::new(0.0, 0.0),
///     Point::new(-1.0, 0.0),
///     Point::new(9.0, 0.0),
///     Point::new(10.0, 0.0),
/// );
/// assert_eq!(build_path_data(&curve), "M 0 0 C -1 0, 9 0, 10 0");
/// ```
#[must_use]
pub fn build_path_data(curve: &BezierCurve) -> String {
    let [b0, b1, b2, b3] = curve.points;
    format!(
        "M {} {} C {} {}, {} {}, {} {}",
        b0.x, b0.y, b1.x, b1.y, b2.x, b2.y, b3.x, b3.y
    )
}

/// Running `title<N>` id generator shared by group and marker titles.
#[derive(Debug, Default)]
struct TitleIds(u32);

impl TitleIds {
    fn next_title(&mut self, text: String) -> Title {
        self.0 += 1;
        Title::new(text).set("id", format!("title{}", self.0))
    }
}

fn curve_path(curve: &BezierCurve) -> Path {
    Path::new()
        .set("d", build_path_data(curve))
        .set("stroke", CURVE_STROKE)
        .set("fill-opacity", CURVE_FILL_OPACITY)
}

/// Annotation text referencing a feature key in the properties file.
fn feature_reference(key: &str) -> String {
    format!(".id({key})")
}

/// Serialize curve groups and markers into an SVG document string.
///
/// `curves` is emitted in the given order; [`GroupKey::Ungrouped`]
/// curves become bare paths and every labelled group becomes a `<g>`.
/// An empty group is still emitted as a titled `<g>` when passed in,
/// although the pipeline never produces one.
///
/// With no curves and no markers the document is a self-closing
/// `<svg .../>` root.
///
/// # Examples
///
/// ```
/// use flatmap_export::to_svg;
///
/// let svg = to_svg(&[], &[]);
/// assert!(svg.contains(r#"viewBox="0 0 1000 1000""#));
/// assert!(!svg.contains("<path"));
/// ```
#[must_use]
pub fn to_svg(curves: &[BezierGroup], markers: &[Marker]) -> String {
    let mut doc = Document::new()
        .set("width", CANVAS_SIZE)
        .set("height", CANVAS_SIZE)
        .set("viewBox", (0, 0, CANVAS_SIZE, CANVAS_SIZE));
    let mut titles = TitleIds::default();

    for group in curves {
        match &group.key {
            GroupKey::Ungrouped => {
                for curve in &group.curves {
                    doc = doc.add(curve_path(curve));
                }
            }
            GroupKey::Labeled(label) => {
                let mut element =
                    Group::new().add(titles.next_title(feature_reference(&label.name_key())));
                for curve in &group.curves {
                    element = element.add(curve_path(curve));
                }
                doc = doc.add(element);
            }
        }
    }

    for marker in markers {
        let circle = Circle::new()
            .set("cx", marker.position.x)
            .set("cy", marker.position.y)
            .set("r", MARKER_RADIUS)
            .set("fill", MARKER_FILL)
            .add(titles.next_title(feature_reference(&marker.feature_key())));
        doc = doc.add(circle);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
