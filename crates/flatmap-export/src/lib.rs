//! flatmap-export: Pure format serializers (sans-IO)
//!
//! Converts pipeline output into the two flatmap files: an SVG drawing
//! of the curves and markers, and a `properties.json` describing each
//! annotated feature.

pub mod properties;
pub mod svg;

pub use properties::{Feature, FeatureKind, FeatureProperties, build_properties, to_json};
pub use svg::{build_path_data, to_svg};
