//! Marker extraction: labelled point features from the marker group.
//!
//! The marker group is the first existing group among the configured
//! candidate names (`marker`, then `markers` by default).  Each of its
//! data points becomes a [`Marker`] carrying:
//!
//! - the first two components of the marker coordinate field,
//! - the marker name field, or `Unnamed marker <k>` where `k` is the
//!   point's 1-based position in iteration order,
//! - the marker id field, or an identifier from the
//!   [`IdentifierSource`] (random by default, so not reproducible).
//!
//! Points whose position cannot be evaluated are skipped but still
//! count towards `k`.

use tracing::{debug, info};

use crate::identifier::IdentifierSource;
use crate::model::{FieldModel, NodeId};
use crate::types::{FlatmapConfig, Marker, Point};

/// Extract markers from the first existing candidate marker group.
///
/// Returns an empty list when no candidate group exists.
pub fn extract_markers<M: FieldModel + ?Sized>(
    model: &M,
    config: &FlatmapConfig,
    ids: &mut dyn IdentifierSource,
) -> Vec<Marker> {
    let Some((group, points)) = config
        .marker_group_names
        .iter()
        .find_map(|name| model.group_datapoints(name).map(|points| (name, points)))
    else {
        debug!("no marker group found");
        return Vec::new();
    };

    let name_field = model
        .has_field(&config.marker_name_field)
        .then_some(config.marker_name_field.as_str());
    let id_field = model
        .has_field(&config.marker_id_field)
        .then_some(config.marker_id_field.as_str());

    let markers: Vec<Marker> = points
        .iter()
        .enumerate()
        .filter_map(|(i, &point)| {
            let position = marker_position(model, &config.marker_coordinate_field, point)?;
            let name = name_field
                .and_then(|field| model.evaluate_string(field, point))
                .unwrap_or_else(|| unnamed_marker(i + 1));
            let ontology_id = id_field
                .and_then(|field| model.evaluate_string(field, point))
                .unwrap_or_else(|| ids.next_identifier());
            Some(Marker {
                node: point,
                position,
                name,
                ontology_id,
            })
        })
        .collect();

    info!(
        group = group.as_str(),
        points = points.len(),
        markers = markers.len(),
        "extracted markers"
    );
    markers
}

/// Fallback display name of the marker at 1-based position `k`.
#[must_use]
pub fn unnamed_marker(k: usize) -> String {
    format!("Unnamed marker {k}")
}

fn marker_position<M: FieldModel + ?Sized>(model: &M, field: &str, point: NodeId) -> Option<Point> {
    let position = model
        .evaluate_real(field, point)
        .and_then(|values| Point::from_components(&values));
    if position.is_none() {
        debug!(point = point.0, field, "skipping marker without planar position");
    }
    position
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::{IdentifierStrategyKind, SYNTHETIC_ID_PREFIX, format_identifier};
    use crate::memory::{FieldKind, MemoryModel};

    const COORDS: &str = "marker_data_coordinates";
    const NAME: &str = "marker_data_name";
    const ID: &str = "marker_data_id";

    /// Hands out `UBERON:9900001`, `UBERON:9900002`, ...
    struct Counting(u32);

    impl IdentifierSource for Counting {
        fn next_identifier(&mut self) -> String {
            self.0 += 1;
            format_identifier(self.0)
        }
    }

    fn unnamed_points(group: &str) -> MemoryModel {
        MemoryModel::new()
            .with_field(COORDS, FieldKind::FiniteElement)
            .with_datapoint(10, COORDS, vec![1.0, 2.0, 3.0])
            .with_datapoint(11, COORDS, vec![4.0, 5.0, 6.0])
            .with_group_datapoints(group, [10, 11])
    }

    #[test]
    fn no_marker_group_gives_no_markers() {
        let model = MemoryModel::new().with_group_datapoints("landmarks", []);
        let markers = extract_markers(&model, &FlatmapConfig::default(), &mut Counting(0));
        assert!(markers.is_empty());
    }

    #[test]
    fn named_markers_keep_source_values() {
        let model = unnamed_points("marker")
            .with_field(NAME, FieldKind::String)
            .with_field(ID, FieldKind::String)
            .with_datapoint_string(10, NAME, "left atrium")
            .with_datapoint_string(10, ID, "UBERON:0002079")
            .with_datapoint_string(11, NAME, "right atrium")
            .with_datapoint_string(11, ID, "UBERON:0002078");
        let markers = extract_markers(&model, &FlatmapConfig::default(), &mut Counting(0));
        assert_eq!(
            markers,
            vec![
                Marker {
                    node: NodeId(10),
                    position: Point::new(1.0, 2.0),
                    name: "left atrium".to_owned(),
                    ontology_id: "UBERON:0002079".to_owned(),
                },
                Marker {
                    node: NodeId(11),
                    position: Point::new(4.0, 5.0),
                    name: "right atrium".to_owned(),
                    ontology_id: "UBERON:0002078".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn missing_name_field_synthesizes_sequential_names() {
        let markers = extract_markers(
            &unnamed_points("marker"),
            &FlatmapConfig::default(),
            &mut Counting(0),
        );
        let names: Vec<&str> = markers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Unnamed marker 1", "Unnamed marker 2"]);
    }

    #[test]
    fn missing_id_field_uses_identifier_source() {
        let markers = extract_markers(
            &unnamed_points("marker"),
            &FlatmapConfig::default(),
            &mut Counting(0),
        );
        let ids: Vec<&str> = markers.iter().map(|m| m.ontology_id.as_str()).collect();
        assert_eq!(ids, vec!["UBERON:9900001", "UBERON:9900002"]);
    }

    #[test]
    fn random_fallback_ids_match_pattern() {
        let mut source = IdentifierStrategyKind::Random.source();
        let markers = extract_markers(
            &unnamed_points("marker"),
            &FlatmapConfig::default(),
            source.as_mut(),
        );
        for marker in &markers {
            let digits = marker
                .ontology_id
                .strip_prefix(SYNTHETIC_ID_PREFIX)
                .unwrap_or_default();
            assert_eq!(digits.len(), 5, "bad id {}", marker.ontology_id);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn plural_group_name_is_found() {
        let markers = extract_markers(
            &unnamed_points("markers"),
            &FlatmapConfig::default(),
            &mut Counting(0),
        );
        assert_eq!(markers.len(), 2);
    }

    #[test]
    fn first_candidate_group_wins() {
        let model = unnamed_points("markers")
            .with_datapoint(20, COORDS, vec![9.0, 9.0])
            .with_group_datapoints("marker", [20]);
        let markers = extract_markers(&model, &FlatmapConfig::default(), &mut Counting(0));
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].node, NodeId(20));
    }

    #[test]
    fn group_lookup_is_case_sensitive() {
        let markers = extract_markers(
            &unnamed_points("Marker"),
            &FlatmapConfig::default(),
            &mut Counting(0),
        );
        assert!(markers.is_empty());
    }

    #[test]
    fn unevaluable_point_is_skipped_but_counted() {
        let model = MemoryModel::new()
            .with_field(COORDS, FieldKind::FiniteElement)
            .with_datapoint(1, COORDS, vec![0.5])
            .with_datapoint(2, COORDS, vec![7.0, 8.0])
            .with_group_datapoints("marker", [1, 2]);
        let markers = extract_markers(&model, &FlatmapConfig::default(), &mut Counting(0));
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].name, "Unnamed marker 2");
        assert_eq!(markers[0].position, Point::new(7.0, 8.0));
    }

    #[test]
    fn name_field_without_value_falls_back() {
        let model = unnamed_points("marker")
            .with_field(NAME, FieldKind::String)
            .with_datapoint_string(11, NAME, "named");
        let markers = extract_markers(&model, &FlatmapConfig::default(), &mut Counting(0));
        assert_eq!(markers[0].name, "Unnamed marker 1");
        assert_eq!(markers[1].name, "named");
    }
}
