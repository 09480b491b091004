//! Feature properties serializer.
//!
//! Builds the `properties.json` companion of the SVG: one record per
//! labelled group name and one per marker, keyed by the same synthetic
//! feature keys the SVG titles reference.
//!
//! ```text
//! {
//!   "features": {
//!     "group_1_name": { "name": "vagus", "type": "nerve" },
//!     "marker_12": { "models": "UBERON:0002079", "name": "left atrium", "type": "nerve" }
//!   }
//! }
//! ```
//!
//! Output is deterministic: the feature map is a [`BTreeMap`] and record
//! fields are declared in alphabetical order, so every object's keys are
//! sorted regardless of discovery order.

use std::collections::BTreeMap;

use serde::Serialize;

use flatmap_pipeline::{GroupedSegments, Marker};

/// Annotation type of a feature record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Neural pathway annotation; every exported feature is tagged so.
    Nerve,
}

/// One annotated feature.
///
/// Fields are declared alphabetically so serialization order matches
/// sorted-key output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    /// Ontology identifier (markers only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<String>,
    /// Display name.
    pub name: String,
    /// Annotation type.
    #[serde(rename = "type")]
    pub kind: FeatureKind,
}

/// Root of `properties.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureProperties {
    /// Features by synthetic key (`group_<i>_name`, `marker_<node id>`).
    pub features: BTreeMap<String, Feature>,
}

impl FeatureProperties {
    /// Returns `true` if there are no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Build feature records for every labelled group and every marker.
///
/// Groups that received no curves still get a record; the properties
/// file lists every labelled group name.
#[must_use]
pub fn build_properties(groups: &GroupedSegments, markers: &[Marker]) -> FeatureProperties {
    let group_features = groups.labels().map(|label| {
        (
            label.name_key(),
            Feature {
                models: None,
                name: label.name.clone(),
                kind: FeatureKind::Nerve,
            },
        )
    });
    let marker_features = markers.iter().map(|marker| {
        (
            marker.feature_key(),
            Feature {
                models: Some(marker.ontology_id.clone()),
                name: marker.name.clone(),
                kind: FeatureKind::Nerve,
            },
        )
    });

    FeatureProperties {
        features: group_features.chain(marker_features).collect(),
    }
}

/// Serialize properties as pretty-printed JSON (2-space indent, no
/// trailing newline).
///
/// # Errors
///
/// Returns the underlying [`serde_json::Error`] if serialization fails.
pub fn to_json(properties: &FeatureProperties) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(properties)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use flatmap_pipeline::{CurveGroup, GroupLabel, HermiteSegment, NodeId, Point};

    use super::*;

    fn group(index: usize, name: &str, segments: usize) -> CurveGroup {
        CurveGroup {
            label: GroupLabel::new(index, name),
            segments: vec![HermiteSegment::default(); segments],
        }
    }

    fn marker(node: u32, name: &str, id: &str) -> Marker {
        Marker {
            node: NodeId(node),
            position: Point::new(0.0, 0.0),
            name: name.to_owned(),
            ontology_id: id.to_owned(),
        }
    }

    #[test]
    fn empty_input_gives_empty_features() {
        let properties = build_properties(&GroupedSegments::default(), &[]);
        assert!(properties.is_empty());
        assert_eq!(to_json(&properties).unwrap(), "{\n  \"features\": {}\n}");
    }

    #[test]
    fn group_record_has_name_and_type() {
        let grouped = GroupedSegments {
            ungrouped: vec![],
            groups: vec![group(2, "vagus", 1)],
        };
        let json = to_json(&build_properties(&grouped, &[])).unwrap();
        let expected = r#"{
  "features": {
    "group_2_name": {
      "name": "vagus",
      "type": "nerve"
    }
  }
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn marker_record_carries_ontology_id() {
        let json = to_json(&build_properties(
            &GroupedSegments::default(),
            &[marker(12, "left atrium", "UBERON:0002079")],
        ))
        .unwrap();
        let expected = r#"{
  "features": {
    "marker_12": {
      "models": "UBERON:0002079",
      "name": "left atrium",
      "type": "nerve"
    }
  }
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn empty_groups_still_listed() {
        let grouped = GroupedSegments {
            ungrouped: vec![],
            groups: vec![group(1, "unused", 0)],
        };
        let properties = build_properties(&grouped, &[]);
        assert!(properties.features.contains_key("group_1_name"));
    }

    #[test]
    fn keys_sorted_regardless_of_discovery_order() {
        let grouped = GroupedSegments {
            ungrouped: vec![],
            groups: vec![group(3, "c", 1), group(1, "a", 1)],
        };
        let markers = [marker(9, "z", "UBERON:1"), marker(2, "y", "UBERON:2")];
        let json = to_json(&build_properties(&grouped, &markers)).unwrap();

        let positions: Vec<usize> = [
            "\"group_1_name\"",
            "\"group_3_name\"",
            "\"marker_2\"",
            "\"marker_9\"",
        ]
        .iter()
        .map(|key| json.find(key).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    }

    #[test]
    fn ungrouped_segments_produce_no_record() {
        let grouped = GroupedSegments {
            ungrouped: vec![HermiteSegment::default()],
            groups: vec![],
        };
        assert!(build_properties(&grouped, &[]).is_empty());
    }
}
