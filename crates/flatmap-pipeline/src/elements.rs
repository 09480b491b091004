//! Element analysis: collect Hermite segments from the 1-D mesh and
//! partition them by group.
//!
//! Groups are labelled `group_<i>` by their 1-based position in the
//! modelling engine's enumeration.  The reserved marker group receives
//! no label but still consumes its position, so labels stay stable
//! whether or not markers are present.
//!
//! Only elements whose coordinate template has the simple Hermite shape
//! (see [`ElementFieldTemplate::is_simple_hermite`]) produce segments.
//! Other elements are skipped without error; the skip is visible only
//! as a `debug` event.

use tracing::{debug, info};

use crate::model::{ElementFieldTemplate, ElementId, FieldModel};
use crate::parameters::{ElementEnd, end_parameters};
use crate::types::{CurveGroup, GroupLabel, GroupedSegments, HermiteSegment};

/// Topological dimension of the curve mesh.
pub const CURVE_MESH_DIMENSION: u8 = 1;

/// Extract a Hermite segment from every simple Hermite element of the
/// 1-D mesh and assign it to each group containing the element.
///
/// Returns an empty result when the mesh is missing or empty, or when
/// `coordinate_field` is not a finite-element field.  A segment whose
/// element no labelled group contains goes to
/// [`GroupedSegments::ungrouped`].  Overlapping groups each receive a
/// copy of the segment.
pub fn analyze_elements<M: FieldModel + ?Sized>(
    model: &M,
    coordinate_field: &str,
    reserved_group: &str,
) -> GroupedSegments {
    let Some(elements) = model.mesh_elements(CURVE_MESH_DIMENSION) else {
        debug!("no 1-D mesh; nothing to analyze");
        return GroupedSegments::default();
    };
    if elements.is_empty() {
        debug!("1-D mesh is empty; nothing to analyze");
        return GroupedSegments::default();
    }
    if !model.is_finite_element_field(coordinate_field) {
        debug!(field = coordinate_field, "coordinate field missing or not finite-element");
        return GroupedSegments::default();
    }

    let mut groups = label_groups(&model.group_names(), reserved_group);
    let mut ungrouped = Vec::new();
    let mut skipped = 0_usize;

    for &element in &elements {
        let Some(template) = model
            .element_field_template(element, coordinate_field)
            .filter(|t| t.is_simple_hermite())
        else {
            debug!(element = element.0, "skipping element without simple Hermite template");
            skipped += 1;
            continue;
        };

        let segment = element_segment(model, element, template, coordinate_field);

        let mut in_group = false;
        for group in &mut groups {
            if model.group_contains_element(&group.label.name, element) {
                group.segments.push(segment.clone());
                in_group = true;
            }
        }
        if !in_group {
            ungrouped.push(segment);
        }
    }

    let result = GroupedSegments { ungrouped, groups };
    info!(
        elements = elements.len(),
        skipped,
        groups = result.groups.len(),
        ungrouped = result.ungrouped.len(),
        "analyzed 1-D mesh"
    );
    result
}

/// Assign `group_<i>` labels in enumeration order, leaving out the
/// reserved group without renumbering the rest.
fn label_groups(names: &[String], reserved_group: &str) -> Vec<CurveGroup> {
    names
        .iter()
        .enumerate()
        .filter(|(_, name)| name.as_str() != reserved_group)
        .map(|(i, name)| CurveGroup {
            label: GroupLabel::new(i + 1, name.as_str()),
            segments: Vec::new(),
        })
        .collect()
}

fn element_segment<M: FieldModel + ?Sized>(
    model: &M,
    element: ElementId,
    template: &ElementFieldTemplate,
    field: &str,
) -> HermiteSegment {
    HermiteSegment::new(
        end_parameters(model, element, template, field, ElementEnd::First),
        end_parameters(model, element, template, field, ElementEnd::Second),
    )
}
