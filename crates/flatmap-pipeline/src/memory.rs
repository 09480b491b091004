//! In-memory implementation of [`FieldModel`].
//!
//! [`MemoryModel`] stores exactly the data the pipeline queries: field
//! kinds, 1-D elements with their nodes and templates, nodal parameter
//! sets, data point field values and groups.  It performs no modelling
//! of its own.
//!
//! The model is serde-serializable.  Its JSON form is the snapshot
//! format read by the `flatmap` command-line tool; [`MemoryModel::from_json`]
//! checks referential integrity after parsing.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::{ElementFieldTemplate, ElementId, FieldModel, NodeId, ValueLabel};

/// Kind of a stored field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Finite-element interpolated real field.
    FiniteElement,
    /// String-valued field (e.g. marker names).
    String,
    /// Any other computed field.
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct MemoryElement {
    dimension: u8,
    nodes: Vec<NodeId>,
    #[serde(default)]
    templates: BTreeMap<String, ElementFieldTemplate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredParameters {
    field: String,
    label: ValueLabel,
    version: u32,
    values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct MemoryDatapoint {
    real: BTreeMap<String, Vec<f64>>,
    strings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct MemoryGroup {
    name: String,
    #[serde(default)]
    elements: BTreeSet<ElementId>,
    #[serde(default)]
    datapoints: Vec<NodeId>,
}

impl MemoryGroup {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            elements: BTreeSet::new(),
            datapoints: Vec::new(),
        }
    }
}

/// Errors loading a [`MemoryModel`] snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The snapshot is not valid model JSON.
    #[error("invalid model snapshot: {0}")]
    InvalidSnapshot(#[from] serde_json::Error),

    /// An element references a node that is not stored.
    #[error("element {element} references unknown node {node}")]
    UnknownNode {
        /// Referencing element.
        element: u32,
        /// Missing node.
        node: u32,
    },

    /// A group references an element that is not stored.
    #[error("group {group:?} references unknown element {element}")]
    UnknownElement {
        /// Referencing group.
        group: String,
        /// Missing element.
        element: u32,
    },

    /// A group references a data point that is not stored.
    #[error("group {group:?} references unknown data point {point}")]
    UnknownDatapoint {
        /// Referencing group.
        group: String,
        /// Missing data point.
        point: u32,
    },
}

/// A self-contained snapshot of everything [`FieldModel`] exposes.
///
/// Built with consuming `with_*` methods:
///
/// ```
/// use flatmap_pipeline::memory::{FieldKind, MemoryModel};
/// use flatmap_pipeline::model::FieldModel;
///
/// let model = MemoryModel::new()
///     .with_field("coordinates", FieldKind::FiniteElement)
///     .with_node(1, "coordinates", vec![0.0, 0.0], vec![3.0, 0.0])
///     .with_node(2, "coordinates", vec![10.0, 0.0], vec![3.0, 0.0])
///     .with_hermite_line(1, [1, 2], "coordinates")
///     .with_group("vagus nerve", [1]);
///
/// assert_eq!(model.group_names(), vec!["vagus nerve".to_owned()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryModel {
    fields: BTreeMap<String, FieldKind>,
    elements: BTreeMap<u32, MemoryElement>,
    nodes: BTreeMap<u32, Vec<StoredParameters>>,
    datapoints: BTreeMap<u32, MemoryDatapoint>,
    groups: Vec<MemoryGroup>,
}

impl MemoryModel {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON snapshot and check that every reference resolves.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidSnapshot`] if the JSON does not
    /// describe a model, or one of the `Unknown*` variants if an element
    /// or group refers to something that is not stored.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Serialize the model as a pretty-printed JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidSnapshot`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that element nodes and group members exist.
    ///
    /// # Errors
    ///
    /// Returns the first dangling reference found.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (id, element) in &self.elements {
            if let Some(node) = element
                .nodes
                .iter()
                .find(|n| !self.nodes.contains_key(&n.0))
            {
                return Err(ModelError::UnknownNode {
                    element: *id,
                    node: node.0,
                });
            }
        }

        for group in &self.groups {
            if let Some(element) = group
                .elements
                .iter()
                .find(|e| !self.elements.contains_key(&e.0))
            {
                return Err(ModelError::UnknownElement {
                    group: group.name.clone(),
                    element: element.0,
                });
            }
            if let Some(point) = group
                .datapoints
                .iter()
                .find(|p| !self.datapoints.contains_key(&p.0))
            {
                return Err(ModelError::UnknownDatapoint {
                    group: group.name.clone(),
                    point: point.0,
                });
            }
        }

        Ok(())
    }

    /// Declare a field.
    #[must_use]
    pub fn with_field(mut self, name: &str, kind: FieldKind) -> Self {
        self.fields.insert(name.to_owned(), kind);
        self
    }

    /// Store the value and `D_DS1` derivative of `field` at a node,
    /// both at version 1.
    #[must_use]
    pub fn with_node(self, id: u32, field: &str, values: Vec<f64>, derivatives: Vec<f64>) -> Self {
        self.with_node_parameters(id, field, ValueLabel::Value, 1, values)
            .with_node_parameters(id, field, ValueLabel::DS1, 1, derivatives)
    }

    /// Store one nodal parameter set, replacing any previous set with
    /// the same field, label and version.
    #[must_use]
    pub fn with_node_parameters(
        mut self,
        id: u32,
        field: &str,
        label: ValueLabel,
        version: u32,
        values: Vec<f64>,
    ) -> Self {
        let stored = self.nodes.entry(id).or_default();
        stored.retain(|p| !(p.field == field && p.label == label && p.version == version));
        stored.push(StoredParameters {
            field: field.to_owned(),
            label,
            version,
            values,
        });
        self
    }

    /// Add a 1-D element on two nodes, with no field templates yet.
    #[must_use]
    pub fn with_line_element(mut self, id: u32, nodes: [u32; 2]) -> Self {
        self.elements.insert(
            id,
            MemoryElement {
                dimension: 1,
                nodes: nodes.iter().copied().map(NodeId).collect(),
                templates: BTreeMap::new(),
            },
        );
        self
    }

    /// Attach a template for `field` to an existing element.
    ///
    /// Has no effect if the element does not exist.
    #[must_use]
    pub fn with_template(mut self, id: u32, field: &str, template: ElementFieldTemplate) -> Self {
        if let Some(element) = self.elements.get_mut(&id) {
            element.templates.insert(field.to_owned(), template);
        }
        self
    }

    /// Add a 1-D cubic Hermite element interpolating `field`.
    #[must_use]
    pub fn with_hermite_line(self, id: u32, nodes: [u32; 2], field: &str) -> Self {
        self.with_line_element(id, nodes)
            .with_template(id, field, ElementFieldTemplate::cubic_hermite())
    }

    /// Add elements to a group, creating the group if needed.
    ///
    /// Groups enumerate in creation order.
    #[must_use]
    pub fn with_group(mut self, name: &str, elements: impl IntoIterator<Item = u32>) -> Self {
        self.group_mut(name)
            .elements
            .extend(elements.into_iter().map(ElementId));
        self
    }

    /// Store a real field value at a data point.
    #[must_use]
    pub fn with_datapoint(mut self, id: u32, field: &str, values: Vec<f64>) -> Self {
        self.datapoints
            .entry(id)
            .or_default()
            .real
            .insert(field.to_owned(), values);
        self
    }

    /// Store a string field value at a data point.
    #[must_use]
    pub fn with_datapoint_string(mut self, id: u32, field: &str, value: &str) -> Self {
        self.datapoints
            .entry(id)
            .or_default()
            .strings
            .insert(field.to_owned(), value.to_owned());
        self
    }

    /// Add data points to a group, creating the group if needed.
    #[must_use]
    pub fn with_group_datapoints(
        mut self,
        name: &str,
        points: impl IntoIterator<Item = u32>,
    ) -> Self {
        self.group_mut(name)
            .datapoints
            .extend(points.into_iter().map(NodeId));
        self
    }

    fn group_mut(&mut self, name: &str) -> &mut MemoryGroup {
        let index = match self.groups.iter().position(|g| g.name == name) {
            Some(index) => index,
            None => {
                self.groups.push(MemoryGroup::new(name));
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    fn group(&self, name: &str) -> Option<&MemoryGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}

impl FieldModel for MemoryModel {
    fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    fn is_finite_element_field(&self, name: &str) -> bool {
        self.fields.get(name) == Some(&FieldKind::FiniteElement)
    }

    fn mesh_elements(&self, dimension: u8) -> Option<Vec<ElementId>> {
        if !(1..=3).contains(&dimension) {
            return None;
        }
        Some(
            self.elements
                .iter()
                .filter(|(_, e)| e.dimension == dimension)
                .map(|(id, _)| ElementId(*id))
                .collect(),
        )
    }

    fn element_field_template(
        &self,
        element: ElementId,
        field: &str,
    ) -> Option<&ElementFieldTemplate> {
        self.elements.get(&element.0)?.templates.get(field)
    }

    fn element_node(&self, element: ElementId, local_node: usize) -> Option<NodeId> {
        self.elements.get(&element.0)?.nodes.get(local_node).copied()
    }

    fn node_parameters(
        &self,
        node: NodeId,
        field: &str,
        label: ValueLabel,
        version: u32,
    ) -> Option<Vec<f64>> {
        self.nodes
            .get(&node.0)?
            .iter()
            .find(|p| p.field == field && p.label == label && p.version == version)
            .map(|p| p.values.clone())
    }

    fn group_names(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.name.clone()).collect()
    }

    fn group_contains_element(&self, group: &str, element: ElementId) -> bool {
        self.group(group)
            .is_some_and(|g| g.elements.contains(&element))
    }

    fn group_datapoints(&self, group: &str) -> Option<Vec<NodeId>> {
        self.group(group).map(|g| g.datapoints.clone())
    }

    fn evaluate_real(&self, field: &str, point: NodeId) -> Option<Vec<f64>> {
        self.datapoints.get(&point.0)?.real.get(field).cloned()
    }

    fn evaluate_string(&self, field: &str, point: NodeId) -> Option<String> {
        self.datapoints.get(&point.0)?.strings.get(field).cloned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn two_node_model() -> MemoryModel {
        MemoryModel::new()
            .with_field("coordinates", FieldKind::FiniteElement)
            .with_node(1, "coordinates", vec![0.0, 0.0], vec![3.0, 0.0])
            .with_node(2, "coordinates", vec![10.0, 0.0], vec![3.0, 0.0])
            .with_hermite_line(7, [1, 2], "coordinates")
    }

    #[test]
    fn field_kinds() {
        let model = two_node_model().with_field("marker_data_name", FieldKind::String);
        assert!(model.is_finite_element_field("coordinates"));
        assert!(model.has_field("marker_data_name"));
        assert!(!model.is_finite_element_field("marker_data_name"));
        assert!(!model.has_field("missing"));
    }

    #[test]
    fn mesh_elements_by_dimension() {
        let model = two_node_model();
        assert_eq!(model.mesh_elements(1), Some(vec![ElementId(7)]));
        assert_eq!(model.mesh_elements(2), Some(vec![]));
        assert_eq!(model.mesh_elements(4), None);
    }

    #[test]
    fn element_nodes_and_parameters() {
        let model = two_node_model();
        assert_eq!(model.element_node(ElementId(7), 1), Some(NodeId(2)));
        assert_eq!(model.element_node(ElementId(7), 2), None);
        assert_eq!(
            model.node_parameters(NodeId(2), "coordinates", ValueLabel::Value, 1),
            Some(vec![10.0, 0.0])
        );
        assert_eq!(
            model.node_parameters(NodeId(2), "coordinates", ValueLabel::DS1, 2),
            None
        );
    }

    #[test]
    fn node_parameters_are_replaced() {
        let model = two_node_model().with_node_parameters(
            1,
            "coordinates",
            ValueLabel::Value,
            1,
            vec![5.0, 5.0],
        );
        assert_eq!(
            model.node_parameters(NodeId(1), "coordinates", ValueLabel::Value, 1),
            Some(vec![5.0, 5.0])
        );
    }

    #[test]
    fn groups_keep_creation_order() {
        let model = two_node_model()
            .with_group("b", [7])
            .with_group("a", [])
            .with_group("b", []);
        assert_eq!(model.group_names(), vec!["b".to_owned(), "a".to_owned()]);
        assert!(model.group_contains_element("b", ElementId(7)));
        assert!(!model.group_contains_element("a", ElementId(7)));
        assert!(!model.group_contains_element("missing", ElementId(7)));
    }

    #[test]
    fn datapoint_queries() {
        let model = MemoryModel::new()
            .with_datapoint(3, "marker_data_coordinates", vec![1.0, 2.0, 3.0])
            .with_datapoint_string(3, "marker_data_name", "left atrium")
            .with_group_datapoints("marker", [3]);
        assert_eq!(model.group_datapoints("marker"), Some(vec![NodeId(3)]));
        assert_eq!(model.group_datapoints("markers"), None);
        assert_eq!(
            model.evaluate_real("marker_data_coordinates", NodeId(3)),
            Some(vec![1.0, 2.0, 3.0])
        );
        assert_eq!(
            model.evaluate_string("marker_data_name", NodeId(3)),
            Some("left atrium".to_owned())
        );
        assert_eq!(model.evaluate_string("marker_data_id", NodeId(3)), None);
    }

    #[test]
    fn json_snapshot_round_trips() {
        let model = two_node_model()
            .with_group("vagus", [7])
            .with_datapoint(3, "marker_data_coordinates", vec![1.0, 2.0])
            .with_group_datapoints("marker", [3]);
        let json = model.to_json().unwrap();
        let parsed = MemoryModel::from_json(&json).unwrap();
        assert_eq!(parsed, model);
    }

    #[test]
    fn from_json_rejects_garbage() {
        let result = MemoryModel::from_json("not json");
        assert!(matches!(result, Err(ModelError::InvalidSnapshot(_))));
    }

    #[test]
    fn validate_reports_dangling_node() {
        let model = MemoryModel::new().with_line_element(1, [1, 2]);
        assert!(matches!(
            model.validate(),
            Err(ModelError::UnknownNode {
                element: 1,
                node: 1
            })
        ));
    }

    #[test]
    fn validate_reports_dangling_group_members() {
        let model = two_node_model().with_group("g", [99]);
        assert!(matches!(
            model.validate(),
            Err(ModelError::UnknownElement { element: 99, .. })
        ));

        let model = two_node_model().with_group_datapoints("marker", [5]);
        assert!(matches!(
            model.validate(),
            Err(ModelError::UnknownDatapoint { point: 5, .. })
        ));
    }
}
