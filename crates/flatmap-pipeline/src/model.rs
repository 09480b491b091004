//! Read-only query surface of the finite-element modelling engine.
//!
//! The pipeline never owns or mutates mesh state.  Everything it needs
//! from the modelling engine is expressed by the [`FieldModel`] trait:
//! field lookup, 1-D mesh iteration, element field templates, nodal
//! parameter retrieval, group containment and data point evaluation.
//!
//! [`MemoryModel`](crate::memory::MemoryModel) is the in-crate
//! implementation used by tests and the command-line tool.  Bindings to
//! a real modelling engine implement the same trait.

use serde::{Deserialize, Serialize};

/// Identifier of a mesh element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u32);

/// Identifier of a node or data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Which stored nodal parameter set to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValueLabel {
    /// The field value.
    Value,
    /// First derivative with respect to the element's first direction.
    DS1,
}

/// One term of an element field template function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// 0-based local node index within the element.
    pub local_node: usize,
    /// Version of the nodal parameter to read.
    pub version: u32,
}

impl Term {
    /// Create a term reading `version` at local node `local_node`.
    #[must_use]
    pub const fn new(local_node: usize, version: u32) -> Self {
        Self {
            local_node,
            version,
        }
    }
}

/// How nodal parameters combine into a field over one element.
///
/// Each function is an ordered list of terms.  Function and term
/// indices are 0-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementFieldTemplate {
    functions: Vec<Vec<Term>>,
}

impl ElementFieldTemplate {
    /// Number of functions the simple Hermite layout requires.
    pub const HERMITE_FUNCTION_COUNT: usize = 4;

    /// Create a template from its functions.
    #[must_use]
    pub const fn new(functions: Vec<Vec<Term>>) -> Self {
        Self { functions }
    }

    /// Cubic Hermite on two nodes, one term per function:
    /// value and derivative at local node 0, then at local node 1,
    /// all at version 1.
    #[must_use]
    pub fn cubic_hermite() -> Self {
        Self::new(vec![
            vec![Term::new(0, 1)],
            vec![Term::new(0, 1)],
            vec![Term::new(1, 1)],
            vec![Term::new(1, 1)],
        ])
    }

    /// Number of interpolation functions.
    #[must_use]
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Number of terms contributing to `function`, or 0 if out of range.
    #[must_use]
    pub fn function_term_count(&self, function: usize) -> usize {
        self.functions.get(function).map_or(0, Vec::len)
    }

    /// Local node index of a term.
    #[must_use]
    pub fn term_local_node(&self, function: usize, term: usize) -> Option<usize> {
        self.term(function, term).map(|t| t.local_node)
    }

    /// Nodal parameter version of a term.
    #[must_use]
    pub fn term_node_version(&self, function: usize, term: usize) -> Option<u32> {
        self.term(function, term).map(|t| t.version)
    }

    /// Whether this template has the simple Hermite shape: exactly
    /// four functions, each with exactly one term.
    ///
    /// Only templates of this shape can be read with the fixed
    /// function-to-end mapping used by the parameter extractor.
    #[must_use]
    pub fn is_simple_hermite(&self) -> bool {
        self.function_count() == Self::HERMITE_FUNCTION_COUNT
            && (0..self.function_count()).all(|f| self.function_term_count(f) == 1)
    }

    fn term(&self, function: usize, term: usize) -> Option<&Term> {
        self.functions.get(function)?.get(term)
    }
}

/// Read-only queries the pipeline needs from the modelling engine.
///
/// Every lookup degrades to `None`, `false` or an empty result instead
/// of failing, so extraction always produces a best-effort export.
pub trait FieldModel {
    /// Whether a field with this name exists.
    fn has_field(&self, name: &str) -> bool;

    /// Whether the named field exists and is finite-element interpolated.
    fn is_finite_element_field(&self, name: &str) -> bool;

    /// Elements of the mesh of the given dimension, in iteration order.
    ///
    /// Returns `None` when no such mesh exists.
    fn mesh_elements(&self, dimension: u8) -> Option<Vec<ElementId>>;

    /// Template of `field` over `element`.
    fn element_field_template(
        &self,
        element: ElementId,
        field: &str,
    ) -> Option<&ElementFieldTemplate>;

    /// Node at a local index of an element.
    fn element_node(&self, element: ElementId, local_node: usize) -> Option<NodeId>;

    /// Stored nodal parameters of `field` at `node`.
    ///
    /// Returns `None` when the engine does not report success.
    fn node_parameters(
        &self,
        node: NodeId,
        field: &str,
        label: ValueLabel,
        version: u32,
    ) -> Option<Vec<f64>>;

    /// Names of all groups, in enumeration order.
    fn group_names(&self) -> Vec<String>;

    /// Whether the group's mesh restriction contains `element`.
    fn group_contains_element(&self, group: &str, element: ElementId) -> bool;

    /// Data points of the group's data point restriction, in iteration
    /// order.
    ///
    /// Returns `None` when no group with that name exists.
    fn group_datapoints(&self, group: &str) -> Option<Vec<NodeId>>;

    /// Evaluate a real-valued field at a data point.
    fn evaluate_real(&self, field: &str, point: NodeId) -> Option<Vec<f64>>;

    /// Evaluate a string-valued field at a data point.
    fn evaluate_string(&self, field: &str, point: NodeId) -> Option<String>;
}
