//! Parameter extraction: value and derivative vectors at an element end.
//!
//! A simple cubic Hermite template on two nodes has four single-term
//! functions.  Functions 0 and 1 carry the value and `D_DS1`
//! derivative at the first end, functions 2 and 3 at the second end.
//! The node is the local node of the value function's term; each
//! parameter is read at the version recorded in its own term.

use crate::model::{ElementFieldTemplate, ElementId, FieldModel, ValueLabel};
use crate::types::NodeParameters;

/// Which end of a 1-D element to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementEnd {
    /// The end described by template functions 0 and 1.
    First,
    /// The end described by template functions 2 and 3.
    Second,
}

impl ElementEnd {
    /// Template function holding this end's value term.
    #[must_use]
    pub const fn value_function(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 2,
        }
    }

    /// Template function holding this end's derivative term.
    #[must_use]
    pub const fn derivative_function(self) -> usize {
        self.value_function() + 1
    }
}

/// Read the coordinate field's value and `D_DS1` vectors at one end of
/// an element.
///
/// Never fails: an unresolvable node yields both vectors `None`, and a
/// parameter the model cannot retrieve yields `None` for that vector
/// alone.  Callers treat such segments as degenerate.
pub fn end_parameters<M: FieldModel + ?Sized>(
    model: &M,
    element: ElementId,
    template: &ElementFieldTemplate,
    field: &str,
    end: ElementEnd,
) -> NodeParameters {
    let value_function = end.value_function();
    let derivative_function = end.derivative_function();

    let Some(node) = template
        .term_local_node(value_function, 0)
        .and_then(|local| model.element_node(element, local))
    else {
        return NodeParameters::default();
    };

    let values = template
        .term_node_version(value_function, 0)
        .and_then(|version| model.node_parameters(node, field, ValueLabel::Value, version));
    let derivatives = template
        .term_node_version(derivative_function, 0)
        .and_then(|version| model.node_parameters(node, field, ValueLabel::DS1, version));

    NodeParameters {
        values,
        derivatives,
    }
}
