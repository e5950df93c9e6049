//! Edit cost policies.
//!
//! An [`EditCost`] prices the three unit operations of tree editing. All
//! methods are pure functions of the supplied nodes; the distance engine and
//! the matrix builders rely on that ([`EditCost::is_symmetric`] in particular
//! lets the matrix builder compute only half the cells).

use crate::tree::NodeData;

/// Pluggable cost policy for tree edit operations.
pub trait EditCost {
    /// Cost of inserting `node`.
    fn insert(&self, node: &NodeData) -> f64;

    /// Cost of removing `node`.
    fn remove(&self, node: &NodeData) -> f64;

    /// Cost of relabeling `from` into `to`.
    fn replace(&self, from: &NodeData, to: &NodeData) -> f64;

    /// Cost when two nodes already carry equal labels.
    fn no_edit(&self) -> f64 {
        0.0
    }

    /// Upper bound on the cost of any single unit operation; used to
    /// normalize distances into similarities.
    fn max_unit_cost(&self) -> f64;

    /// True iff `replace(a, b) == replace(b, a)` for all inputs.
    fn is_symmetric(&self) -> bool;
}

/// The default policy: insert, remove and replace each cost one unit.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnitCost;

impl EditCost for UnitCost {
    fn insert(&self, _node: &NodeData) -> f64 {
        1.0
    }

    fn remove(&self, _node: &NodeData) -> f64 {
        1.0
    }

    fn replace(&self, _from: &NodeData, _to: &NodeData) -> f64 {
        1.0
    }

    fn max_unit_cost(&self) -> f64 {
        1.0
    }

    fn is_symmetric(&self) -> bool {
        true
    }
}
