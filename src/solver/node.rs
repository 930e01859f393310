use std::sync::Arc;

use crate::solver::{
    assignment::Assignment,
    variable::{DomainValue, Variable},
};

/// One step of a partial assignment: binding `variable` to `value` on top of
/// everything the parent had already bound.
///
/// Each node materializes its own assignment snapshot at construction, so
/// sibling branches never alias each other's bindings and the parent pointer
/// is never needed for correctness. The back-reference is kept for lineage
/// tracing only. Nodes are immutable once constructed.
#[derive(Debug, Clone)]
pub struct SearchNode<V: Variable, D: DomainValue> {
    variable: V,
    variable_index: usize,
    value: D,
    parent: Option<Arc<SearchNode<V, D>>>,
    assignment: Assignment<V, D>,
    legal_values: Vec<D>,
}

impl<V: Variable, D: DomainValue> SearchNode<V, D> {
    /// A node with no parent; its assignment is the single new binding.
    pub fn root(variable: V, variable_index: usize, value: D, legal_values: Vec<D>) -> Self {
        let assignment = Assignment::unit(variable.clone(), value.clone());
        Self {
            variable,
            variable_index,
            value,
            parent: None,
            assignment,
            legal_values,
        }
    }

    /// Extends `parent`'s assignment with one new binding.
    pub fn child(
        parent: &Arc<SearchNode<V, D>>,
        variable: V,
        variable_index: usize,
        value: D,
        legal_values: Vec<D>,
    ) -> Self {
        let assignment = parent.assignment.update(variable.clone(), value.clone());
        Self {
            variable,
            variable_index,
            value,
            parent: Some(Arc::clone(parent)),
            assignment,
            legal_values,
        }
    }

    pub fn variable(&self) -> &V {
        &self.variable
    }

    pub fn variable_index(&self) -> usize {
        self.variable_index
    }

    pub fn value(&self) -> &D {
        &self.value
    }

    /// The snapshot of every binding on the path from the root to this node.
    pub fn assignment(&self) -> &Assignment<V, D> {
        &self.assignment
    }

    /// The values that remained legal for this node's variable when the node
    /// was created. Drives heap ordering; fewer is searched first.
    pub fn legal_values(&self) -> &[D] {
        &self.legal_values
    }

    pub fn parent(&self) -> Option<&Arc<SearchNode<V, D>>> {
        self.parent.as_ref()
    }

    /// Number of ancestors. Walks the back-references; tracing only.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent.as_deref();
        while let Some(node) = current {
            depth += 1;
            current = node.parent.as_deref();
        }
        depth
    }
}
