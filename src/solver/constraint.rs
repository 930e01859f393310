use std::sync::Arc;

use crate::solver::{
    assignment::Assignment,
    variable::{DomainValue, Variable},
};

/// A rule that a satisfying assignment must obey.
///
/// Implementors provide the strict test [`is_satisfied`] and, for constraints
/// with a declared variable scope, a [`LocalConstraint`] view via
/// [`as_local`]. Constraints without a local view are *global*: their scope is
/// every variable in the problem and only the strict test is meaningful.
///
/// [`is_satisfied`]: Constraint::is_satisfied
/// [`as_local`]: Constraint::as_local
pub trait Constraint<V: Variable, D: DomainValue>: std::fmt::Debug + Send + Sync {
    /// Strict satisfaction test, intended for assignments that bind every
    /// variable in the constraint's scope.
    fn is_satisfied(&self, assignment: &Assignment<V, D>) -> bool;

    /// The local view of this constraint, if it declares an explicit scope.
    fn as_local(&self) -> Option<&dyn LocalConstraint<V, D>> {
        None
    }

    /// Whether satisfaction is a pure function of the final total assignment.
    ///
    /// Constraints that carry mutable evaluation state (such as
    /// [`MinimumHeuristicConstraint`]) must report `false`: each search agent
    /// then receives its own clone instead of a shared handle.
    ///
    /// [`MinimumHeuristicConstraint`]: crate::solver::constraints::minimum_heuristic::MinimumHeuristicConstraint
    fn is_reusable(&self) -> bool {
        false
    }

    /// Filters the candidate values for `variable` under `assignment`.
    ///
    /// Invoked once per constraint while expanding a search node; there is no
    /// fixpoint re-application. The default keeps every candidate.
    fn reduce_domain(
        &self,
        _variable: &V,
        _assignment: &Assignment<V, D>,
        candidates: Vec<D>,
    ) -> Vec<D> {
        candidates
    }

    /// Returns a boxed deep copy of the constraint, including any mutable
    /// evaluation state at its current value.
    fn clone_box(&self) -> Box<dyn Constraint<V, D>>;
}

/// A constraint over an explicit, ordered list of variables.
pub trait LocalConstraint<V: Variable, D: DomainValue>: Constraint<V, D> {
    /// Weak, monotone test: `true` when no variable in the scope is assigned
    /// in conflict. Never rejects a partial assignment that can still be
    /// completed into a satisfying one.
    fn is_possibly_satisfied(&self, assignment: &Assignment<V, D>) -> bool;

    /// The constraint's declared scope.
    fn variables(&self) -> &[V];
}

/// A constraint that scores assignments, for optimization-style pruning.
pub trait HeuristicConstraint<V: Variable, D: DomainValue>: Constraint<V, D> {
    fn evaluate(&self, assignment: &Assignment<V, D>) -> f64;
}

/// A registered constraint, shared between a problem container and the
/// search agents it spawns.
pub type SharedConstraint<V, D> = Arc<dyn Constraint<V, D>>;

pub fn is_unary<V: Variable, D: DomainValue>(constraint: &dyn LocalConstraint<V, D>) -> bool {
    constraint.variables().len() == 1
}

pub fn is_binary<V: Variable, D: DomainValue>(constraint: &dyn LocalConstraint<V, D>) -> bool {
    constraint.variables().len() == 2
}

pub fn is_ternary<V: Variable, D: DomainValue>(constraint: &dyn LocalConstraint<V, D>) -> bool {
    constraint.variables().len() == 3
}

impl<V: Variable, D: DomainValue> Clone for Box<dyn Constraint<V, D>> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
