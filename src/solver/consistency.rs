//! Pure predicates deciding whether a (partial) assignment can still lead to,
//! or already is, a solution.
//!
//! The weak test ([`is_locally_consistent`]) runs the monotone
//! `is_possibly_satisfied` check and never rejects a partial assignment that
//! can still be completed; the strict tests ([`is_absolutely_consistent`],
//! [`is_consistent`]) are reserved for complete assignments.

use std::collections::HashMap;

use crate::solver::{
    assignment::Assignment,
    constraint::{LocalConstraint, SharedConstraint},
    variable::{DomainValue, Variable},
};

/// The local constraints of a problem, keyed by each variable they mention.
///
/// Every entry exposes a local view; a constraint with a scope of `n` known
/// variables appears in `n` buckets.
pub type LocalConstraintTable<V, D> = HashMap<V, Vec<SharedConstraint<V, D>>>;

/// The constraints with no declared scope.
pub type GlobalConstraintTable<V, D> = Vec<SharedConstraint<V, D>>;

pub(crate) fn local_view<'a, V: Variable, D: DomainValue>(
    constraint: &'a SharedConstraint<V, D>,
) -> &'a dyn LocalConstraint<V, D> {
    constraint
        .as_local()
        .expect("local constraint table entries must expose a local view")
}

/// Weak check for one variable: every local constraint mentioning `variable`
/// must report `is_possibly_satisfied`.
///
/// When no local constraint is registered for the variable, the answer is
/// `true` exactly when at least one global constraint exists; there is no
/// local test to veto the branch, but with no constraints at all there is
/// nothing to satisfy either.
pub fn is_locally_consistent<V: Variable, D: DomainValue>(
    variable: &V,
    assignment: &Assignment<V, D>,
    local: &LocalConstraintTable<V, D>,
    global: &GlobalConstraintTable<V, D>,
) -> bool {
    let Some(constraints) = local.get(variable) else {
        return !global.is_empty();
    };
    constraints
        .iter()
        .all(|constraint| local_view(constraint).is_possibly_satisfied(assignment))
}

/// Every global constraint holds strictly.
pub fn is_globally_consistent<V: Variable, D: DomainValue>(
    assignment: &Assignment<V, D>,
    global: &GlobalConstraintTable<V, D>,
) -> bool {
    global
        .iter()
        .all(|constraint| constraint.is_satisfied(assignment))
}

/// Strict variant of [`is_locally_consistent`]: every local constraint
/// mentioning `variable` must hold under `is_satisfied`. Only meaningful for
/// assignments that bind the full scope of those constraints.
pub fn is_absolutely_consistent<V: Variable, D: DomainValue>(
    variable: &V,
    assignment: &Assignment<V, D>,
    local: &LocalConstraintTable<V, D>,
    global: &GlobalConstraintTable<V, D>,
) -> bool {
    let Some(constraints) = local.get(variable) else {
        return !global.is_empty();
    };
    constraints
        .iter()
        .all(|constraint| constraint.is_satisfied(assignment))
}

/// Confirms a complete assignment as a solution.
pub fn is_consistent<V: Variable, D: DomainValue>(
    variable: &V,
    assignment: &Assignment<V, D>,
    local: &LocalConstraintTable<V, D>,
    global: &GlobalConstraintTable<V, D>,
) -> bool {
    is_globally_consistent(assignment, global)
        && is_absolutely_consistent(variable, assignment, local, global)
}

/// Applies the strict test to exactly those constraints flagged reusable.
///
/// Reusable constraints are pure functions of the final total assignment, so
/// checking a candidate solution against them is safe to defer until the end.
pub fn is_reusable_consistent<V: Variable, D: DomainValue>(
    assignment: &Assignment<V, D>,
    local: &LocalConstraintTable<V, D>,
    global: &GlobalConstraintTable<V, D>,
) -> bool {
    local
        .values()
        .flatten()
        .chain(global.iter())
        .filter(|constraint| constraint.is_reusable())
        .all(|constraint| constraint.is_satisfied(assignment))
}

/// Chains every constraint's `reduce_domain` hook over the candidates for
/// `variable`. Single pass, no fixpoint re-application.
pub fn reduce_domain<V: Variable, D: DomainValue>(
    variable: &V,
    assignment: &Assignment<V, D>,
    candidates: Vec<D>,
    local: &LocalConstraintTable<V, D>,
    global: &GlobalConstraintTable<V, D>,
) -> Vec<D> {
    let mut current = candidates;
    for constraint in local.values().flatten() {
        current = constraint.reduce_domain(variable, assignment, current);
    }
    for constraint in global {
        current = constraint.reduce_domain(variable, assignment, current);
    }
    current
}

/// One-step lookahead: the subset of `domain` whose values, provisionally
/// bound to `variable`, pass every local constraint for that variable and
/// every global constraint under the strict test.
pub fn legal_values<V: Variable, D: DomainValue>(
    variable: &V,
    assignment: &Assignment<V, D>,
    domain: &[D],
    local: &LocalConstraintTable<V, D>,
    global: &GlobalConstraintTable<V, D>,
) -> Vec<D> {
    domain
        .iter()
        .filter(|candidate| {
            let trial = assignment.update(variable.clone(), (*candidate).clone());
            local
                .get(variable)
                .map_or(true, |constraints| {
                    constraints
                        .iter()
                        .all(|constraint| constraint.is_satisfied(&trial))
                })
                && global
                    .iter()
                    .all(|constraint| constraint.is_satisfied(&trial))
        })
        .cloned()
        .collect()
}
