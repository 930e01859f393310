use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, SolverError};
use crate::solver::{
    assignment::{Assignment, DomainMap},
    consistency::local_view,
    constraint::{is_binary, is_unary, SharedConstraint},
    problem::ProblemState,
    variable::{DomainValue, Variable},
};

/// Offline domain reduction, run before search starts.
pub trait Preprocessor<V: Variable, D: DomainValue>: std::fmt::Debug + Send {
    /// May rewrite the problem's domain map. Errors abort the solve.
    fn preprocess(&self, state: &mut ProblemState<V, D>) -> Result<()>;
}

/// Arc-consistency preprocessing over unary and binary local constraints.
///
/// Follows the classical AC-3 scheme with a single pass over the work queue:
/// constraints are not re-enqueued after a reduction. That keeps the pass
/// cheap and never removes a supported value, so the solution set is
/// unchanged on feasible inputs.
///
/// Ref <https://en.wikipedia.org/wiki/AC-3_algorithm>
#[derive(Debug, Default, Clone, Copy)]
pub struct Ac3Preprocessor;

type ConstraintBuckets<V, D> = HashMap<V, Vec<SharedConstraint<V, D>>>;

impl<V: Variable, D: DomainValue> Preprocessor<V, D> for Ac3Preprocessor {
    fn preprocess(&self, state: &mut ProblemState<V, D>) -> Result<()> {
        let variables = state.variables();
        let mut current: DomainMap<V, D> = state.domain_map().clone();

        let mut unary: ConstraintBuckets<V, D> = HashMap::new();
        let mut binary: ConstraintBuckets<V, D> = HashMap::new();
        for (variable, constraints) in state.local_constraints() {
            for constraint in constraints {
                if is_unary(local_view(constraint)) {
                    unary
                        .entry(variable.clone())
                        .or_default()
                        .push(Arc::clone(constraint));
                } else if is_binary(local_view(constraint)) {
                    binary
                        .entry(variable.clone())
                        .or_default()
                        .push(Arc::clone(constraint));
                }
            }
        }

        // Keep the values every unary constraint can live with.
        for variable in &variables {
            let Some(domain) = current.get_mut(variable) else {
                continue;
            };
            let Some(constraints) = unary.get(variable) else {
                continue;
            };
            domain.retain(|value| {
                let trial = Assignment::unit(variable.clone(), value.clone());
                constraints
                    .iter()
                    .all(|constraint| local_view(constraint).is_possibly_satisfied(&trial))
            });
            if domain.is_empty() {
                return Err(SolverError::DomainExhausted {
                    variable: format!("{variable:?}"),
                }
                .into());
            }
        }

        // Arc-reduce each binary constraint once, in queue order.
        let mut queue: VecDeque<SharedConstraint<V, D>> =
            binary.values().flatten().cloned().collect();
        debug!(queue_len = queue.len(), "starting arc consistency pass");
        while let Some(constraint) = queue.pop_front() {
            let scope = local_view(&constraint).variables();
            let (x, y) = (scope[0].clone(), scope[1].clone());
            let shared = shared_constraints(&x, &y, &binary);
            if arc_reduce(&x, &y, &shared, &mut current)
                && current.get(&x).map_or(true, Vec::is_empty)
            {
                return Err(SolverError::DomainExhausted {
                    variable: format!("{x:?}"),
                }
                .into());
            }
        }

        state.set_domain_map(current);
        Ok(())
    }
}

/// Removes from `domain(x)` every value with no support in `domain(y)` under
/// the given binary constraints. Returns whether anything was removed.
fn arc_reduce<V: Variable, D: DomainValue>(
    x: &V,
    y: &V,
    constraints: &[SharedConstraint<V, D>],
    current: &mut DomainMap<V, D>,
) -> bool {
    let domain_y = current.get(y).cloned().unwrap_or_default();
    let Some(domain_x) = current.get_mut(x) else {
        return false;
    };
    let before = domain_x.len();
    domain_x.retain(|value_x| {
        domain_y.iter().any(|value_y| {
            let trial = Assignment::unit(x.clone(), value_x.clone())
                .update(y.clone(), value_y.clone());
            constraints
                .iter()
                .all(|constraint| local_view(constraint).is_possibly_satisfied(&trial))
        })
    });
    domain_x.len() < before
}

/// All binary constraints whose scope mentions both `x` and `y`, unioned
/// from both variables' buckets.
fn shared_constraints<V: Variable, D: DomainValue>(
    x: &V,
    y: &V,
    binary: &ConstraintBuckets<V, D>,
) -> Vec<SharedConstraint<V, D>> {
    let mentions = |constraint: &&SharedConstraint<V, D>, other: &V| {
        local_view(constraint).variables().contains(other)
    };
    let mut shared = Vec::new();
    if let Some(bucket) = binary.get(x) {
        shared.extend(
            bucket
                .iter()
                .filter(|constraint| mentions(constraint, y))
                .cloned(),
        );
    }
    if let Some(bucket) = binary.get(y) {
        shared.extend(
            bucket
                .iter()
                .filter(|constraint| mentions(constraint, x))
                .cloned(),
        );
    }
    shared
}
