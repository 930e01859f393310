use std::collections::HashSet;
use std::marker::PhantomData;

use crate::solver::{
    assignment::Assignment,
    constraint::{Constraint, LocalConstraint},
    variable::{DomainValue, Variable},
};

/// A constraint that ensures all variables in a given set have unique values.
///
/// This is a common constraint in problems like map colouring, where two
/// adjacent regions must not share a colour, or Sudoku, where every cell in a
/// row must contain a different number.
#[derive(Debug, Clone)]
pub struct AllDifferentConstraint<V: Variable, D: DomainValue> {
    variables: Vec<V>,
    _marker: PhantomData<D>,
}

impl<V: Variable, D: DomainValue> AllDifferentConstraint<V, D> {
    pub fn new(variables: Vec<V>) -> Self {
        Self {
            variables,
            _marker: PhantomData,
        }
    }
}

impl<V: Variable, D: DomainValue> Constraint<V, D> for AllDifferentConstraint<V, D> {
    fn is_satisfied(&self, assignment: &Assignment<V, D>) -> bool {
        self.is_possibly_satisfied(assignment)
    }

    fn as_local(&self) -> Option<&dyn LocalConstraint<V, D>> {
        Some(self)
    }

    fn is_reusable(&self) -> bool {
        true
    }

    fn reduce_domain(
        &self,
        variable: &V,
        assignment: &Assignment<V, D>,
        candidates: Vec<D>,
    ) -> Vec<D> {
        if candidates.is_empty() {
            return candidates;
        }
        candidates
            .into_iter()
            .filter(|candidate| {
                let trial = assignment.update(variable.clone(), candidate.clone());
                self.is_possibly_satisfied(&trial)
            })
            .collect()
    }

    fn clone_box(&self) -> Box<dyn Constraint<V, D>> {
        Box::new(self.clone())
    }
}

impl<V: Variable, D: DomainValue> LocalConstraint<V, D> for AllDifferentConstraint<V, D> {
    fn is_possibly_satisfied(&self, assignment: &Assignment<V, D>) -> bool {
        let mut seen = HashSet::with_capacity(self.variables.len());
        for variable in &self.variables {
            if let Some(value) = assignment.get(variable) {
                if !seen.insert(value) {
                    return false;
                }
            }
        }
        true
    }

    fn variables(&self) -> &[V] {
        &self.variables
    }
}

/// All-different over every variable in the problem: a satisfying assignment
/// must not bind two variables to the same value, whatever their names.
#[derive(Debug, Clone, Default)]
pub struct GlobalAllDifferentConstraint<V: Variable, D: DomainValue> {
    _marker: PhantomData<(V, D)>,
}

impl<V: Variable, D: DomainValue> GlobalAllDifferentConstraint<V, D> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<V: Variable, D: DomainValue> Constraint<V, D> for GlobalAllDifferentConstraint<V, D> {
    fn is_satisfied(&self, assignment: &Assignment<V, D>) -> bool {
        let values: HashSet<&D> = assignment.values().collect();
        values.len() == assignment.len()
    }

    fn is_reusable(&self) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn Constraint<V, D>> {
        Box::new(self.clone())
    }
}
