use crate::solver::{
    assignment::Assignment,
    constraint::{Constraint, LocalConstraint},
    variable::{DomainValue, Variable},
};

/// Caps how often a value may appear: at most `max_count` of the scope
/// variables may be assigned `target`.
#[derive(Debug, Clone)]
pub struct CardinalityConstraint<V: Variable, D: DomainValue> {
    variables: Vec<V>,
    max_count: usize,
    target: D,
}

impl<V: Variable, D: DomainValue> CardinalityConstraint<V, D> {
    pub fn new(variables: Vec<V>, max_count: usize, target: D) -> Self {
        Self {
            variables,
            max_count,
            target,
        }
    }
}

impl<V: Variable, D: DomainValue> Constraint<V, D> for CardinalityConstraint<V, D> {
    fn is_satisfied(&self, assignment: &Assignment<V, D>) -> bool {
        self.is_possibly_satisfied(assignment)
    }

    fn as_local(&self) -> Option<&dyn LocalConstraint<V, D>> {
        Some(self)
    }

    fn is_reusable(&self) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn Constraint<V, D>> {
        Box::new(self.clone())
    }
}

impl<V: Variable, D: DomainValue> LocalConstraint<V, D> for CardinalityConstraint<V, D> {
    fn is_possibly_satisfied(&self, assignment: &Assignment<V, D>) -> bool {
        let mut count = 0;
        for variable in &self.variables {
            if assignment.get(variable) == Some(&self.target) {
                count += 1;
                if count > self.max_count {
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
