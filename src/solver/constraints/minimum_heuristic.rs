use std::sync::{Arc, Mutex};

use crate::solver::{
    assignment::Assignment,
    constraint::{Constraint, HeuristicConstraint, LocalConstraint},
    variable::{DomainValue, Variable},
};

/// Scores an assignment; lower is better.
pub type Evaluator<V, D> = Arc<dyn Fn(&Assignment<V, D>) -> f64 + Send + Sync>;

/// Admits an assignment only when its score does not exceed the best score
/// seen so far, tightening the bound on every strict acceptance.
///
/// The running minimum is evaluation state, not problem data: the constraint
/// reports [`is_reusable`] `false`, so every search agent works against its
/// own clone and the bounds tighten independently per subtree.
///
/// [`is_reusable`]: Constraint::is_reusable
pub struct MinimumHeuristicConstraint<V: Variable, D: DomainValue> {
    variables: Vec<V>,
    evaluator: Evaluator<V, D>,
    min_value: Mutex<f64>,
}

impl<V: Variable, D: DomainValue> MinimumHeuristicConstraint<V, D> {
    pub fn new(
        variables: Vec<V>,
        evaluator: impl Fn(&Assignment<V, D>) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            variables,
            evaluator: Arc::new(evaluator),
            min_value: Mutex::new(f64::MAX),
        }
    }

    fn min_value(&self) -> f64 {
        *self.min_value.lock().expect("minimum bound lock poisoned")
    }
}

impl<V: Variable, D: DomainValue> Clone for MinimumHeuristicConstraint<V, D> {
    fn clone(&self) -> Self {
        Self {
            variables: self.variables.clone(),
            evaluator: Arc::clone(&self.evaluator),
            min_value: Mutex::new(self.min_value()),
        }
    }
}

impl<V: Variable, D: DomainValue> std::fmt::Debug for MinimumHeuristicConstraint<V, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinimumHeuristicConstraint")
            .field("variables", &self.variables)
            .field("min_value", &self.min_value)
            .finish_non_exhaustive()
    }
}

impl<V: Variable, D: DomainValue> Constraint<V, D> for MinimumHeuristicConstraint<V, D> {
    fn is_satisfied(&self, assignment: &Assignment<V, D>) -> bool {
        let score = (self.evaluator)(assignment);
        let mut min_value = self.min_value.lock().expect("minimum bound lock poisoned");
        if score <= *min_value {
            *min_value = score;
            true
        } else {
            false
        }
    }

    fn as_local(&self) -> Option<&dyn LocalConstraint<V, D>> {
        Some(self)
    }

    fn is_reusable(&self) -> bool {
        false
    }

    fn clone_box(&self) -> Box<dyn Constraint<V, D>> {
        Box::new(self.clone())
    }
}

impl<V: Variable, D: DomainValue> LocalConstraint<V, D> for MinimumHeuristicConstraint<V, D> {
    fn is_possibly_satisfied(&self, assignment: &Assignment<V, D>) -> bool {
        self.evaluate(assignment) <= self.min_value()
    }

    fn variables(&self) -> &[V] {
        &self.variables
    }
}

impl<V: Variable, D: DomainValue> HeuristicConstraint<V, D> for MinimumHeuristicConstraint<V, D> {
    fn evaluate(&self, assignment: &Assignment<V, D>) -> f64 {
        (self.evaluator)(assignment)
    }
}
