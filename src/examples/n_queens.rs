//! N-queens: place one queen per column so that no two share a row or a
//! diagonal. Columns are the variables, rows the domain values.

use crate::solver::{
    assignment::{Assignment, DomainMap},
    constraint::{Constraint, LocalConstraint},
};

/// Queens in two columns must not attack each other: different rows, and a
/// row distance different from the column distance.
#[derive(Debug, Clone)]
pub struct NoAttackConstraint {
    columns: Vec<u32>,
}

impl NoAttackConstraint {
    pub fn new(left: u32, right: u32) -> Self {
        Self {
            columns: vec![left, right],
        }
    }
}

impl Constraint<u32, i32> for NoAttackConstraint {
    fn is_satisfied(&self, assignment: &Assignment<u32, i32>) -> bool {
        self.is_possibly_satisfied(assignment)
    }

    fn as_local(&self) -> Option<&dyn LocalConstraint<u32, i32>> {
        Some(self)
    }

    fn is_reusable(&self) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn Constraint<u32, i32>> {
        Box::new(self.clone())
    }
}

impl LocalConstraint<u32, i32> for NoAttackConstraint {
    fn is_possibly_satisfied(&self, assignment: &Assignment<u32, i32>) -> bool {
        let (left, right) = (self.columns[0], self.columns[1]);
        let (Some(left_row), Some(right_row)) = (assignment.get(&left), assignment.get(&right))
        else {
            return true;
        };
        if left_row == right_row {
            return false;
        }
        let column_distance = i64::from(left).abs_diff(i64::from(right));
        let row_distance = i64::from(*left_row).abs_diff(i64::from(*right_row));
        column_distance != row_distance
    }

    fn variables(&self) -> &[u32] {
        &self.columns
    }
}

pub fn board_domains(n: u32) -> DomainMap<u32, i32> {
    let rows: Vec<i32> = (0..n as i32).collect();
    (0..n).map(|column| (column, rows.clone())).collect()
}

pub fn board_constraints(n: u32) -> Vec<Box<dyn Constraint<u32, i32>>> {
    let mut constraints: Vec<Box<dyn Constraint<u32, i32>>> = Vec::new();
    for left in 0..n {
        for right in (left + 1)..n {
            constraints.push(Box::new(NoAttackConstraint::new(left, right)));
        }
    }
    constraints
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::solver::{
        domain::DomainProblem,
        preprocess::Ac3Preprocessor,
        problem::Problem,
        tree::TreeProblem,
    };

    fn board_problem(n: u32) -> DomainProblem<u32, i32> {
        let mut problem = DomainProblem::new(board_domains(n), Vec::new());
        problem.add_all_constraints(board_constraints(n));
        problem
    }

    fn is_peaceful(n: u32, solution: &Assignment<u32, i32>) -> bool {
        board_constraints(n)
            .iter()
            .all(|constraint| constraint.is_satisfied(solution))
    }

    fn canonical(solutions: &[Assignment<u32, i32>]) -> Vec<BTreeMap<u32, i32>> {
        let mut canonical: Vec<BTreeMap<u32, i32>> = solutions
            .iter()
            .map(|solution| solution.iter().map(|(k, v)| (*k, *v)).collect())
            .collect();
        canonical.sort();
        canonical
    }

    #[test]
    fn four_queens_has_exactly_two_solutions() {
        let solutions = board_problem(4).find_all().unwrap();
        assert_eq!(solutions.len(), 2);

        let first: Assignment<u32, i32> = im::hashmap! {0 => 1, 1 => 3, 2 => 0, 3 => 2};
        let second: Assignment<u32, i32> = im::hashmap! {0 => 2, 1 => 0, 2 => 3, 3 => 1};
        assert!(solutions.contains(&first));
        assert!(solutions.contains(&second));
    }

    #[test]
    fn eight_queens_has_ninety_two_solutions() {
        let solutions = board_problem(8).find_all().unwrap();
        assert_eq!(solutions.len(), 92);
        for solution in &solutions {
            assert!(is_peaceful(8, solution));
        }
    }

    #[test]
    fn three_queens_is_infeasible() {
        assert!(board_problem(3).find_all().unwrap().is_empty());
        assert_eq!(board_problem(3).find_one().unwrap(), None);
    }

    #[test]
    fn domain_and_tree_variants_agree_on_six_queens() {
        let domain_solutions = board_problem(6).find_all().unwrap();

        let mut tree_problem = TreeProblem::new(board_domains(6), Vec::new());
        tree_problem.add_all_constraints(board_constraints(6));
        let tree_solutions = tree_problem.find_all().unwrap();

        assert_eq!(domain_solutions.len(), 4);
        assert_eq!(canonical(&domain_solutions), canonical(&tree_solutions));
    }

    #[test]
    fn preprocessing_preserves_six_queens_solutions() {
        let plain = board_problem(6).find_all().unwrap();

        let mut preprocessed =
            DomainProblem::new(board_domains(6), vec![Box::new(Ac3Preprocessor)]);
        preprocessed.add_all_constraints(board_constraints(6));

        assert_eq!(canonical(&plain), canonical(&preprocessed.find_all().unwrap()));
    }

    #[test]
    fn thirteen_queens_survives_arc_consistency() {
        let mut problem =
            DomainProblem::new(board_domains(13), vec![Box::new(Ac3Preprocessor)]);
        problem.add_all_constraints(board_constraints(13));

        problem.preprocess().unwrap();
        for column in 0..13 {
            assert!(!problem.domain(&column).is_empty());
        }

        let solution = problem.find_one().unwrap().expect("13-queens is solvable");
        assert!(is_peaceful(13, &solution));
    }
}
