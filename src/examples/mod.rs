//! Test-only problem definitions exercising the solver end to end.

pub mod n_queens;

#[cfg(test)]
mod tests {
    use std::marker::PhantomData;

    use crate::solver::{
        assignment::{Assignment, DomainMap},
        constraint::Constraint,
        constraints::all_different::GlobalAllDifferentConstraint,
        domain::DomainProblem,
        problem::Problem,
    };

    /// A global constraint that accepts everything, used to open up search
    /// spaces that have no other rules.
    #[derive(Debug, Clone, Default)]
    struct Tautology<V, D> {
        _marker: PhantomData<(V, D)>,
    }

    impl<V, D> Constraint<V, D> for Tautology<V, D>
    where
        V: crate::solver::variable::Variable,
        D: crate::solver::variable::DomainValue,
    {
        fn is_satisfied(&self, _assignment: &Assignment<V, D>) -> bool {
            true
        }

        fn is_reusable(&self) -> bool {
            true
        }

        fn clone_box(&self) -> Box<dyn Constraint<V, D>> {
            Box::new(self.clone())
        }
    }

    fn pigeonhole_problem() -> DomainProblem<&'static str, i32> {
        let mut domain_map = DomainMap::new();
        domain_map.insert("a", vec![3, 4, 5, 6]);
        domain_map.insert("b", vec![3, 4]);
        domain_map.insert("c", vec![2, 3, 4, 5]);
        domain_map.insert("d", vec![2, 3, 4]);
        domain_map.insert("e", vec![3, 4]);

        let mut problem = DomainProblem::new(domain_map, Vec::new());
        problem.add_constraint(Box::new(GlobalAllDifferentConstraint::new()));
        problem
    }

    /// The narrow domains of `b`, `d` and `e` force most of the assignment:
    /// `b` and `e` soak up 3 and 4, pushing `d` to 2, `c` to 5 and `a` to 6.
    #[test]
    fn global_all_different_pins_the_pigeonhole_instance() {
        let solutions = pigeonhole_problem().find_all().unwrap();
        assert_eq!(solutions.len(), 2);

        for solution in &solutions {
            assert_eq!(solution.len(), 5);
            let distinct: std::collections::HashSet<i32> =
                solution.values().copied().collect();
            assert_eq!(distinct.len(), 5);
        }

        let expected: Assignment<&str, i32> =
            im::hashmap! {"a" => 6, "b" => 3, "c" => 5, "d" => 2, "e" => 4};
        assert!(solutions.contains(&expected));
    }

    #[test]
    fn find_one_cancels_siblings_promptly() {
        // ~1.3e5 solutions: 17 binary variables under a constraint that
        // rejects nothing.
        let mut domain_map = DomainMap::new();
        for variable in 0u32..17 {
            domain_map.insert(variable, vec![0i32, 1]);
        }
        let mut problem = DomainProblem::new(domain_map, Vec::new());
        problem.add_constraint(Box::new(Tautology::default()));

        let started = std::time::Instant::now();
        let solution = problem.find_one().unwrap().expect("space is wide open");
        let elapsed = started.elapsed();

        assert_eq!(solution.len(), 17);
        // Workers are joined before find_one returns; the solve must not
        // have drained the whole space.
        assert!(
            elapsed < std::time::Duration::from_secs(10),
            "find_one took {elapsed:?}"
        );
    }

    /// The running-minimum bound tightens within one agent but never leaks
    /// across workers: the tree variant shares one bound over its whole
    /// stack, while the domain variant hands every agent a fresh clone.
    #[test]
    fn running_minimum_prunes_per_worker() {
        use crate::solver::constraints::minimum_heuristic::MinimumHeuristicConstraint;
        use crate::solver::tree::TreeProblem;

        let score = |assignment: &Assignment<&'static str, i32>| {
            assignment.get("a").map_or(0.0, |value| f64::from(*value))
        };
        let domains = || {
            let mut domain_map = DomainMap::new();
            domain_map.insert("a", vec![3, 1, 2]);
            domain_map
        };

        let mut tree = TreeProblem::new(domains(), Vec::new());
        tree.add_constraint(Box::new(MinimumHeuristicConstraint::new(vec!["a"], score)));
        let emitted = tree.find_all().unwrap();
        assert!(!emitted.is_empty() && emitted.len() <= 3);
        let scores: Vec<f64> = emitted.iter().map(score).collect();
        assert!(scores.windows(2).all(|pair| pair[1] <= pair[0]));

        let mut partitioned = DomainProblem::new(domains(), Vec::new());
        partitioned
            .add_constraint(Box::new(MinimumHeuristicConstraint::new(vec!["a"], score)));
        // One agent per value, each with an untightened bound: nothing is
        // pruned.
        assert_eq!(partitioned.find_all().unwrap().len(), 3);
    }

    #[test]
    fn cancelled_search_leaves_the_problem_reusable() {
        let mut domain_map = DomainMap::new();
        for variable in 0u32..10 {
            domain_map.insert(variable, vec![0i32, 1]);
        }
        let mut problem = DomainProblem::new(domain_map, Vec::new());
        problem.add_constraint(Box::new(Tautology::default()));

        assert!(problem.find_one().unwrap().is_some());
        // A full enumeration afterwards still sees every solution.
        assert_eq!(problem.find_all().unwrap().len(), 1 << 10);
    }
}
