use std::sync::Arc;

use crate::error::{Result, SolverError};
use crate::solver::{
    assignment::{Assignment, DomainMap},
    consistency::{GlobalConstraintTable, LocalConstraintTable},
    constraint::{Constraint, SharedConstraint},
    variable::{DomainValue, Variable},
};

/// Compares two variables for the search order.
pub type SortingFunction<V> = Box<dyn Fn(&V, &V) -> std::cmp::Ordering + Send + Sync>;

/// State shared by every problem container variant: the domain map, the
/// registered constraints and their derived lookup tables, the variable
/// ordering, and any seeded bindings.
pub struct ProblemState<V: Variable, D: DomainValue> {
    domain_map: DomainMap<V, D>,
    registered: Vec<SharedConstraint<V, D>>,
    local: LocalConstraintTable<V, D>,
    global: GlobalConstraintTable<V, D>,
    sorting_function: Option<SortingFunction<V>>,
    sorted_variables: Option<Vec<V>>,
    seeds: Assignment<V, D>,
}

impl<V: Variable, D: DomainValue> ProblemState<V, D> {
    pub fn new(domain_map: DomainMap<V, D>) -> Self {
        Self {
            domain_map,
            registered: Vec::new(),
            local: LocalConstraintTable::new(),
            global: GlobalConstraintTable::new(),
            sorting_function: None,
            sorted_variables: None,
            seeds: Assignment::new(),
        }
    }

    pub fn domain_map(&self) -> &DomainMap<V, D> {
        &self.domain_map
    }

    pub fn set_domain_map(&mut self, domain_map: DomainMap<V, D>) {
        self.domain_map = domain_map;
    }

    /// The variables in search order: the frozen order once computed, else
    /// the caller's comparator, else ascending local-constraint count.
    pub fn variables(&self) -> Vec<V> {
        if let Some(sorted) = &self.sorted_variables {
            return sorted.clone();
        }
        self.compute_order()
    }

    fn compute_order(&self) -> Vec<V> {
        let mut variables: Vec<V> = self.domain_map.keys().cloned().collect();
        if let Some(compare) = &self.sorting_function {
            variables.sort_by(|a, b| compare(a, b));
        } else {
            variables
                .sort_by_key(|variable| self.local.get(variable).map_or(0, |bucket| bucket.len()));
        }
        variables
    }

    /// Computes the search order once; later constraint registrations no
    /// longer affect it.
    pub fn freeze_order(&mut self) {
        if self.sorted_variables.is_none() {
            self.sorted_variables = Some(self.compute_order());
        }
    }

    pub fn set_sorting_function(&mut self, compare: SortingFunction<V>) {
        self.sorting_function = Some(compare);
    }

    pub fn domain(&self, variable: &V) -> &[D] {
        self.domain_map
            .get(variable)
            .map_or(&[], |domain| domain.as_slice())
    }

    pub fn contains(&self, variable: &V) -> bool {
        self.domain_map.contains_key(variable)
    }

    /// Registers a constraint: under every known scope variable when it has
    /// a local view, into the global list otherwise.
    pub fn add_constraint(&mut self, constraint: Box<dyn Constraint<V, D>>) {
        let shared: SharedConstraint<V, D> = Arc::from(constraint);
        match shared.as_local() {
            Some(local) => {
                for variable in local.variables().to_vec() {
                    if self.contains(&variable) {
                        self.local
                            .entry(variable)
                            .or_default()
                            .push(Arc::clone(&shared));
                    }
                }
            }
            None => self.global.push(Arc::clone(&shared)),
        }
        self.registered.push(shared);
    }

    pub fn add_all_constraints(
        &mut self,
        constraints: impl IntoIterator<Item = Box<dyn Constraint<V, D>>>,
    ) {
        for constraint in constraints {
            self.add_constraint(constraint);
        }
    }

    pub fn local_constraints(&self) -> &LocalConstraintTable<V, D> {
        &self.local
    }

    pub fn global_constraints(&self) -> &GlobalConstraintTable<V, D> {
        &self.global
    }

    /// Every registered constraint, in registration order.
    pub fn registered_constraints(&self) -> &[SharedConstraint<V, D>] {
        &self.registered
    }

    /// The constraint set handed to one agent: reusable constraints are
    /// shared, stateful ones are cloned so concurrent subtrees cannot race on
    /// their evaluation state.
    pub fn agent_constraints(&self) -> Vec<SharedConstraint<V, D>> {
        self.registered
            .iter()
            .map(|constraint| {
                if constraint.is_reusable() {
                    Arc::clone(constraint)
                } else {
                    Arc::from(constraint.clone_box())
                }
            })
            .collect()
    }

    /// Forces `variable` to `value` when preprocessing runs.
    pub fn set_seed(&mut self, variable: V, value: D) {
        self.seeds.insert(variable, value);
    }

    pub fn seeds(&self) -> &Assignment<V, D> {
        &self.seeds
    }

    /// Narrows every seeded variable's domain to its forced value.
    pub fn apply_seeds(&mut self) -> Result<()> {
        for (variable, value) in self.seeds.clone() {
            if let Some(domain) = self.domain_map.get_mut(&variable) {
                domain.retain(|candidate| *candidate == value);
                if domain.is_empty() {
                    return Err(SolverError::DomainExhausted {
                        variable: format!("{variable:?}"),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Runs every constraint's `reduce_domain` hook against the bindings
    /// forced by singleton domains. Part of the domain container's
    /// preprocessing pass.
    pub fn reduce_with_singletons(&mut self) {
        let bindings = crate::solver::assignment::singleton_bindings(&self.domain_map);
        let variables: Vec<V> = self.domain_map.keys().cloned().collect();
        for variable in variables {
            let Some(domain) = self.domain_map.get(&variable).cloned() else {
                continue;
            };
            let reduced = crate::solver::consistency::reduce_domain(
                &variable,
                &bindings,
                domain,
                &self.local,
                &self.global,
            );
            self.domain_map.insert(variable, reduced);
        }
    }
}

impl<V: Variable, D: DomainValue> std::fmt::Debug for ProblemState<V, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProblemState")
            .field("variables", &self.domain_map.len())
            .field("constraints", &self.registered.len())
            .field("seeds", &self.seeds.len())
            .finish_non_exhaustive()
    }
}

/// The shared surface of a problem container.
///
/// Implemented by [`DomainProblem`], which partitions the root domain across
/// parallel agents, and [`TreeProblem`], which searches on a single agent.
///
/// [`DomainProblem`]: crate::solver::domain::DomainProblem
/// [`TreeProblem`]: crate::solver::tree::TreeProblem
pub trait Problem<V: Variable, D: DomainValue> {
    fn state(&self) -> &ProblemState<V, D>;

    fn state_mut(&mut self) -> &mut ProblemState<V, D>;

    /// Runs the configured preprocessors. Explicit and idempotent; solving
    /// calls it on the caller's behalf.
    fn preprocess(&mut self) -> Result<()>;

    /// The first solution found by any worker, or `None` when the search
    /// space is exhausted. No ordering guarantee across workers.
    fn find_one(&mut self) -> Result<Option<Assignment<V, D>>>;

    /// Every satisfying assignment. Emission order across workers is
    /// unspecified.
    fn find_all(&mut self) -> Result<Vec<Assignment<V, D>>>;

    /// Solutions as a lazy stream.
    ///
    /// Panics for container variants whose search is partitioned across
    /// several workers and therefore has no meaningful single stream.
    fn solution_stream(&mut self) -> Result<crate::solver::agent::SolutionIter<V, D>>;

    fn domain_map(&self) -> &DomainMap<V, D> {
        self.state().domain_map()
    }

    fn set_domain_map(&mut self, domain_map: DomainMap<V, D>) {
        self.state_mut().set_domain_map(domain_map);
    }

    fn variables(&self) -> Vec<V> {
        self.state().variables()
    }

    fn domain(&self, variable: &V) -> &[D] {
        self.state().domain(variable)
    }

    fn contains(&self, variable: &V) -> bool {
        self.state().contains(variable)
    }

    fn set_sorting_function(&mut self, compare: SortingFunction<V>) {
        self.state_mut().set_sorting_function(compare);
    }

    fn add_constraint(&mut self, constraint: Box<dyn Constraint<V, D>>) {
        self.state_mut().add_constraint(constraint);
    }

    fn add_all_constraints(&mut self, constraints: Vec<Box<dyn Constraint<V, D>>>) {
        self.state_mut().add_all_constraints(constraints);
    }

    /// The seeded bindings, for containers that support seeding.
    fn seeds(&self) -> Option<&Assignment<V, D>> {
        None
    }
}
