use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::Result;
use crate::solver::{
    agent::{CancelToken, SearchAgent, SolutionIter},
    assignment::{Assignment, DomainMap},
    node::SearchNode,
    preprocess::Preprocessor,
    problem::{Problem, ProblemState},
    stats::{render_stats_table, SearchStats},
    variable::{DomainValue, Variable},
};

/// The general-purpose container: partitions the branching variable's domain
/// into one search agent per value and runs the agents on parallel workers.
///
/// The branching variable is the first in search order, or the widest-domain
/// variable when the first is already down to a single value.
pub struct DomainProblem<V: Variable, D: DomainValue> {
    state: ProblemState<V, D>,
    preprocessors: Vec<Box<dyn Preprocessor<V, D>>>,
    preprocessed: bool,
}

impl<V: Variable, D: DomainValue> DomainProblem<V, D> {
    pub fn new(
        domain_map: DomainMap<V, D>,
        preprocessors: Vec<Box<dyn Preprocessor<V, D>>>,
    ) -> Self {
        Self {
            state: ProblemState::new(domain_map),
            preprocessors,
            preprocessed: false,
        }
    }

    /// Forces `variable` to `value` before search; applied when
    /// preprocessing runs.
    pub fn set_seed(&mut self, variable: V, value: D) {
        self.state.set_seed(variable, value);
    }

    /// One agent per value of the branching variable, each holding a private
    /// constraint view.
    fn construct_agents(&self) -> Vec<SearchAgent<V, D>> {
        let variables = self.state.variables();
        let Some(mut branching) = variables.first().cloned() else {
            return Vec::new();
        };
        if !self.state.contains(&branching) {
            return Vec::new();
        }
        if self.state.domain(&branching).len() == 1 {
            let Some(widest) = variables
                .iter()
                .max_by_key(|variable| self.state.domain(variable).len())
            else {
                return Vec::new();
            };
            branching = widest.clone();
            if !self.state.contains(&branching) {
                return Vec::new();
            }
        }
        let branching_domain = self.state.domain(&branching).to_vec();
        let branching_index = variables
            .iter()
            .position(|variable| *variable == branching)
            .unwrap_or(0);
        debug!(
            branching = ?branching,
            fan_out = branching_domain.len(),
            "constructing agents"
        );

        let shared_map = Arc::new(self.state.domain_map().clone());
        branching_domain
            .iter()
            .map(|value| {
                let root = SearchNode::root(
                    branching.clone(),
                    branching_index,
                    value.clone(),
                    branching_domain.clone(),
                );
                let mut agent =
                    SearchAgent::new(Arc::clone(&shared_map), variables.clone(), vec![root]);
                agent.add_all_constraints(self.state.agent_constraints());
                agent
            })
            .collect()
    }

    /// Like [`find_all`], additionally returning the merged per-agent search
    /// statistics.
    ///
    /// [`find_all`]: Problem::find_all
    pub fn find_all_with_stats(&mut self) -> Result<(Vec<Assignment<V, D>>, SearchStats)> {
        self.preprocess()?;
        let agents = self.construct_agents();
        if agents.is_empty() {
            return Ok((Vec::new(), SearchStats::default()));
        }

        let solutions = Mutex::new(Vec::new());
        let per_agent = Mutex::new(Vec::new());
        std::thread::scope(|scope| {
            for agent in agents {
                scope.spawn(|| {
                    let mut stream = agent.solutions(CancelToken::new());
                    for solution in stream.by_ref() {
                        solutions.lock().expect("result sink poisoned").push(solution);
                    }
                    per_agent
                        .lock()
                        .expect("stats sink poisoned")
                        .push(*stream.stats());
                });
            }
        });

        let per_agent = per_agent.into_inner().expect("stats sink poisoned");
        debug!("search finished:\n{}", render_stats_table(&per_agent));
        let mut merged = SearchStats::default();
        for stats in &per_agent {
            merged.merge(stats);
        }
        Ok((solutions.into_inner().expect("result sink poisoned"), merged))
    }
}

impl<V: Variable, D: DomainValue> Problem<V, D> for DomainProblem<V, D> {
    fn state(&self) -> &ProblemState<V, D> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ProblemState<V, D> {
        &mut self.state
    }

    fn preprocess(&mut self) -> Result<()> {
        if self.preprocessed {
            return Ok(());
        }
        self.state.apply_seeds()?;
        for preprocessor in &self.preprocessors {
            preprocessor.preprocess(&mut self.state)?;
        }
        self.state.freeze_order();
        self.state.reduce_with_singletons();
        self.preprocessed = true;
        Ok(())
    }

    fn find_all(&mut self) -> Result<Vec<Assignment<V, D>>> {
        let (solutions, _stats) = self.find_all_with_stats()?;
        Ok(solutions)
    }

    /// Workers race; the first emitted solution wins and the remaining
    /// agents are cancelled cooperatively. Every worker has terminated by
    /// the time this returns.
    fn find_one(&mut self) -> Result<Option<Assignment<V, D>>> {
        self.preprocess()?;
        let agents = self.construct_agents();
        if agents.is_empty() {
            return Ok(None);
        }

        let cancel = CancelToken::new();
        let (sender, receiver) = crossbeam_channel::bounded(agents.len());
        let first = std::thread::scope(|scope| {
            for agent in agents {
                let sender = sender.clone();
                let cancel = cancel.clone();
                scope.spawn(move || {
                    if let Some(solution) = agent.solutions(cancel).next() {
                        let _ = sender.send(solution);
                    }
                });
            }
            drop(sender);

            let first = receiver.recv().ok();
            cancel.cancel();
            first
        });
        Ok(first)
    }

    fn solution_stream(&mut self) -> Result<SolutionIter<V, D>> {
        panic!(
            "DomainProblem partitions its search across workers and has no \
             single solution stream; use find_all/find_one, or a TreeProblem"
        );
    }

    fn seeds(&self) -> Option<&Assignment<V, D>> {
        Some(self.state.seeds())
    }
}
