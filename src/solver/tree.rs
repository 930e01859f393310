use std::sync::Arc;

use crate::error::Result;
use crate::solver::{
    agent::{CancelToken, SearchAgent, SolutionIter},
    assignment::{Assignment, DomainMap},
    node::SearchNode,
    preprocess::Preprocessor,
    problem::{Problem, ProblemState},
    variable::{DomainValue, Variable},
};

/// Single-agent container for problems whose branching fits in one worker.
///
/// Instead of partitioning the root domain across agents, the whole initial
/// stack (one root node per value of the first variable) is handed to one
/// agent, avoiding the cost of spawning workers for small trees.
pub struct TreeProblem<V: Variable, D: DomainValue> {
    state: ProblemState<V, D>,
    preprocessors: Vec<Box<dyn Preprocessor<V, D>>>,
    preprocessed: bool,
}

impl<V: Variable, D: DomainValue> TreeProblem<V, D> {
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

    fn construct_agent(&self) -> Option<SearchAgent<V, D>> {
        let variables = self.state.variables();
        let first = variables.first()?.clone();
        let first_domain = self.state.domain(&first).to_vec();
        if first_domain.is_empty() {
            return None;
        }

        let roots = first_domain
            .iter()
            .map(|value| SearchNode::root(first.clone(), 0, value.clone(), first_domain.clone()))
            .collect();
        let mut agent = SearchAgent::new(
            Arc::new(self.state.domain_map().clone()),
            variables,
            roots,
        );
        agent.add_all_constraints(self.state.agent_constraints());
        Some(agent)
    }
}

impl<V: Variable, D: DomainValue> Problem<V, D> for TreeProblem<V, D> {
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
        for preprocessor in &self.preprocessors {
            preprocessor.preprocess(&mut self.state)?;
        }
        self.state.freeze_order();
        self.preprocessed = true;
        Ok(())
    }

    fn find_all(&mut self) -> Result<Vec<Assignment<V, D>>> {
        self.preprocess()?;
        Ok(self
            .construct_agent()
            .map(SearchAgent::find_all)
            .unwrap_or_default())
    }

    fn find_one(&mut self) -> Result<Option<Assignment<V, D>>> {
        self.preprocess()?;
        Ok(self.construct_agent().and_then(SearchAgent::find_one))
    }

    fn solution_stream(&mut self) -> Result<SolutionIter<V, D>> {
        self.preprocess()?;
        let agent = self
            .construct_agent()
            .unwrap_or_else(|| SearchAgent::new(Arc::new(DomainMap::new()), Vec::new(), Vec::new()));
        Ok(agent.solutions(CancelToken::new()))
    }
}
