use std::collections::BinaryHeap;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tracing::trace;

use crate::solver::{
    assignment::{Assignment, DomainMap},
    consistency::{
        is_consistent, is_locally_consistent, legal_values, reduce_domain, GlobalConstraintTable,
        LocalConstraintTable,
    },
    constraint::SharedConstraint,
    node::SearchNode,
    stats::SearchStats,
    variable::{DomainValue, Variable},
};

/// Cooperative cancellation shared between a solve call and its workers.
///
/// Agents observe the token between heap operations; a cancelled agent drains
/// its queue without emitting and terminates.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Priority-queue entry ordering nodes by fewest remaining legal values.
///
/// `BinaryHeap` is a max-heap, so the comparison is reversed to pop the most
/// constrained branch first. Ties are resolved arbitrarily.
#[derive(Debug)]
struct HeapEntry<V: Variable, D: DomainValue> {
    remaining: usize,
    node: SearchNode<V, D>,
}

impl<V: Variable, D: DomainValue> HeapEntry<V, D> {
    fn new(node: SearchNode<V, D>) -> Self {
        Self {
            remaining: node.legal_values().len(),
            node,
        }
    }
}

impl<V: Variable, D: DomainValue> PartialEq for HeapEntry<V, D> {
    fn eq(&self, other: &Self) -> bool {
        self.remaining == other.remaining
    }
}

impl<V: Variable, D: DomainValue> Eq for HeapEntry<V, D> {}

impl<V: Variable, D: DomainValue> Ord for HeapEntry<V, D> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.remaining.cmp(&self.remaining)
    }
}

impl<V: Variable, D: DomainValue> PartialOrd for HeapEntry<V, D> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A search worker that owns one subtree of the solution space.
///
/// The agent holds a read-only handle to the domain map, the frozen variable
/// order, its own constraint tables, and an initial stack of root nodes. Its
/// search is depth-first except that queued siblings are reordered by their
/// precomputed legal-value counts.
#[derive(Debug)]
pub struct SearchAgent<V: Variable, D: DomainValue> {
    variables: Vec<V>,
    domain_map: Arc<DomainMap<V, D>>,
    roots: Vec<SearchNode<V, D>>,
    local: LocalConstraintTable<V, D>,
    global: GlobalConstraintTable<V, D>,
}

impl<V: Variable, D: DomainValue> SearchAgent<V, D> {
    pub fn new(
        domain_map: Arc<DomainMap<V, D>>,
        variables: Vec<V>,
        roots: Vec<SearchNode<V, D>>,
    ) -> Self {
        Self {
            variables,
            domain_map,
            roots,
            local: LocalConstraintTable::new(),
            global: GlobalConstraintTable::new(),
        }
    }

    /// Routes a constraint into the agent's private tables: under every known
    /// scope variable when it has a local view, into the global list
    /// otherwise.
    pub fn add_constraint(&mut self, constraint: SharedConstraint<V, D>) {
        match constraint.as_local() {
            Some(local) => {
                for variable in local.variables().to_vec() {
                    if self.variables.contains(&variable) {
                        self.local
                            .entry(variable)
                            .or_default()
                            .push(Arc::clone(&constraint));
                    }
                }
            }
            None => self.global.push(constraint),
        }
    }

    pub fn add_all_constraints(
        &mut self,
        constraints: impl IntoIterator<Item = SharedConstraint<V, D>>,
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

    /// Consumes the agent into a lazy stream over the solutions reachable
    /// from its initial stack.
    pub fn solutions(self, cancel: CancelToken) -> SolutionIter<V, D> {
        let mut heap = BinaryHeap::with_capacity(self.roots.len());
        for root in self.roots {
            heap.push(HeapEntry::new(root));
        }
        SolutionIter {
            variables: self.variables,
            domain_map: self.domain_map,
            local: self.local,
            global: self.global,
            heap,
            cancel,
            stats: SearchStats::default(),
        }
    }

    /// Drains the whole subtree.
    pub fn find_all(self) -> Vec<Assignment<V, D>> {
        self.solutions(CancelToken::new()).collect()
    }

    /// Stops at the first solution in the subtree, if any.
    pub fn find_one(self) -> Option<Assignment<V, D>> {
        self.solutions(CancelToken::new()).next()
    }
}

/// Lazy depth-first traversal of an agent's subtree.
///
/// Each `next` call pops nodes until a solution is confirmed or the heap
/// empties. Because domains are finite and every pushed child strictly
/// extends its parent's assignment, the traversal terminates.
#[derive(Debug)]
pub struct SolutionIter<V: Variable, D: DomainValue> {
    variables: Vec<V>,
    domain_map: Arc<DomainMap<V, D>>,
    local: LocalConstraintTable<V, D>,
    global: GlobalConstraintTable<V, D>,
    heap: BinaryHeap<HeapEntry<V, D>>,
    cancel: CancelToken,
    stats: SearchStats,
}

impl<V: Variable, D: DomainValue> SolutionIter<V, D> {
    /// Counters accumulated so far; final once the iterator is exhausted.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }
}

impl<V: Variable, D: DomainValue> Iterator for SolutionIter<V, D> {
    type Item = Assignment<V, D>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(entry) = self.heap.pop() {
            if self.cancel.is_cancelled() {
                self.heap.clear();
                return None;
            }
            self.stats.nodes_visited += 1;
            let node = entry.node;

            if !is_locally_consistent(node.variable(), node.assignment(), &self.local, &self.global)
            {
                self.stats.nodes_pruned += 1;
                continue;
            }

            if node.assignment().len() == self.variables.len() {
                if is_consistent(node.variable(), node.assignment(), &self.local, &self.global) {
                    self.stats.solutions_emitted += 1;
                    trace!(depth = node.depth(), "confirmed solution");
                    return Some(node.assignment().clone());
                }
                continue;
            }

            let Some(next_index) = self
                .variables
                .iter()
                .position(|variable| !node.assignment().contains_key(variable))
            else {
                continue;
            };
            let next_variable = self.variables[next_index].clone();
            let Some(domain) = self.domain_map.get(&next_variable) else {
                continue;
            };

            let reduced = reduce_domain(
                &next_variable,
                node.assignment(),
                domain.clone(),
                &self.local,
                &self.global,
            );
            let legal = legal_values(
                &next_variable,
                node.assignment(),
                domain,
                &self.local,
                &self.global,
            );

            let parent = Arc::new(node);
            for value in reduced {
                self.heap.push(HeapEntry::new(SearchNode::child(
                    &parent,
                    next_variable.clone(),
                    next_index,
                    value,
                    legal.clone(),
                )));
            }
        }
        None
    }
}
