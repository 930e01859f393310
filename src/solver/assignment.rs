use crate::solver::variable::{DomainValue, Variable};

/// A partial mapping from variables to domain values.
///
/// Backed by a persistent map: extending an assignment for a child search
/// node shares structure with the parent's snapshot instead of copying it,
/// while still behaving as an independent value in each branch.
pub type Assignment<V, D> = im::HashMap<V, D>;

/// The candidate values for every variable in a problem.
///
/// A domain is an ordered sequence of values; duplicates carry no meaning.
pub type DomainMap<V, D> = std::collections::HashMap<V, Vec<D>>;

/// Collects the bindings forced by singleton domains.
pub fn singleton_bindings<V: Variable, D: DomainValue>(
    domain_map: &DomainMap<V, D>,
) -> Assignment<V, D> {
    let mut assignment = Assignment::new();
    for (variable, domain) in domain_map {
        if let [value] = domain.as_slice() {
            assignment.insert(variable.clone(), value.clone());
        }
    }
    assignment
}
