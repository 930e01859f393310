use crate::solver::{
    assignment::DomainMap,
    domain::DomainProblem,
    preprocess::Preprocessor,
    problem::Problem,
    tree::TreeProblem,
    variable::{DomainValue, Variable},
};

/// The inputs needed to pick a container variant for a problem shape.
pub struct FactoryRequest<V: Variable, D: DomainValue> {
    pub domain_map: DomainMap<V, D>,
    pub preprocessors: Vec<Box<dyn Preprocessor<V, D>>>,
}

/// Picks a container for the problem shape: the domain variant when the
/// widest domain out-scales the variable count (fan-out pays for one worker
/// per value), the tree variant otherwise.
// TODO: dispatch very deep problem shapes to a time-bounded variant once one
// exists.
pub fn default_factory<V: Variable, D: DomainValue>(
    request: FactoryRequest<V, D>,
) -> Box<dyn Problem<V, D>> {
    let num_variables = request.domain_map.len();
    let max_domain = request
        .domain_map
        .values()
        .map(Vec::len)
        .max()
        .unwrap_or(0);
    if max_domain > num_variables {
        Box::new(DomainProblem::new(request.domain_map, request.preprocessors))
    } else {
        Box::new(TreeProblem::new(request.domain_map, request.preprocessors))
    }
}
