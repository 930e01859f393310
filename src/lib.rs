//! Concord is a generic, parallel constraint satisfaction problem (CSP) solver.
//!
//! A problem is a finite mapping from variables to candidate value-sets plus a
//! collection of constraints over those variables. The solver enumerates the
//! assignments that satisfy every constraint, in "find one" and "find all"
//! modes.
//!
//! # Core Concepts
//!
//! - **[`Constraint`]**: a rule over a (partial) assignment. Constraints with a
//!   declared variable scope expose a [`LocalConstraint`] view used for cheap
//!   monotone checks and arc consistency; constraints without one are *global*
//!   and are only checked strictly. The crate ships a standard library of
//!   constraints such as [`AllDifferentConstraint`] and
//!   [`CardinalityConstraint`].
//! - **[`Problem`]**: the container surface. [`DomainProblem`] partitions the
//!   root variable's domain and searches one subtree per worker;
//!   [`TreeProblem`] runs the whole search on a single agent.
//! - **[`Ac3Preprocessor`]**: offline domain reduction over unary and binary
//!   constraints, run before search.
//!
//! [`Constraint`]: solver::constraint::Constraint
//! [`LocalConstraint`]: solver::constraint::LocalConstraint
//! [`AllDifferentConstraint`]: solver::constraints::all_different::AllDifferentConstraint
//! [`CardinalityConstraint`]: solver::constraints::cardinality::CardinalityConstraint
//! [`Problem`]: solver::problem::Problem
//! [`DomainProblem`]: solver::domain::DomainProblem
//! [`TreeProblem`]: solver::tree::TreeProblem
//! [`Ac3Preprocessor`]: solver::preprocess::Ac3Preprocessor
//!
//! # Example: A Simple 2-Variable Problem
//!
//! Solving for `?a != ?b` where `?a` can be `1` or `2` and `?b` can only be
//! `1`. The solver deduces that `?a` must be `2`.
//!
//! ```
//! use concord::solver::constraints::all_different::AllDifferentConstraint;
//! use concord::solver::problem::Problem;
//! use concord::solver::tree::TreeProblem;
//!
//! let mut domains = std::collections::HashMap::new();
//! domains.insert("a", vec![1, 2]);
//! domains.insert("b", vec![1]);
//!
//! let mut problem = TreeProblem::new(domains, Vec::new());
//! problem.add_constraint(Box::new(AllDifferentConstraint::new(vec!["a", "b"])));
//!
//! let solutions = problem.find_all()?;
//! assert_eq!(solutions.len(), 1);
//! assert_eq!(solutions[0].get("a"), Some(&2));
//! assert_eq!(solutions[0].get("b"), Some(&1));
//! # Ok::<(), concord::error::Error>(())
//! ```
pub mod error;
pub mod solver;

#[cfg(test)]
pub mod examples;
