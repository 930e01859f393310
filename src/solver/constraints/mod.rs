pub mod all_different;
pub mod cardinality;
pub mod minimum_heuristic;
