pub(crate) mod disjoint_set;
pub mod match_group;
pub mod pairwise_search;
