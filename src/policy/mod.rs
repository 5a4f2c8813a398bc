//! Policy trait and baseline bidders.

pub mod heuristic;
pub mod random;
pub mod trait_;

pub use heuristic::GreedyHeuristicPolicy;
pub use random::RandomPolicy;
pub use trait_::Policy;
