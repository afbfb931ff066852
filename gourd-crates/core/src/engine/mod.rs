//! The propagation and search machinery: domains and their trail, the fixpoint loop over the
//! constraints of a model, and the depth-first search a worker runs on top of it.

mod domain;
pub(crate) mod domain_events;
mod objective;
pub mod predicates;
mod propagation_engine;
mod propagator_id;
mod propagator_queue;
pub(crate) mod search;
mod solver_statistics;
pub mod termination;
#[cfg(test)]
pub(crate) mod test_helper;
mod variable_store;
pub mod variables;

pub use domain::Domain;
pub use objective::Objective;
pub(crate) use objective::ObjectiveManager;
pub use propagator_id::PropagatorId;
pub use solver_statistics::SolverStatistics;
pub use variable_store::VariableStore;
