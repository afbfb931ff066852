//! The solving interface: [`CpSolver`] runs the search on a [`Model`](crate::model::Model) with the
//! given [`SolverParameters`] and answers with a [`SolveResponse`].

mod outputs;
mod parameters;
mod solve_context;
mod solver;

pub use outputs::SolutionView;
pub use outputs::SolveResponse;
pub use outputs::SolverStatus;
pub use parameters::SolverParameters;
pub use parameters::ValueSelection;
pub use parameters::VariableSelection;
pub use solver::CpSolver;
