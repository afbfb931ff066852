//! Contains the [`crate::branching::Brancher`] implementations.
mod independent_variable_value_brancher;

pub use independent_variable_value_brancher::IndependentVariableValueBrancher;
