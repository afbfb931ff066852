//! Contains structures and traits to define the decision making procedure of a search worker.
//!
//! In general, it provides 3 traits:
//! - The [`Brancher`] which defines how a branching procedure (which selects an unfixed variable
//!   and splits the domain in some way) should operate; the main method of this trait is the
//!   [`Brancher::next_decision`] method. An example implementation of this trait is the
//!   [`IndependentVariableValueBrancher`].
//! - The [`VariableSelector`] which selects the next variable to branch on; the main method of
//!   this trait is the [`VariableSelector::select_variable`] method. An example implementation of
//!   this trait is the [`FirstFail`] strategy.
//! - The [`ValueSelector`] which turns the selected variable into a decision; the main method of
//!   this trait is the [`ValueSelector::select_value`] method.
//!
//! A decision is a [`Predicate`]; the search tries the predicate first and its negation on
//! backtrack.

mod brancher;
pub mod branchers;
mod selection_context;
pub mod tie_breaking;
pub mod value_selection;
pub mod variable_selection;

pub use brancher::Brancher;
pub use selection_context::SelectionContext;

#[cfg(doc)]
use crate::branching::branchers::IndependentVariableValueBrancher;
#[cfg(doc)]
use crate::branching::value_selection::ValueSelector;
#[cfg(doc)]
use crate::branching::variable_selection::FirstFail;
#[cfg(doc)]
use crate::branching::variable_selection::VariableSelector;
#[cfg(doc)]
use crate::predicates::Predicate;
