use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;

/// A trait for definining a branching strategy (oftentimes utilising a
/// [`crate::branching::variable_selection::VariableSelector`] and a
/// [`crate::branching::value_selection::ValueSelector`]).
pub trait Brancher: std::fmt::Debug {
    /// Returns the next decision concerning a single variable and value; it returns the
    /// [`Predicate`] corresponding to this decision (or [`None`] if all variables under
    /// consideration are assigned).
    ///
    /// The negation of the returned predicate is the alternative tried on backtrack, so the
    /// predicate has to be neither true nor false under the current domains.
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Predicate>;
}

impl<B: Brancher + ?Sized> Brancher for Box<B> {
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Predicate> {
        (**self).next_decision(context)
    }
}
