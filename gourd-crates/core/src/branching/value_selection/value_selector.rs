use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;

/// A trait containing the interface for [`ValueSelector`]s, specifying the methods required for
/// selecting values.
pub trait ValueSelector<Var>: std::fmt::Debug {
    /// Determines which value in the domain of `decision_variable` to branch next on. The
    /// predicate which is returned by this method is the first alternative tried; its negation is
    /// the second. It must be neither true nor false under the current domains.
    fn select_value(&mut self, context: &mut SelectionContext, decision_variable: Var)
        -> Predicate;
}

impl<Var, Selector: ValueSelector<Var> + ?Sized> ValueSelector<Var> for Box<Selector> {
    fn select_value(
        &mut self,
        context: &mut SelectionContext,
        decision_variable: Var,
    ) -> Predicate {
        (**self).select_value(context, decision_variable)
    }
}
