use crate::branching::SelectionContext;

/// A trait containing the interface for [`VariableSelector`]s, specifying the methods required
/// for selecting variables.
pub trait VariableSelector<Var>: std::fmt::Debug {
    /// Determines which variable to select next if there are any left to branch on.
    /// Should only return [`None`] when all variables which have been passed to the
    /// [`VariableSelector`] have been assigned. Otherwise it should return the variable to
    /// branch on next.
    fn select_variable(&mut self, context: &mut SelectionContext) -> Option<Var>;
}

impl<Var, Selector: VariableSelector<Var> + ?Sized> VariableSelector<Var> for Box<Selector> {
    fn select_variable(&mut self, context: &mut SelectionContext) -> Option<Var> {
        (**self).select_variable(context)
    }
}
