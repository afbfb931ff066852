//! A [`Brancher`] which simply uses a single [`VariableSelector`] and a single [`ValueSelector`].

use std::marker::PhantomData;

use crate::branching::value_selection::ValueSelector;
use crate::branching::variable_selection::VariableSelector;
use crate::branching::Brancher;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;

/// An implementation of a [`Brancher`] which simply uses a single [`VariableSelector`] and a
/// single [`ValueSelector`] independently of one another.
#[derive(Debug)]
pub struct IndependentVariableValueBrancher<Var, VariableSelect, ValueSelect> {
    /// Determines which (unfixed) variable to branch next on.
    pub(crate) variable_selector: VariableSelect,
    /// Determines which value in the domain to branch next on given a variable.
    pub(crate) value_selector: ValueSelect,
    /// [`PhantomData`] to ensure that the variable type is bound to the brancher
    pub(crate) variable_type: PhantomData<Var>,
}

impl<Var, VariableSelect, ValueSelect>
    IndependentVariableValueBrancher<Var, VariableSelect, ValueSelect>
where
    VariableSelect: VariableSelector<Var>,
    ValueSelect: ValueSelector<Var>,
{
    pub fn new(variable_selector: VariableSelect, value_selector: ValueSelect) -> Self {
        IndependentVariableValueBrancher {
            variable_selector,
            value_selector,
            variable_type: PhantomData,
        }
    }
}

impl<Var, VariableSelect, ValueSelect> Brancher
    for IndependentVariableValueBrancher<Var, VariableSelect, ValueSelect>
where
    Var: std::fmt::Debug,
    VariableSelect: VariableSelector<Var>,
    ValueSelect: ValueSelector<Var>,
{
    /// First we select a variable
    ///  - If all variables under consideration are fixed (i.e. `select_variable` return None) then
    ///    we simply return None
    ///  - Otherwise we select a value and return the corresponding predicate
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Predicate> {
        self.variable_selector
            .select_variable(context)
            .map(|selected_variable| self.value_selector.select_value(context, selected_variable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::TestRandom;
    use crate::branching::value_selection::InDomainMin;
    use crate::branching::variable_selection::FirstFail;
    use crate::engine::Domain;
    use crate::engine::VariableStore;
    use crate::predicate;

    #[test]
    fn decision_combines_variable_and_value() {
        let mut store = VariableStore::default();
        let wide = store.new_variable(Domain::new(0, 10));
        let narrow = store.new_variable(Domain::new(4, 6));
        let mut random = TestRandom::default();
        let mut context = SelectionContext::new(&store, &mut random);

        let mut brancher =
            IndependentVariableValueBrancher::new(FirstFail::new(&[wide, narrow]), InDomainMin);

        assert_eq!(
            Some(predicate!(narrow <= 4)),
            brancher.next_decision(&mut context)
        );
    }

    #[test]
    fn no_decision_when_everything_is_fixed() {
        let mut store = VariableStore::default();
        let fixed = store.new_variable(Domain::singleton(1));
        let mut random = TestRandom::default();
        let mut context = SelectionContext::new(&store, &mut random);

        let mut brancher =
            IndependentVariableValueBrancher::new(FirstFail::new(&[fixed]), InDomainMin);

        assert_eq!(None, brancher.next_decision(&mut context));
    }
}
