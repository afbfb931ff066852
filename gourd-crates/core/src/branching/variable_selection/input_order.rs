use log::warn;

use crate::branching::variable_selection::VariableSelector;
use crate::branching::SelectionContext;
use crate::engine::variables::DomainId;

/// A [`VariableSelector`] which selects the first variable which is not fixed given the order in
/// the provided list.
#[derive(Debug)]
pub struct InputOrder<Var> {
    variables: Vec<Var>,
}

impl<Var: Copy> InputOrder<Var> {
    pub fn new(variables: &[Var]) -> Self {
        if variables.is_empty() {
            warn!("The InputOrder variable selector was not provided with any variables");
        }
        InputOrder {
            variables: variables.to_vec(),
        }
    }
}

impl VariableSelector<DomainId> for InputOrder<DomainId> {
    fn select_variable(&mut self, context: &mut SelectionContext) -> Option<DomainId> {
        self.variables
            .iter()
            .find(|variable| !context.is_integer_fixed(**variable))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::TestRandom;
    use crate::engine::Domain;
    use crate::engine::VariableStore;

    #[test]
    fn first_unfixed_variable_is_selected() {
        let mut store = VariableStore::default();
        let fixed = store.new_variable(Domain::singleton(3));
        let first = store.new_variable(Domain::new(0, 10));
        let second = store.new_variable(Domain::new(0, 1));
        let mut random = TestRandom::default();
        let mut context = SelectionContext::new(&store, &mut random);

        let mut selector = InputOrder::new(&[fixed, first, second]);

        assert_eq!(Some(first), selector.select_variable(&mut context));
    }
}
