use log::warn;

use crate::branching::variable_selection::VariableSelector;
use crate::branching::SelectionContext;
use crate::engine::variables::DomainId;

/// A [`VariableSelector`] which selects an unfixed variable uniformly at random.
#[derive(Debug)]
pub struct RandomSelector<Var> {
    variables: Vec<Var>,
}

impl<Var: Copy> RandomSelector<Var> {
    pub fn new(variables: &[Var]) -> Self {
        if variables.is_empty() {
            warn!("The RandomSelector variable selector was not provided with any variables");
        }
        RandomSelector {
            variables: variables.to_vec(),
        }
    }
}

impl VariableSelector<DomainId> for RandomSelector<DomainId> {
    fn select_variable(&mut self, context: &mut SelectionContext) -> Option<DomainId> {
        let unfixed = self
            .variables
            .iter()
            .copied()
            .filter(|&variable| !context.is_integer_fixed(variable))
            .collect::<Vec<_>>();
        if unfixed.is_empty() {
            return None;
        }

        let index = context.random().generate_usize_in_range(0..unfixed.len());
        Some(unfixed[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::TestRandom;
    use crate::engine::Domain;
    use crate::engine::VariableStore;

    #[test]
    fn random_index_among_unfixed_variables() {
        let mut store = VariableStore::default();
        let first = store.new_variable(Domain::new(0, 10));
        let fixed = store.new_variable(Domain::singleton(4));
        let last = store.new_variable(Domain::new(0, 1));
        let mut random = TestRandom {
            usizes: vec![1],
            ..Default::default()
        };
        let mut context = SelectionContext::new(&store, &mut random);

        let mut selector = RandomSelector::new(&[first, fixed, last]);

        assert_eq!(Some(last), selector.select_variable(&mut context));
    }
}
