use log::warn;

use crate::branching::tie_breaking::Direction;
use crate::branching::tie_breaking::InOrderTieBreaker;
use crate::branching::tie_breaking::TieBreaker;
use crate::branching::variable_selection::VariableSelector;
use crate::branching::SelectionContext;
use crate::engine::variables::DomainId;

/// A [`VariableSelector`] which selects the unfixed variable with the largest domain; ties are
/// broken towards the earliest variable in the list.
#[derive(Debug)]
pub struct AntiFirstFail<Var> {
    variables: Vec<Var>,
    tie_breaker: InOrderTieBreaker<Var, u64>,
}

impl<Var: Copy> AntiFirstFail<Var> {
    pub fn new(variables: &[Var]) -> Self {
        if variables.is_empty() {
            warn!("The AntiFirstFail variable selector was not provided with any variables");
        }
        AntiFirstFail {
            variables: variables.to_vec(),
            tie_breaker: InOrderTieBreaker::new(Direction::Maximum),
        }
    }
}

impl VariableSelector<DomainId> for AntiFirstFail<DomainId> {
    fn select_variable(&mut self, context: &mut SelectionContext) -> Option<DomainId> {
        for &variable in self.variables.iter() {
            if !context.is_integer_fixed(variable) {
                self.tie_breaker
                    .consider(variable, context.get_size_of_domain(variable));
            }
        }
        self.tie_breaker.select()
    }
}
