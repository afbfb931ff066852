use log::warn;

use crate::branching::tie_breaking::Direction;
use crate::branching::tie_breaking::InOrderTieBreaker;
use crate::branching::tie_breaking::TieBreaker;
use crate::branching::variable_selection::VariableSelector;
use crate::branching::SelectionContext;
use crate::engine::variables::DomainId;
use crate::gourd_assert_eq_simple;

/// A [`VariableSelector`] which selects the variable with the smallest domain, counting the
/// values in it (holes excluded).
///
/// Uses a [`TieBreaker`] to break ties, the default is the [`InOrderTieBreaker`] which selects
/// the earliest variable in the provided list.
pub struct FirstFail<Var, TieBreaking> {
    variables: Vec<Var>,
    tie_breaker: TieBreaking,
}

impl<Var, TieBreaking> std::fmt::Debug for FirstFail<Var, TieBreaking> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirstFail").finish()
    }
}

impl<Var: Copy> FirstFail<Var, InOrderTieBreaker<Var, u64>> {
    pub fn new(variables: &[Var]) -> Self {
        Self::with_tie_breaker(variables, InOrderTieBreaker::new(Direction::Minimum))
    }
}

impl<Var: Clone, TieBreaking: TieBreaker<Var, u64>> FirstFail<Var, TieBreaking> {
    pub fn with_tie_breaker(variables: &[Var], tie_breaker: TieBreaking) -> Self {
        gourd_assert_eq_simple!(
            tie_breaker.get_direction(),
            Direction::Minimum,
            "FirstFail looks for the smallest domain; the tie-breaker has to minimise"
        );
        if variables.is_empty() {
            warn!("The FirstFail variable selector was not provided with any variables");
        }

        Self {
            variables: variables.to_vec(),
            tie_breaker,
        }
    }
}

impl<TieBreaking> VariableSelector<DomainId> for FirstFail<DomainId, TieBreaking>
where
    TieBreaking: TieBreaker<DomainId, u64>,
{
    fn select_variable(&mut self, context: &mut SelectionContext) -> Option<DomainId> {
        self.variables
            .iter()
            .filter(|variable| !context.is_integer_fixed(**variable))
            .for_each(|variable| {
                self.tie_breaker
                    .consider(*variable, context.get_size_of_domain(*variable));
            });
        self.tie_breaker.select()
    }
}
