use super::ValueSelector;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::predicate;

/// [`ValueSelector`] which chooses to assign the provided variable to its upper bound.
#[derive(Debug, Copy, Clone)]
pub struct InDomainMax;

impl ValueSelector<DomainId> for InDomainMax {
    fn select_value(
        &mut self,
        context: &mut SelectionContext,
        decision_variable: DomainId,
    ) -> Predicate {
        predicate!(decision_variable >= context.upper_bound(decision_variable))
    }
}
