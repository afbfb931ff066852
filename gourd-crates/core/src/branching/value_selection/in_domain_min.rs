use super::ValueSelector;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::predicate;

/// [`ValueSelector`] which chooses to assign the provided variable to its lower bound.
#[derive(Debug, Copy, Clone)]
pub struct InDomainMin;

impl ValueSelector<DomainId> for InDomainMin {
    fn select_value(
        &mut self,
        context: &mut SelectionContext,
        decision_variable: DomainId,
    ) -> Predicate {
        predicate!(decision_variable <= context.lower_bound(decision_variable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::TestRandom;
    use crate::branching::value_selection::tests::store_with;
    use crate::engine::Domain;

    #[test]
    fn lower_bound_is_selected() {
        let (store, variable) = store_with(Domain::new(3, 10));
        let mut random = TestRandom::default();
        let mut context = SelectionContext::new(&store, &mut random);

        let decision = InDomainMin.select_value(&mut context, variable);

        assert_eq!(predicate!(variable <= 3), decision);
    }
}
