use super::InDomainSplit;
use super::ValueSelector;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::predicate;

/// A [`ValueSelector`] which splits the domain in half (based on the lower-bound and upper-bound,
/// disregarding holes) and removes the lower-half from the domain.
#[derive(Debug, Copy, Clone)]
pub struct ReverseInDomainSplit;

impl ValueSelector<DomainId> for ReverseInDomainSplit {
    fn select_value(
        &mut self,
        context: &mut SelectionContext,
        decision_variable: DomainId,
    ) -> Predicate {
        // The middle is below the upper bound, so the increment cannot overflow.
        let bound = InDomainSplit::middle(context, decision_variable) + 1;
        predicate!(decision_variable >= bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::TestRandom;
    use crate::branching::value_selection::tests::store_with;
    use crate::engine::Domain;

    #[test]
    fn lower_half_is_excluded() {
        let (store, variable) = store_with(Domain::new(0, 10));
        let mut random = TestRandom::default();
        let mut context = SelectionContext::new(&store, &mut random);

        let decision = ReverseInDomainSplit.select_value(&mut context, variable);

        assert_eq!(predicate!(variable >= 6), decision);
    }
}
