use super::ValueSelector;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::gourd_assert_advanced;
use crate::predicate;

/// A [`ValueSelector`] which splits the domain in half (based on the lower-bound and upper-bound,
/// disregarding holes) and removes the upper-half from the domain.
///
/// Note that this strategy will not necessarily result in an equal split if there are holes in
/// the domain.
#[derive(Debug, Copy, Clone)]
pub struct InDomainSplit;

impl ValueSelector<DomainId> for InDomainSplit {
    fn select_value(
        &mut self,
        context: &mut SelectionContext,
        decision_variable: DomainId,
    ) -> Predicate {
        predicate!(decision_variable <= InDomainSplit::middle(context, decision_variable))
    }
}

impl InDomainSplit {
    /// The largest value of the lower half of `[lower_bound, upper_bound]`.
    pub(crate) fn middle(context: &SelectionContext, decision_variable: DomainId) -> i64 {
        let lower_bound = context.lower_bound(decision_variable);
        let upper_bound = context.upper_bound(decision_variable);

        // Computed on the distance, which cannot overflow unlike the sum of the bounds.
        let middle = lower_bound.saturating_add_unsigned(upper_bound.abs_diff(lower_bound) / 2);
        gourd_assert_advanced!(
            lower_bound <= middle && middle < upper_bound,
            "It should hold that {lower_bound} <= {middle} < {upper_bound}"
        );
        middle
    }
}
