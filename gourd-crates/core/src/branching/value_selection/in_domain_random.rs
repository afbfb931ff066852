use super::ValueSelector;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::predicate;

/// A [`ValueSelector`] which assigns to a random value in the domain.
///
/// A value is drawn uniformly from the bounds and moved up to the next value in the domain, so
/// values right after a hole are favoured.
#[derive(Debug, Clone, Copy)]
pub struct InDomainRandom;

impl ValueSelector<DomainId> for InDomainRandom {
    fn select_value(
        &mut self,
        context: &mut SelectionContext,
        decision_variable: DomainId,
    ) -> Predicate {
        let lower_bound = context.lower_bound(decision_variable);
        let upper_bound = context.upper_bound(decision_variable);
        let drawn = context
            .random()
            .generate_i64_in_range(lower_bound, upper_bound);

        // The upper bound is in the domain, so a next value always exists.
        let value = context
            .domain(decision_variable)
            .next_value(drawn)
            .unwrap_or(upper_bound);
        predicate!(decision_variable == value)
    }
}
