use super::AffineView;
use super::DomainId;
use super::IntegerVariable;
use super::Literal;
use crate::basic_types::Inconsistency;
use crate::engine::VariableStore;

/// A scheduling interval `[start, end)` of length `size`, optionally guarded by a presence
/// literal.
///
/// The relation `start + size == end` is posted as a separate linear constraint enforced by the
/// presence literal when the interval is created; the scheduling propagators only read the three
/// expressions. An interval whose presence literal is false is absent and ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntervalVar {
    pub start: AffineView,
    pub size: AffineView,
    pub end: AffineView,
    pub presence: Option<Literal>,
}

impl IntervalVar {
    /// Earliest start time.
    pub(crate) fn est(&self, store: &VariableStore) -> i64 {
        self.start.lower_bound(store)
    }

    /// Latest start time.
    pub(crate) fn lst(&self, store: &VariableStore) -> i64 {
        self.start.upper_bound(store)
    }

    /// Earliest completion time.
    pub(crate) fn ect(&self, store: &VariableStore) -> i64 {
        self.end
            .lower_bound(store)
            .max(self.est(store).saturating_add(self.size.lower_bound(store)))
    }

    /// Latest completion time.
    pub(crate) fn lct(&self, store: &VariableStore) -> i64 {
        self.end
            .upper_bound(store)
            .min(self.lst(store).saturating_add(self.size.upper_bound(store)))
    }

    pub(crate) fn min_size(&self, store: &VariableStore) -> i64 {
        self.size.lower_bound(store)
    }

    /// Whether the interval is known to be present.
    pub(crate) fn is_present(&self, store: &VariableStore) -> bool {
        self.presence.map_or(true, |literal| literal.is_true(store))
    }

    /// Whether the interval is known to be absent.
    pub(crate) fn is_absent(&self, store: &VariableStore) -> bool {
        self.presence.is_some_and(|literal| literal.is_false(store))
    }

    /// Makes the interval absent; a conflict if it is mandatory.
    pub(crate) fn set_absent(&self, store: &mut VariableStore) -> Result<bool, Inconsistency> {
        match self.presence {
            Some(literal) => literal.set_false(store),
            None => Err(Inconsistency::Conflict),
        }
    }

    /// Removes start times before `bound`, keeping `end` in step.
    pub(crate) fn set_earliest_start(
        &self,
        store: &mut VariableStore,
        bound: i64,
    ) -> Result<bool, Inconsistency> {
        let start = self.start.set_lower_bound(store, bound)?;
        let end = self
            .end
            .set_lower_bound(store, bound.saturating_add(self.min_size(store)))?;
        Ok(start || end)
    }

    /// Removes completion times after `bound`, keeping `start` in step.
    pub(crate) fn set_latest_completion(
        &self,
        store: &mut VariableStore,
        bound: i64,
    ) -> Result<bool, Inconsistency> {
        let end = self.end.set_upper_bound(store, bound)?;
        let start = self
            .start
            .set_upper_bound(store, bound.saturating_sub(self.min_size(store)))?;
        Ok(start || end)
    }

    pub(crate) fn collect_variables(&self, variables: &mut Vec<DomainId>) {
        variables.extend(
            [self.start, self.size, self.end]
                .iter()
                .filter_map(IntegerVariable::domain_id),
        );
        variables.extend(self.presence.map(|literal| literal.variable()));
    }

    /// Whether the interval is present under a complete assignment.
    pub(crate) fn evaluate_presence(&self, value: &dyn Fn(DomainId) -> i64) -> bool {
        self.presence.map_or(true, |literal| literal.evaluate(value))
    }
}
