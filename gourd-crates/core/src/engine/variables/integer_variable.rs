use super::DomainId;
use crate::basic_types::Inconsistency;
use crate::engine::VariableStore;

/// A trait specifying the required behaviour of an integer variable such as retrieving a
/// lower-bound ([`IntegerVariable::lower_bound`]) or narrowing it through the store.
pub trait IntegerVariable: Clone + std::fmt::Debug {
    /// Get the lower bound of the variable.
    fn lower_bound(&self, store: &VariableStore) -> i64;

    /// Get the upper bound of the variable.
    fn upper_bound(&self, store: &VariableStore) -> i64;

    /// Determine whether the value is in the domain of this variable.
    fn contains(&self, store: &VariableStore, value: i64) -> bool;

    /// The value of the variable if its domain is a singleton.
    fn fixed_value(&self, store: &VariableStore) -> Option<i64>;

    fn is_fixed(&self, store: &VariableStore) -> bool {
        self.fixed_value(store).is_some()
    }

    /// Iterate over the values of the domain, in no particular order.
    fn iterate_domain(&self, store: &VariableStore) -> impl Iterator<Item = i64>;

    /// Removes every value below `bound`; returns whether the domain changed.
    fn set_lower_bound(&self, store: &mut VariableStore, bound: i64)
        -> Result<bool, Inconsistency>;

    /// Removes every value above `bound`; returns whether the domain changed.
    fn set_upper_bound(&self, store: &mut VariableStore, bound: i64)
        -> Result<bool, Inconsistency>;

    fn remove_value(&self, store: &mut VariableStore, value: i64) -> Result<bool, Inconsistency>;

    fn fix(&self, store: &mut VariableStore, value: i64) -> Result<bool, Inconsistency> {
        let lower = self.set_lower_bound(store, value)?;
        let upper = self.set_upper_bound(store, value)?;
        Ok(lower || upper)
    }

    /// The variable in the store whose domain this variable reads, if any.
    fn domain_id(&self) -> Option<DomainId>;
}

impl IntegerVariable for DomainId {
    fn lower_bound(&self, store: &VariableStore) -> i64 {
        store.lower_bound(*self)
    }

    fn upper_bound(&self, store: &VariableStore) -> i64 {
        store.upper_bound(*self)
    }

    fn contains(&self, store: &VariableStore, value: i64) -> bool {
        store.contains(*self, value)
    }

    fn fixed_value(&self, store: &VariableStore) -> Option<i64> {
        store.fixed_value(*self)
    }

    fn iterate_domain(&self, store: &VariableStore) -> impl Iterator<Item = i64> {
        store.domain(*self).iter()
    }

    fn set_lower_bound(
        &self,
        store: &mut VariableStore,
        bound: i64,
    ) -> Result<bool, Inconsistency> {
        store.tighten_lower_bound(*self, bound)
    }

    fn set_upper_bound(
        &self,
        store: &mut VariableStore,
        bound: i64,
    ) -> Result<bool, Inconsistency> {
        store.tighten_upper_bound(*self, bound)
    }

    fn remove_value(&self, store: &mut VariableStore, value: i64) -> Result<bool, Inconsistency> {
        store.remove_value(*self, value)
    }

    fn domain_id(&self) -> Option<DomainId> {
        Some(*self)
    }
}
