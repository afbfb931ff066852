use enumset::EnumSet;

use super::domain_events::DomainEvent;
use super::predicates::Predicate;
use super::variables::DomainId;
use super::Domain;
use crate::basic_types::EmptyDomain;
use crate::basic_types::Inconsistency;
use crate::basic_types::InvalidNarrowing;
use crate::basic_types::Trail;
use crate::basic_types::TrailMark;
use crate::containers::KeyedVec;
use crate::gourd_assert_moderate;

/// Owns the domain of every variable of one search worker.
///
/// Every narrowing pushes the previous domain onto a trail, so [`VariableStore::restore`] can
/// return the store to exactly the state it had when a [`TrailMark`] was taken.
#[derive(Clone, Debug, Default)]
pub struct VariableStore {
    domains: KeyedVec<DomainId, Domain>,
    trail: Trail<(DomainId, Domain)>,
    /// Variables narrowed since the events were last drained, with what happened to them.
    events: Vec<(DomainId, EnumSet<DomainEvent>)>,
}

impl VariableStore {
    /// Creates a variable with the given initial domain.
    pub fn new_variable(&mut self, domain: Domain) -> DomainId {
        gourd_assert_moderate!(domain.is_normalised());
        self.domains.push(domain)
    }

    pub fn num_variables(&self) -> usize {
        self.domains.len()
    }

    pub fn variables(&self) -> impl Iterator<Item = DomainId> {
        self.domains.keys()
    }

    pub fn domain(&self, variable: DomainId) -> &Domain {
        &self.domains[variable]
    }

    pub fn lower_bound(&self, variable: DomainId) -> i64 {
        self.domains[variable].min()
    }

    pub fn upper_bound(&self, variable: DomainId) -> i64 {
        self.domains[variable].max()
    }

    pub fn contains(&self, variable: DomainId, value: i64) -> bool {
        self.domains[variable].contains(value)
    }

    pub fn is_fixed(&self, variable: DomainId) -> bool {
        self.domains[variable].is_fixed()
    }

    pub fn fixed_value(&self, variable: DomainId) -> Option<i64> {
        self.domains[variable].fixed_value()
    }

    pub fn all_fixed(&self) -> bool {
        self.domains.iter().all(Domain::is_fixed)
    }

    /// Replaces the domain of `variable` by `new_domain`, which must be a subset of the current
    /// domain.
    ///
    /// Returns whether the domain changed. A domain which would become empty is left untouched and
    /// reported as [`Inconsistency::EmptyDomain`]; a domain which is not a subset is reported as
    /// [`Inconsistency::InvalidNarrowing`].
    pub fn set_domain(
        &mut self,
        variable: DomainId,
        new_domain: Domain,
    ) -> Result<bool, Inconsistency> {
        let current = &self.domains[variable];

        if !new_domain.is_subset_of(current) {
            return Err(InvalidNarrowing { variable }.into());
        }
        if new_domain.is_empty() {
            return Err(EmptyDomain.into());
        }
        if new_domain == *current {
            return Ok(false);
        }

        let events = DomainEvent::between(current, &new_domain);
        let previous = std::mem::replace(&mut self.domains[variable], new_domain);
        self.trail.push((variable, previous));
        self.events.push((variable, events));

        Ok(true)
    }

    pub fn tighten_lower_bound(
        &mut self,
        variable: DomainId,
        bound: i64,
    ) -> Result<bool, Inconsistency> {
        if bound <= self.lower_bound(variable) {
            return Ok(false);
        }

        let mut narrowed = self.domains[variable].clone();
        let _ = narrowed.intersect_with(bound, i64::MAX)?;
        self.set_domain(variable, narrowed)
    }

    pub fn tighten_upper_bound(
        &mut self,
        variable: DomainId,
        bound: i64,
    ) -> Result<bool, Inconsistency> {
        if bound >= self.upper_bound(variable) {
            return Ok(false);
        }

        let mut narrowed = self.domains[variable].clone();
        let _ = narrowed.intersect_with(i64::MIN, bound)?;
        self.set_domain(variable, narrowed)
    }

    /// Narrows `variable` to `[lower_bound, upper_bound]`.
    pub fn intersect_bounds(
        &mut self,
        variable: DomainId,
        lower_bound: i64,
        upper_bound: i64,
    ) -> Result<bool, Inconsistency> {
        let mut narrowed = self.domains[variable].clone();
        if !narrowed.intersect_with(lower_bound, upper_bound)? {
            return Ok(false);
        }
        self.set_domain(variable, narrowed)
    }

    pub fn remove_value(&mut self, variable: DomainId, value: i64) -> Result<bool, Inconsistency> {
        if !self.contains(variable, value) {
            return Ok(false);
        }

        let mut narrowed = self.domains[variable].clone();
        let _ = narrowed.remove_value(value)?;
        self.set_domain(variable, narrowed)
    }

    pub fn fix(&mut self, variable: DomainId, value: i64) -> Result<bool, Inconsistency> {
        self.intersect_bounds(variable, value, value)
    }

    /// Narrows `variable` to the values it shares with `domain`.
    pub fn intersect_domain(
        &mut self,
        variable: DomainId,
        domain: &Domain,
    ) -> Result<bool, Inconsistency> {
        let mut narrowed = self.domains[variable].clone();
        if !narrowed.intersect_domain(domain)? {
            return Ok(false);
        }
        self.set_domain(variable, narrowed)
    }

    /// Applies the domain operation described by `predicate`.
    pub fn post_predicate(&mut self, predicate: Predicate) -> Result<bool, Inconsistency> {
        match predicate {
            Predicate::LowerBound {
                domain_id,
                lower_bound,
            } => self.tighten_lower_bound(domain_id, lower_bound),
            Predicate::UpperBound {
                domain_id,
                upper_bound,
            } => self.tighten_upper_bound(domain_id, upper_bound),
            Predicate::NotEqual {
                domain_id,
                not_equal_constant,
            } => self.remove_value(domain_id, not_equal_constant),
            Predicate::Equal {
                domain_id,
                equality_constant,
            } => self.fix(domain_id, equality_constant),
        }
    }

    /// A mark which [`VariableStore::restore`] can later return to. Marks are ordered: a later
    /// mark compares greater exactly when narrowings happened in between.
    pub fn snapshot(&self) -> TrailMark {
        self.trail.mark()
    }

    /// Undoes every narrowing performed since `mark` was taken, and discards pending events.
    pub fn restore(&mut self, mark: TrailMark) {
        for (variable, previous) in self.trail.truncate_to(mark) {
            self.domains[variable] = previous;
        }
        self.events.clear();
    }

    /// Forgets all history; the current domains become the new starting point.
    pub(crate) fn clear_trail(&mut self) {
        self.trail.clear();
        self.events.clear();
    }

    /// Takes the events recorded since the last call.
    pub(crate) fn drain_events(&mut self) -> std::vec::Drain<'_, (DomainId, EnumSet<DomainEvent>)> {
        self.events.drain(..)
    }

    pub(crate) fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}
