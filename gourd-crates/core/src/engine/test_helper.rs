#![cfg(test)]
//! Helpers to set up the domains a propagator is tested against. The [`TestStore`] creates
//! variables and runs a single constraint to its own fixpoint.
use std::ops::Deref;
use std::ops::DerefMut;

use super::variables::AffineView;
use super::variables::DomainId;
use super::variables::IntervalVar;
use super::variables::Literal;
use super::Domain;
use super::VariableStore;
use crate::basic_types::PropagationStatusCP;
use crate::model::Constraint;
use crate::model::ConstraintRecord;

/// A container for variables, which can be used to test propagators.
#[derive(Debug, Default)]
pub(crate) struct TestStore {
    store: VariableStore,
}

impl TestStore {
    pub(crate) fn new_variable(&mut self, lower_bound: i64, upper_bound: i64) -> DomainId {
        self.store.new_variable(Domain::new(lower_bound, upper_bound))
    }

    pub(crate) fn new_literal(&mut self) -> Literal {
        Literal::new(self.new_variable(0, 1))
    }

    /// An interval of constant `size` whose start lies in `[start_lower, start_upper]`; the end is
    /// a separate variable with the matching range.
    pub(crate) fn new_interval(
        &mut self,
        start_lower: i64,
        start_upper: i64,
        size: i64,
        presence: Option<Literal>,
    ) -> IntervalVar {
        let start = self.new_variable(start_lower, start_upper);
        let end = self.new_variable(start_lower + size, start_upper + size);

        IntervalVar {
            start: start.into(),
            size: AffineView::constant(size),
            end: end.into(),
            presence,
        }
    }

    /// Runs the constraint until it no longer narrows any domain.
    pub(crate) fn propagate(&mut self, constraint: Constraint) -> PropagationStatusCP {
        ConstraintRecord::new(constraint)
            .propagate(&mut self.store)
            .map(|_| ())
    }
}

impl Deref for TestStore {
    type Target = VariableStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl DerefMut for TestStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}
