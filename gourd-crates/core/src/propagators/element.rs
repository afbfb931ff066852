use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::AffineView;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::VariableStore;

/// Target domains up to this size are filtered value by value; larger ones only by bounds.
const MAX_SUPPORT_ENUMERATION: u64 = 1024;

/// The constraint `array[index] == target`, with a zero-based `index`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    index: DomainId,
    array: Box<[AffineView]>,
    target: AffineView,
}

impl Element {
    pub fn new(
        index: DomainId,
        array: impl IntoIterator<Item = AffineView>,
        target: AffineView,
    ) -> Self {
        Element {
            index,
            array: array.into_iter().collect(),
            target,
        }
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = DomainId> + '_ {
        std::iter::once(self.index).chain(
            self.array
                .iter()
                .chain(std::iter::once(&self.target))
                .filter_map(IntegerVariable::domain_id),
        )
    }

    /// Whether `array[position]` can still equal the target, judged by bounds and, for fixed
    /// entries, by membership.
    fn supports(&self, store: &VariableStore, position: usize) -> bool {
        let entry = &self.array[position];
        if let Some(value) = entry.fixed_value(store) {
            return self.target.contains(store, value);
        }

        entry.lower_bound(store) <= self.target.upper_bound(store)
            && self.target.lower_bound(store) <= entry.upper_bound(store)
    }

    pub(crate) fn propagate(&self, store: &mut VariableStore) -> PropagationStatusCP {
        let last_position = i64::try_from(self.array.len()).unwrap_or(i64::MAX) - 1;
        let _ = store.intersect_bounds(self.index, 0, last_position)?;

        let unsupported = store
            .domain(self.index)
            .iter()
            .filter(|&position| !self.supports(store, position as usize))
            .collect::<Vec<_>>();
        for position in unsupported {
            let _ = store.remove_value(self.index, position)?;
        }

        let positions = store.domain(self.index).iter().collect::<Vec<_>>();
        let lower_bound = positions
            .iter()
            .map(|&position| self.array[position as usize].lower_bound(store))
            .min()
            .ok_or(Inconsistency::Conflict)?;
        let upper_bound = positions
            .iter()
            .map(|&position| self.array[position as usize].upper_bound(store))
            .max()
            .ok_or(Inconsistency::Conflict)?;
        let _ = self.target.set_lower_bound(store, lower_bound)?;
        let _ = self.target.set_upper_bound(store, upper_bound)?;

        self.filter_target_values(store, &positions)?;

        if let [position] = positions[..] {
            self.propagate_equality(store, &self.array[position as usize])?;
        }

        Ok(())
    }

    /// Removes target values which no remaining entry can take.
    fn filter_target_values(&self, store: &mut VariableStore, positions: &[i64]) -> PropagationStatusCP {
        let Some(variable) = self.target.variable() else {
            return Ok(());
        };
        if store.domain(variable).size() > MAX_SUPPORT_ENUMERATION {
            return Ok(());
        }

        let unsupported = self
            .target
            .iterate_domain(store)
            .filter(|&value| {
                !positions
                    .iter()
                    .any(|&position| self.array[position as usize].contains(store, value))
            })
            .collect::<Vec<_>>();
        for value in unsupported {
            let _ = self.target.remove_value(store, value)?;
        }

        Ok(())
    }

    /// With the index fixed, the selected entry and the target are equal.
    fn propagate_equality(&self, store: &mut VariableStore, entry: &AffineView) -> PropagationStatusCP {
        let _ = entry.set_lower_bound(store, self.target.lower_bound(store))?;
        let _ = entry.set_upper_bound(store, self.target.upper_bound(store))?;
        let _ = self.target.set_lower_bound(store, entry.lower_bound(store))?;
        let _ = self.target.set_upper_bound(store, entry.upper_bound(store))?;

        if let Some(value) = entry.fixed_value(store) {
            let _ = self.target.fix(store, value)?;
        }
        if let Some(value) = self.target.fixed_value(store) {
            let _ = entry.fix(store, value)?;
        }

        Ok(())
    }

    pub(crate) fn is_satisfied(&self, value: &dyn Fn(DomainId) -> i64) -> bool {
        usize::try_from(value(self.index))
            .ok()
            .and_then(|position| self.array.get(position))
            .is_some_and(|entry| entry.evaluate(value) == self.target.evaluate(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_helper::TestStore;
    use crate::engine::Domain;
    use crate::model::Constraint;

    #[test]
    fn index_is_restricted_to_supported_positions() {
        let mut store = TestStore::default();
        let index = store.new_variable(-3, 10);
        let target = store.new_variable(5, 6);

        let array = [3, 5, 9, 6].map(AffineView::constant);
        let constraint = Element::new(index, array, target.into());
        store.propagate(Constraint::Element(constraint)).expect("non-empty domain");

        assert_eq!(&Domain::from_values([1, 3]), store.domain(index));
    }

    #[test]
    fn target_takes_only_values_of_the_array() {
        let mut store = TestStore::default();
        let index = store.new_variable(0, 2);
        let target = store.new_variable(0, 10);

        let array = [2, 7, 4].map(AffineView::constant);
        let constraint = Element::new(index, array, target.into());
        store.propagate(Constraint::Element(constraint)).expect("non-empty domain");

        assert_eq!(&Domain::from_values([2, 7, 4]), store.domain(target));
    }

    #[test]
    fn fixed_index_links_entry_and_target() {
        let mut store = TestStore::default();
        let index = store.new_variable(1, 1);
        let a = store.new_variable(0, 10);
        let b = store.new_variable(3, 8);
        let target = store.new_variable(5, 20);

        let constraint = Element::new(index, [a.into(), b.into()], target.into());
        store.propagate(Constraint::Element(constraint)).expect("non-empty domain");

        assert_eq!(5, store.lower_bound(b));
        assert_eq!(8, store.upper_bound(target));
        assert_eq!(10, store.upper_bound(a));
    }

    #[test]
    fn no_supported_position_is_a_conflict() {
        let mut store = TestStore::default();
        let index = store.new_variable(0, 1);
        let target = store.new_variable(20, 30);

        let array = [1, 2].map(AffineView::constant);
        let result = store.propagate(Constraint::Element(Element::new(index, array, target.into())));

        assert!(result.is_err());
    }
}
