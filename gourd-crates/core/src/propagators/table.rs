use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::DomainId;
use crate::engine::Domain;
use crate::engine::VariableStore;

/// The constraint that the tuple of variables is (or, for a forbidden table, is not) one of the
/// listed tuples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    variables: Box<[DomainId]>,
    tuples: Box<[Box<[i64]>]>,
    forbidden: bool,
}

impl Table {
    pub fn allowed(
        variables: impl IntoIterator<Item = DomainId>,
        tuples: impl IntoIterator<Item = Vec<i64>>,
    ) -> Self {
        Table {
            variables: variables.into_iter().collect(),
            tuples: tuples.into_iter().map(Vec::into_boxed_slice).collect(),
            forbidden: false,
        }
    }

    pub fn forbidden(
        variables: impl IntoIterator<Item = DomainId>,
        tuples: impl IntoIterator<Item = Vec<i64>>,
    ) -> Self {
        Table {
            forbidden: true,
            ..Table::allowed(variables, tuples)
        }
    }

    pub fn arity(&self) -> usize {
        self.variables.len()
    }

    pub fn tuples(&self) -> impl Iterator<Item = &[i64]> {
        self.tuples.iter().map(|tuple| &tuple[..])
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = DomainId> + '_ {
        self.variables.iter().copied()
    }

    pub(crate) fn propagate(&self, store: &mut VariableStore) -> PropagationStatusCP {
        if self.forbidden {
            self.propagate_forbidden(store)
        } else {
            self.propagate_allowed(store)
        }
    }

    fn is_supported(&self, store: &VariableStore, tuple: &[i64]) -> bool {
        self.variables
            .iter()
            .zip(tuple)
            .all(|(&variable, &value)| store.contains(variable, value))
    }

    /// Every value must appear at its position in some tuple that is still possible.
    fn propagate_allowed(&self, store: &mut VariableStore) -> PropagationStatusCP {
        let supported = self
            .tuples
            .iter()
            .filter(|tuple| self.is_supported(store, tuple))
            .collect::<Vec<_>>();

        if supported.is_empty() {
            return Err(Inconsistency::Conflict);
        }

        for (position, &variable) in self.variables.iter().enumerate() {
            let values = Domain::from_values(supported.iter().map(|tuple| tuple[position]));
            let _ = store.intersect_domain(variable, &values)?;
        }

        Ok(())
    }

    /// A forbidden tuple with all but one position fixed to it removes the remaining value.
    fn propagate_forbidden(&self, store: &mut VariableStore) -> PropagationStatusCP {
        for tuple in self.tuples.iter() {
            let mut open_position = None;
            let mut matches = true;

            for (position, (&variable, &value)) in self.variables.iter().zip(tuple.iter()).enumerate() {
                match store.fixed_value(variable) {
                    Some(fixed) if fixed == value => {}
                    Some(_) => {
                        matches = false;
                        break;
                    }
                    None if !store.contains(variable, value) => {
                        matches = false;
                        break;
                    }
                    None if open_position.is_none() => open_position = Some(position),
                    None => {
                        matches = false;
                        break;
                    }
                }
            }

            if !matches {
                continue;
            }

            match open_position {
                None => return Err(Inconsistency::Conflict),
                Some(position) => {
                    let _ = store.remove_value(self.variables[position], tuple[position])?;
                }
            }
        }

        Ok(())
    }

    pub(crate) fn is_satisfied(&self, value: &dyn Fn(DomainId) -> i64) -> bool {
        let assignment = self.variables.iter().map(|&variable| value(variable)).collect::<Vec<_>>();
        let listed = self.tuples.iter().any(|tuple| tuple[..] == assignment[..]);

        listed != self.forbidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_helper::TestStore;
    use crate::model::Constraint;

    #[test]
    fn allowed_tuples_restrict_each_column() {
        let mut store = TestStore::default();
        let x = store.new_variable(0, 5);
        let y = store.new_variable(0, 5);

        let table = Table::allowed([x, y], [vec![1, 2], vec![3, 4], vec![5, 9]]);
        store.propagate(Constraint::Table(table)).expect("non-empty domain");

        assert_eq!(&Domain::from_values([1, 3]), store.domain(x));
        assert_eq!(&Domain::from_values([2, 4]), store.domain(y));
    }

    #[test]
    fn no_supported_tuple_is_a_conflict() {
        let mut store = TestStore::default();
        let x = store.new_variable(0, 1);
        let y = store.new_variable(0, 1);

        let table = Table::allowed([x, y], [vec![2, 0], vec![0, 3]]);

        assert!(store.propagate(Constraint::Table(table)).is_err());
    }

    #[test]
    fn forbidden_tuple_removes_last_value() {
        let mut store = TestStore::default();
        let x = store.new_variable(1, 1);
        let y = store.new_variable(0, 3);

        let table = Table::forbidden([x, y], [vec![1, 2], vec![0, 3]]);
        store.propagate(Constraint::Table(table)).expect("non-empty domain");

        assert!(!store.contains(y, 2));
        assert!(store.contains(y, 3));
    }

    #[test]
    fn fully_fixed_forbidden_tuple_is_a_conflict() {
        let mut store = TestStore::default();
        let x = store.new_variable(1, 1);
        let y = store.new_variable(2, 2);

        let table = Table::forbidden([x, y], [vec![1, 2]]);

        assert_eq!(
            Err(Inconsistency::Conflict),
            store.propagate(Constraint::Table(table))
        );
    }
}
