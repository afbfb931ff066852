use crate::engine::variables::DomainId;
use crate::engine::VariableStore;
use crate::predicate;

/// Representation of a domain operation, also known as an atomic constraint. It is a triple
/// ([`DomainId`], comparator, value).
///
/// To create a [`Predicate`], use the more concise [`predicate!`](crate::predicate) macro.
#[derive(Clone, PartialEq, Eq, Copy, Hash)]
pub enum Predicate {
    LowerBound {
        domain_id: DomainId,
        lower_bound: i64,
    },
    UpperBound {
        domain_id: DomainId,
        upper_bound: i64,
    },
    NotEqual {
        domain_id: DomainId,
        not_equal_constant: i64,
    },
    Equal {
        domain_id: DomainId,
        equality_constant: i64,
    },
}

impl Predicate {
    /// Returns the [`DomainId`] of the [`Predicate`]
    pub fn get_domain(&self) -> DomainId {
        match *self {
            Predicate::LowerBound { domain_id, .. }
            | Predicate::UpperBound { domain_id, .. }
            | Predicate::NotEqual { domain_id, .. }
            | Predicate::Equal { domain_id, .. } => domain_id,
        }
    }

    pub fn get_right_hand_side(&self) -> i64 {
        match *self {
            Predicate::LowerBound { lower_bound, .. } => lower_bound,
            Predicate::UpperBound { upper_bound, .. } => upper_bound,
            Predicate::NotEqual {
                not_equal_constant, ..
            } => not_equal_constant,
            Predicate::Equal {
                equality_constant, ..
            } => equality_constant,
        }
    }

    /// Whether every value left in the domain satisfies the predicate.
    pub fn is_satisfied(&self, store: &VariableStore) -> bool {
        let domain = store.domain(self.get_domain());
        match *self {
            Predicate::LowerBound { lower_bound, .. } => domain.min() >= lower_bound,
            Predicate::UpperBound { upper_bound, .. } => domain.max() <= upper_bound,
            Predicate::NotEqual {
                not_equal_constant, ..
            } => !domain.contains(not_equal_constant),
            Predicate::Equal {
                equality_constant, ..
            } => domain.fixed_value() == Some(equality_constant),
        }
    }

    /// Whether no value left in the domain satisfies the predicate.
    pub fn is_falsified(&self, store: &VariableStore) -> bool {
        (!*self).is_satisfied(store)
    }
}

impl std::ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        let domain_id = self.get_domain();

        match self {
            Predicate::LowerBound { lower_bound, .. } => {
                predicate!(domain_id <= lower_bound.saturating_sub(1))
            }
            Predicate::UpperBound { upper_bound, .. } => {
                predicate!(domain_id >= upper_bound.saturating_add(1))
            }
            Predicate::NotEqual {
                not_equal_constant, ..
            } => predicate!(domain_id == not_equal_constant),
            Predicate::Equal {
                equality_constant, ..
            } => predicate!(domain_id != equality_constant),
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let domain_id = self.get_domain();
        let rhs = self.get_right_hand_side();

        match self {
            Predicate::LowerBound { .. } => write!(f, "[{domain_id} >= {rhs}]"),
            Predicate::UpperBound { .. } => write!(f, "[{domain_id} <= {rhs}]"),
            Predicate::NotEqual { .. } => write!(f, "[{domain_id} != {rhs}]"),
            Predicate::Equal { .. } => write!(f, "[{domain_id} == {rhs}]"),
        }
    }
}

impl std::fmt::Debug for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::Domain;
    use crate::engine::VariableStore;
    use crate::predicate;

    #[test]
    fn negation_is_an_involution() {
        let mut store = VariableStore::default();
        let x = store.new_variable(Domain::new(0, 10));

        for predicate in [
            predicate![x >= 3],
            predicate![x <= 3],
            predicate![x == 3],
            predicate![x != 3],
        ] {
            assert_eq!(predicate, !!predicate);
        }
    }

    #[test]
    fn satisfaction_is_evaluated_against_the_domain() {
        let mut store = VariableStore::default();
        let x = store.new_variable(Domain::new(4, 6));

        assert!(predicate![x >= 4].is_satisfied(&store));
        assert!(predicate![x != 7].is_satisfied(&store));
        assert!(!predicate![x == 5].is_satisfied(&store));
        assert!(predicate![x <= 3].is_falsified(&store));
        assert!(!predicate![x <= 5].is_falsified(&store));
    }

    #[test]
    fn display_shows_comparator() {
        let mut store = VariableStore::default();
        let x = store.new_variable(Domain::new(0, 1));

        assert_eq!("[x0 >= 1]", predicate![x >= 1].to_string());
        assert_eq!("[x0 != 0]", predicate![x != 0].to_string());
    }
}
