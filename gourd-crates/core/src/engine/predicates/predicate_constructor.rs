use super::Predicate;
use crate::engine::variables::DomainId;

/// Builds the [`Predicate`]s over a variable; used by the [`predicate!`](crate::predicate) macro.
pub trait PredicateConstructor {
    /// `[self >= bound]`
    fn at_least(&self, bound: i64) -> Predicate;

    /// `[self <= bound]`
    fn at_most(&self, bound: i64) -> Predicate;

    /// `[self == value]`
    fn equal_to(&self, value: i64) -> Predicate;

    /// `[self != value]`
    fn not_equal_to(&self, value: i64) -> Predicate;
}

impl PredicateConstructor for DomainId {
    fn at_least(&self, bound: i64) -> Predicate {
        Predicate::LowerBound {
            domain_id: *self,
            lower_bound: bound,
        }
    }

    fn at_most(&self, bound: i64) -> Predicate {
        Predicate::UpperBound {
            domain_id: *self,
            upper_bound: bound,
        }
    }

    fn equal_to(&self, value: i64) -> Predicate {
        Predicate::Equal {
            domain_id: *self,
            equality_constant: value,
        }
    }

    fn not_equal_to(&self, value: i64) -> Predicate {
        Predicate::NotEqual {
            domain_id: *self,
            not_equal_constant: value,
        }
    }
}

/// Creates a [`Predicate`] over a [`DomainId`] with a comparison syntax.
///
/// # Example
/// ```rust
/// # use gourd_core::predicate;
/// # use gourd_core::variables::DomainId;
/// # use gourd_core::predicates::Predicate;
/// let x = DomainId::new(0);
///
/// let at_least_five = predicate!(x >= 5);
/// assert_eq!(
///     at_least_five,
///     Predicate::LowerBound {
///         domain_id: x,
///         lower_bound: 5
///     }
/// );
/// assert_eq!(at_least_five.to_string(), "[x0 >= 5]");
/// ```
#[macro_export]
macro_rules! predicate {
    ($variable:ident >= $bound:expr) => {
        $crate::predicates::PredicateConstructor::at_least(&$variable, $bound)
    };
    ($variable:ident <= $bound:expr) => {
        $crate::predicates::PredicateConstructor::at_most(&$variable, $bound)
    };
    ($variable:ident == $value:expr) => {
        $crate::predicates::PredicateConstructor::equal_to(&$variable, $value)
    };
    ($variable:ident != $value:expr) => {
        $crate::predicates::PredicateConstructor::not_equal_to(&$variable, $value)
    };
}
