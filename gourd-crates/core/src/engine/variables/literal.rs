use std::ops::Not;

use super::DomainId;
use crate::basic_types::Inconsistency;
use crate::engine::VariableStore;
use crate::predicate;

/// A 0-1 variable or its negation. The literal is true when its variable takes the value `1` and
/// the polarity is positive, or the value `0` and the polarity is negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    variable: DomainId,
    polarity: bool,
}

impl Literal {
    /// The positive literal of `variable`, which must have a domain within `{0, 1}`.
    pub fn new(variable: DomainId) -> Literal {
        Literal {
            variable,
            polarity: true,
        }
    }

    pub fn variable(&self) -> DomainId {
        self.variable
    }

    pub fn is_positive(&self) -> bool {
        self.polarity
    }

    /// The value the underlying variable takes when this literal is true.
    pub(crate) fn true_value(&self) -> i64 {
        i64::from(self.polarity)
    }

    /// The truth value of the literal, if its variable is fixed.
    pub fn value(&self, store: &VariableStore) -> Option<bool> {
        store
            .fixed_value(self.variable)
            .map(|value| (value == 1) == self.polarity)
    }

    pub fn is_true(&self, store: &VariableStore) -> bool {
        self.value(store) == Some(true)
    }

    pub fn is_false(&self, store: &VariableStore) -> bool {
        self.value(store) == Some(false)
    }

    /// The truth value of the literal under a complete assignment.
    pub fn evaluate(&self, value: &dyn Fn(DomainId) -> i64) -> bool {
        value(self.variable) == self.true_value()
    }

    pub(crate) fn set_true(&self, store: &mut VariableStore) -> Result<bool, Inconsistency> {
        let variable = self.variable;
        store.post_predicate(predicate![variable == self.true_value()])
    }

    pub(crate) fn set_false(&self, store: &mut VariableStore) -> Result<bool, Inconsistency> {
        (!*self).set_true(store)
    }
}

impl Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            variable: self.variable,
            polarity: !self.polarity,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.polarity {
            write!(f, "{}", self.variable)
        } else {
            write!(f, "~{}", self.variable)
        }
    }
}
