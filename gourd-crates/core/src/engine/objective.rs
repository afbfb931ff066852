use log::debug;

use super::variables::DomainId;
use super::Domain;
use super::VariableStore;
use crate::math::clamp_to_i64;
use crate::model::Constraint;
use crate::model::ConstraintRecord;
use crate::model::LinearExpr;
use crate::propagators::LinearConstraint;

/// The direction in which a model is optimised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Objective {
    Minimize(LinearExpr),
    Maximize(LinearExpr),
}

impl Objective {
    pub fn expression(&self) -> &LinearExpr {
        match self {
            Objective::Minimize(expression) | Objective::Maximize(expression) => expression,
        }
    }
}

/// Tracks the best objective value of a worker and the bound constraint derived from it.
///
/// Internally every objective is minimised: a maximisation negates the coefficients. Values in
/// this form ("internal values") exclude the offset of the expression; [`Self::user_value`] maps
/// them back.
#[derive(Clone, Debug)]
pub(crate) struct ObjectiveManager {
    terms: Box<[(i64, DomainId)]>,
    negated: bool,
    offset: i64,
    best: Option<i64>,
}

impl ObjectiveManager {
    pub(crate) fn new(objective: &Objective) -> Self {
        let negated = matches!(objective, Objective::Maximize(_));
        let expression = objective.expression();
        let terms = expression
            .terms()
            .iter()
            .map(|&(coefficient, variable)| {
                if negated {
                    (coefficient.saturating_neg(), variable)
                } else {
                    (coefficient, variable)
                }
            })
            .collect();

        ObjectiveManager {
            terms,
            negated,
            offset: expression.offset(),
            best: None,
        }
    }

    /// The internal value under the current, fixed, domains.
    pub(crate) fn evaluate(&self, store: &VariableStore) -> i64 {
        clamp_to_i64(
            self.terms
                .iter()
                .map(|&(coefficient, variable)| {
                    i128::from(coefficient) * i128::from(store.lower_bound(variable))
                })
                .sum(),
        )
    }

    /// The smallest internal value the current domains allow, judged by bounds.
    pub(crate) fn lower_bound(&self, store: &VariableStore) -> i64 {
        clamp_to_i64(
            self.terms
                .iter()
                .map(|&(coefficient, variable)| {
                    let bound = if coefficient >= 0 {
                        store.lower_bound(variable)
                    } else {
                        store.upper_bound(variable)
                    };
                    i128::from(coefficient) * i128::from(bound)
                })
                .sum(),
        )
    }

    /// Maps an internal value to the value of the objective expression.
    pub(crate) fn user_value(&self, internal: i64) -> i64 {
        let value = if self.negated {
            -i128::from(internal)
        } else {
            i128::from(internal)
        };
        clamp_to_i64(value + i128::from(self.offset))
    }

    pub(crate) fn best(&self) -> Option<i64> {
        self.best
    }

    /// Records `value` as the best known internal value and returns the bound constraint
    /// excluding every solution which is not strictly better. [`None`] means nothing better
    /// exists.
    pub(crate) fn tighten(&mut self, value: i64) -> Option<ConstraintRecord> {
        if self.best.is_some_and(|best| best <= value) {
            return self.bound_record();
        }

        debug!("Tightening the objective bound to below {}", self.user_value(value));
        self.best = Some(value);
        self.bound_record()
    }

    /// The record `Σ c_i * x_i <= best - 1`.
    fn bound_record(&self) -> Option<ConstraintRecord> {
        let upper_bound = self.best?.checked_sub(1)?;

        Some(ConstraintRecord::new(Constraint::Linear(LinearConstraint::new(
            self.terms.iter().copied(),
            Domain::new(i64::MIN, upper_bound),
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_helper::TestStore;

    #[test]
    fn maximisation_is_minimisation_of_the_negation() {
        let mut store = TestStore::default();
        let x = store.new_variable(0, 10);
        let manager = ObjectiveManager::new(&Objective::Maximize(LinearExpr::from(x) * 2 + 1));

        let _ = store.fix(x, 3).unwrap();

        assert_eq!(-6, manager.evaluate(&store));
        assert_eq!(7, manager.user_value(-6));
    }

    #[test]
    fn tightening_excludes_values_that_are_not_better() {
        let mut store = TestStore::default();
        let x = store.new_variable(0, 10);
        let mut manager = ObjectiveManager::new(&Objective::Minimize(LinearExpr::from(x)));

        let record = manager.tighten(4).expect("better values exist");
        let _ = record.propagate(&mut store).unwrap();

        assert_eq!(3, store.upper_bound(x));
        assert_eq!(Some(4), manager.best());
    }

    #[test]
    fn worse_values_keep_the_best_bound() {
        let mut manager = ObjectiveManager::new(&Objective::Minimize(LinearExpr::from(
            DomainId::new(0),
        )));

        let _ = manager.tighten(2);
        let _ = manager.tighten(5);

        assert_eq!(Some(2), manager.best());
    }

    #[test]
    fn nothing_is_better_than_the_minimum_value() {
        let mut manager = ObjectiveManager::new(&Objective::Minimize(LinearExpr::from(
            DomainId::new(0),
        )));

        assert!(manager.tighten(i64::MIN).is_none());
    }

    #[test]
    fn lower_bound_uses_the_favourable_bound_of_each_term() {
        let mut store = TestStore::default();
        let x = store.new_variable(1, 4);
        let y = store.new_variable(2, 5);
        let manager = ObjectiveManager::new(&Objective::Minimize(LinearExpr::from(x) - y));

        assert_eq!(-4, manager.lower_bound(&store));
    }
}
