use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::AffineView;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::VariableStore;

/// The constraint `target == max(expressions)`. A minimum is expressed over negated views.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maximum {
    target: AffineView,
    expressions: Box<[AffineView]>,
}

impl Maximum {
    pub fn new(target: AffineView, expressions: impl IntoIterator<Item = AffineView>) -> Self {
        Maximum {
            target,
            expressions: expressions.into_iter().collect(),
        }
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = DomainId> + '_ {
        std::iter::once(&self.target)
            .chain(self.expressions.iter())
            .filter_map(IntegerVariable::domain_id)
    }

    pub(crate) fn propagate(&self, store: &mut VariableStore) -> PropagationStatusCP {
        let lower_bound = self
            .expressions
            .iter()
            .map(|expression| expression.lower_bound(store))
            .max()
            .ok_or(Inconsistency::Conflict)?;
        let upper_bound = self
            .expressions
            .iter()
            .map(|expression| expression.upper_bound(store))
            .max()
            .ok_or(Inconsistency::Conflict)?;

        let _ = self.target.set_lower_bound(store, lower_bound)?;
        let _ = self.target.set_upper_bound(store, upper_bound)?;

        let target_upper_bound = self.target.upper_bound(store);
        for expression in self.expressions.iter() {
            let _ = expression.set_upper_bound(store, target_upper_bound)?;
        }

        // If a single expression can reach the target, it has to.
        let target_lower_bound = self.target.lower_bound(store);
        let mut candidates = self
            .expressions
            .iter()
            .filter(|expression| expression.upper_bound(store) >= target_lower_bound)
            .copied();
        let first = candidates.next();
        let second = candidates.next();
        match (first, second) {
            (None, _) => return Err(Inconsistency::Conflict),
            (Some(expression), None) => {
                let _ = expression.set_lower_bound(store, target_lower_bound)?;
            }
            _ => {}
        }

        Ok(())
    }

    pub(crate) fn is_satisfied(&self, value: &dyn Fn(DomainId) -> i64) -> bool {
        self.expressions
            .iter()
            .map(|expression| expression.evaluate(value))
            .max()
            .is_some_and(|maximum| maximum == self.target.evaluate(value))
    }
}
