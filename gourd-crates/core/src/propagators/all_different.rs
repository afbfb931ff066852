use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::containers::HashSet;
use crate::engine::variables::AffineView;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::VariableStore;

/// The constraint that all expressions take pairwise different values.
///
/// Propagation removes the value of every fixed expression from the others, and then looks for
/// Hall intervals over the bounds: a range `[a, b]` which contains the bounds of exactly
/// `b - a + 1` expressions cannot be used by any other expression. The Hall interval pass is the
/// naive quadratic one; bound consistency is not guaranteed after a single call, but the engine
/// calls the propagator until it no longer narrows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllDifferent {
    expressions: Box<[AffineView]>,
}

impl AllDifferent {
    pub fn new(expressions: impl IntoIterator<Item = AffineView>) -> Self {
        AllDifferent {
            expressions: expressions.into_iter().collect(),
        }
    }

    pub fn expressions(&self) -> &[AffineView] {
        &self.expressions
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = DomainId> + '_ {
        self.expressions.iter().filter_map(IntegerVariable::domain_id)
    }

    pub(crate) fn propagate(&self, store: &mut VariableStore) -> PropagationStatusCP {
        self.eliminate_fixed_values(store)?;
        self.propagate_hall_intervals(store)
    }

    fn eliminate_fixed_values(&self, store: &mut VariableStore) -> PropagationStatusCP {
        for (i, expression) in self.expressions.iter().enumerate() {
            let Some(value) = expression.fixed_value(store) else {
                continue;
            };

            for (j, other) in self.expressions.iter().enumerate() {
                if i != j {
                    let _ = other.remove_value(store, value)?;
                }
            }
        }

        Ok(())
    }

    /// Narrows the bounds of every expression which is not inside a Hall interval. The bounds
    /// are read once; Hall intervals found on them stay valid while domains shrink.
    fn propagate_hall_intervals(&self, store: &mut VariableStore) -> PropagationStatusCP {
        let bounds = self
            .expressions
            .iter()
            .map(|expression| (expression.lower_bound(store), expression.upper_bound(store)))
            .collect::<Vec<_>>();

        let mut lower_bounds = bounds.iter().map(|&(lower, _)| lower).collect::<Vec<_>>();
        lower_bounds.sort_unstable();
        lower_bounds.dedup();

        for &start in lower_bounds.iter() {
            let mut upper_bounds = bounds
                .iter()
                .filter(|&&(lower, _)| lower >= start)
                .map(|&(_, upper)| upper)
                .collect::<Vec<_>>();
            upper_bounds.sort_unstable();

            for (index, &end) in upper_bounds.iter().enumerate() {
                let count = index as i128 + 1;
                let width = i128::from(end) - i128::from(start) + 1;

                if count > width {
                    return Err(Inconsistency::Conflict);
                }

                let is_last_with_this_end = upper_bounds.get(index + 1) != Some(&end);
                if count == width && is_last_with_this_end {
                    self.exclude_interval(store, &bounds, start, end)?;
                }
            }
        }

        Ok(())
    }

    fn exclude_interval(
        &self,
        store: &mut VariableStore,
        bounds: &[(i64, i64)],
        start: i64,
        end: i64,
    ) -> PropagationStatusCP {
        for (expression, &(lower, upper)) in self.expressions.iter().zip(bounds) {
            let inside = start <= lower && upper <= end;
            if inside {
                continue;
            }

            if (start..=end).contains(&lower) {
                let _ = expression.set_lower_bound(store, end.saturating_add(1))?;
            }
            if (start..=end).contains(&upper) {
                let _ = expression.set_upper_bound(store, start.saturating_sub(1))?;
            }
        }

        Ok(())
    }

    pub(crate) fn is_satisfied(&self, value: &dyn Fn(DomainId) -> i64) -> bool {
        let mut seen: HashSet<i64> = HashSet::default();
        self.expressions
            .iter()
            .all(|expression| seen.insert(expression.evaluate(value)))
    }
}
