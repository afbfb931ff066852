use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::IntervalVar;
use crate::engine::VariableStore;

/// The disjunctive constraint: no two present intervals overlap, i.e. for every pair either
/// `end_i <= start_j` or `end_j <= start_i`.
///
/// Propagation is pairwise. When only one order remains possible for two present intervals it is
/// enforced on their bounds; when neither order is possible one of them has to be absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoOverlap {
    intervals: Box<[IntervalVar]>,
}

/// Whether `first` may still finish before `second` starts.
pub(crate) fn can_precede(store: &VariableStore, first: &IntervalVar, second: &IntervalVar) -> bool {
    first.ect(store) <= second.lst(store)
}

/// Enforces `first.end <= second.start` on the bounds of two present intervals.
pub(crate) fn enforce_precedence(
    store: &mut VariableStore,
    first: &IntervalVar,
    second: &IntervalVar,
) -> PropagationStatusCP {
    let _ = second.set_earliest_start(store, first.ect(store))?;
    let _ = first.set_latest_completion(store, second.lst(store))?;
    Ok(())
}

/// Resolves a pair of intervals which cannot both be present.
pub(crate) fn exclude_one(
    store: &mut VariableStore,
    first: &IntervalVar,
    second: &IntervalVar,
) -> PropagationStatusCP {
    match (first.is_present(store), second.is_present(store)) {
        (true, true) => Err(Inconsistency::Conflict),
        (true, false) => second.set_absent(store).map(|_| ()),
        (false, true) => first.set_absent(store).map(|_| ()),
        (false, false) => Ok(()),
    }
}

impl NoOverlap {
    pub fn new(intervals: impl IntoIterator<Item = IntervalVar>) -> Self {
        NoOverlap {
            intervals: intervals.into_iter().collect(),
        }
    }

    pub fn intervals(&self) -> &[IntervalVar] {
        &self.intervals
    }

    pub(crate) fn variables(&self) -> Vec<DomainId> {
        let mut variables = Vec::new();
        for interval in self.intervals.iter() {
            interval.collect_variables(&mut variables);
        }
        variables
    }

    pub(crate) fn propagate(&self, store: &mut VariableStore) -> PropagationStatusCP {
        for (i, first) in self.intervals.iter().enumerate() {
            for second in self.intervals[i + 1..].iter() {
                if first.is_absent(store) || second.is_absent(store) {
                    continue;
                }

                let forward = can_precede(store, first, second);
                let backward = can_precede(store, second, first);

                match (forward, backward) {
                    (false, false) => exclude_one(store, first, second)?,
                    _ if !first.is_present(store) || !second.is_present(store) => {}
                    (true, false) => enforce_precedence(store, first, second)?,
                    (false, true) => enforce_precedence(store, second, first)?,
                    (true, true) => {}
                }
            }
        }

        Ok(())
    }

    pub(crate) fn is_satisfied(&self, value: &dyn Fn(DomainId) -> i64) -> bool {
        let present = self
            .intervals
            .iter()
            .filter(|interval| interval.evaluate_presence(value))
            .map(|interval| (interval.start.evaluate(value), interval.end.evaluate(value)))
            .collect::<Vec<_>>();

        present.iter().enumerate().all(|(i, &(start_i, end_i))| {
            present[i + 1..]
                .iter()
                .all(|&(start_j, end_j)| end_i <= start_j || end_j <= start_i)
        })
    }
}
