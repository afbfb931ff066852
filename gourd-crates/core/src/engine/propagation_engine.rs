use enumset::EnumSet;
use log::error;

use super::domain_events::DomainEvent;
use super::propagator_id::PropagatorId;
use super::propagator_queue::PropagatorQueue;
use super::solver_statistics::SolverStatistics;
use super::variables::DomainId;
use super::VariableStore;
use crate::basic_types::Inconsistency;
use crate::basic_types::Narrowing;
use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::model::ConstraintRecord;
use crate::propagators::Priority;

/// The priority of a propagator; the objective bound is a cheap linear constraint.
fn priority_of(records: &[ConstraintRecord], propagator_id: PropagatorId) -> Priority {
    records
        .get(propagator_id.index())
        .map_or(Priority::High, |record| record.constraint.priority())
}

/// Drives the constraint records of a model, plus the objective bound, to a common fixpoint.
///
/// Every variable has a watch list of the propagators reading it together with the domain events
/// each propagator reacts to. Narrowing a variable enqueues its watchers, except the propagator
/// which performed the narrowing since records already run to their own fixpoint.
#[derive(Debug)]
pub(crate) struct PropagationEngine<'model> {
    records: &'model [ConstraintRecord],
    /// The bound on the objective, the propagator with id `records.len()`.
    objective_bound: Option<ConstraintRecord>,
    watch_lists: KeyedVec<DomainId, Vec<(PropagatorId, EnumSet<DomainEvent>)>>,
    queue: PropagatorQueue,
}

impl<'model> PropagationEngine<'model> {
    pub(crate) fn new(records: &'model [ConstraintRecord], num_variables: usize) -> Self {
        let mut engine = PropagationEngine {
            records,
            objective_bound: None,
            watch_lists: KeyedVec::default(),
            queue: PropagatorQueue::default(),
        };
        if num_variables > 0 {
            engine
                .watch_lists
                .accommodate(DomainId::create_from_index(num_variables - 1), Vec::new());
        }

        for (index, record) in records.iter().enumerate() {
            engine.watch(PropagatorId::create_from_index(index), record);
        }

        engine
    }

    fn objective_bound_id(&self) -> PropagatorId {
        PropagatorId::create_from_index(self.records.len())
    }

    fn watch(&mut self, propagator_id: PropagatorId, record: &ConstraintRecord) {
        let mut watched: HashMap<DomainId, EnumSet<DomainEvent>> = HashMap::default();
        for variable in record.constraint.variables() {
            watched
                .entry(variable)
                .or_default()
                .insert_all(record.constraint.events());
        }
        for literal in record.enforcement.iter() {
            let _ = watched
                .entry(literal.variable())
                .or_default()
                .insert(DomainEvent::Assign);
        }

        for (variable, events) in watched {
            self.watch_lists.accommodate(variable, Vec::new());
            self.watch_lists[variable].push((propagator_id, events));
        }
    }

    /// Enqueues every propagator, as is needed before the first fixpoint of a search.
    pub(crate) fn enqueue_all(&mut self) {
        let num_propagators = self.records.len() + usize::from(self.objective_bound.is_some());
        for index in 0..num_propagators {
            let propagator_id = PropagatorId::create_from_index(index);
            let priority = priority_of(self.records, propagator_id);
            self.queue.enqueue_propagator(propagator_id, priority);
        }
    }

    /// Replaces the objective bound; the first bound installs the watches of its variables.
    pub(crate) fn set_objective_bound(&mut self, record: ConstraintRecord) {
        let propagator_id = self.objective_bound_id();
        if self.objective_bound.is_none() {
            self.watch(propagator_id, &record);
        }
        self.objective_bound = Some(record);
        self.enqueue_objective_bound();
    }

    /// The bound is not undone by backtracking, so it has to run again after a restore.
    pub(crate) fn enqueue_objective_bound(&mut self) {
        if self.objective_bound.is_some() {
            let propagator_id = self.objective_bound_id();
            self.queue.enqueue_propagator(propagator_id, Priority::High);
        }
    }

    /// Enqueues the watchers of every variable narrowed since the events were last drained.
    fn enqueue_watchers(&mut self, store: &mut VariableStore, skip: Option<PropagatorId>) {
        for (variable, events) in store.drain_events() {
            let Some(watchers) = self.watch_lists.get(variable) else {
                continue;
            };
            for &(propagator_id, watched) in watchers {
                if Some(propagator_id) != skip && !watched.is_disjoint(events) {
                    let priority = priority_of(self.records, propagator_id);
                    self.queue.enqueue_propagator(propagator_id, priority);
                }
            }
        }
    }

    fn run(
        &self,
        propagator_id: PropagatorId,
        store: &mut VariableStore,
    ) -> Result<Narrowing, Inconsistency> {
        match self.records.get(propagator_id.index()) {
            Some(record) => record.propagate(store),
            None => self
                .objective_bound
                .as_ref()
                .map_or(Ok(Narrowing::Unchanged), |record| record.propagate(store)),
        }
    }

    /// Runs the enqueued propagators, and those woken up by their narrowings, until the queue is
    /// empty or a propagator fails. On failure the queue is cleared.
    pub(crate) fn propagate_to_fixpoint(
        &mut self,
        store: &mut VariableStore,
        statistics: &mut SolverStatistics,
    ) -> Result<(), Inconsistency> {
        self.enqueue_watchers(store, None);

        while let Some(propagator_id) = self.queue.pop() {
            statistics.num_propagations += 1;

            match self.run(propagator_id, store) {
                Ok(Narrowing::Narrowed) => self.enqueue_watchers(store, Some(propagator_id)),
                Ok(Narrowing::Unchanged) => {}
                Err(inconsistency) => {
                    if let Inconsistency::InvalidNarrowing(invalid) = inconsistency {
                        error!("{propagator_id} widened a domain: {invalid}");
                    }
                    self.queue.clear();
                    let _ = store.drain_events();
                    return Err(inconsistency);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Domain;
    use crate::model::Constraint;
    use crate::propagators::LinearConstraint;

    /// The record `left < right`.
    fn less_than(left: DomainId, right: DomainId) -> ConstraintRecord {
        ConstraintRecord::new(Constraint::Linear(LinearConstraint::new(
            [(1, left), (-1, right)],
            Domain::new(i64::MIN, -1),
        )))
    }

    #[test]
    fn chain_of_inequalities_reaches_a_common_fixpoint() {
        let mut store = VariableStore::default();
        let x = store.new_variable(Domain::new(0, 2));
        let y = store.new_variable(Domain::new(0, 2));
        let z = store.new_variable(Domain::new(0, 2));
        let records = [less_than(y, z), less_than(x, y)];

        let mut engine = PropagationEngine::new(&records, store.num_variables());
        engine.enqueue_all();
        engine
            .propagate_to_fixpoint(&mut store, &mut SolverStatistics::default())
            .expect("feasible");

        assert_eq!(Some(0), store.fixed_value(x));
        assert_eq!(Some(1), store.fixed_value(y));
        assert_eq!(Some(2), store.fixed_value(z));
    }

    #[test]
    fn cycle_of_inequalities_conflicts_and_empties_the_queue() {
        let mut store = VariableStore::default();
        let x = store.new_variable(Domain::new(0, 5));
        let y = store.new_variable(Domain::new(0, 5));
        let z = store.new_variable(Domain::new(0, 5));
        let records = [less_than(x, y), less_than(y, z), less_than(z, x)];

        let mut engine = PropagationEngine::new(&records, store.num_variables());
        engine.enqueue_all();
        let result = engine.propagate_to_fixpoint(&mut store, &mut SolverStatistics::default());

        assert!(result.is_err_and(|inconsistency| inconsistency.is_conflict()));
        assert!(engine.queue.is_empty());
    }

    #[test]
    fn narrowing_from_outside_wakes_watchers() {
        let mut store = VariableStore::default();
        let x = store.new_variable(Domain::new(0, 5));
        let y = store.new_variable(Domain::new(0, 5));
        let records = [less_than(x, y)];

        let mut engine = PropagationEngine::new(&records, store.num_variables());
        let mut statistics = SolverStatistics::default();
        engine.enqueue_all();
        engine
            .propagate_to_fixpoint(&mut store, &mut statistics)
            .expect("feasible");
        let _ = store.tighten_lower_bound(x, 3).expect("non-empty");
        engine
            .propagate_to_fixpoint(&mut store, &mut statistics)
            .expect("feasible");

        assert_eq!(4, store.lower_bound(y));
    }

    #[test]
    fn objective_bound_participates_in_propagation() {
        let mut store = VariableStore::default();
        let x = store.new_variable(Domain::new(0, 5));
        let y = store.new_variable(Domain::new(0, 5));
        let records = [less_than(x, y)];

        let mut engine = PropagationEngine::new(&records, store.num_variables());
        engine.set_objective_bound(ConstraintRecord::new(Constraint::Linear(
            LinearConstraint::new([(1, y)], Domain::new(i64::MIN, 2)),
        )));
        engine.enqueue_all();
        engine
            .propagate_to_fixpoint(&mut store, &mut SolverStatistics::default())
            .expect("feasible");

        assert_eq!(2, store.upper_bound(y));
        assert_eq!(1, store.upper_bound(x));
    }
}
