use std::time::Instant;

use log::debug;
use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::objective::Objective;
use super::objective::ObjectiveManager;
use super::predicates::Predicate;
use super::propagation_engine::PropagationEngine;
use super::solver_statistics::SolverStatistics;
use super::termination::TerminationCondition;
use super::VariableStore;
use crate::basic_types::Inconsistency;
use crate::basic_types::InvalidNarrowing;
use crate::basic_types::TrailMark;
use crate::branching::Brancher;
use crate::branching::SelectionContext;
use crate::gourd_assert_moderate;
use crate::model::ConstraintRecord;

/// The phases of the depth-first search of a worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SearchState {
    Propagating,
    Branching,
    Backtracking,
    SolutionFound,
    Exhausted,
}

/// How the search of a worker ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SearchOutcome {
    /// The whole tree was explored (under the objective bound, if any).
    Exhausted,
    /// A solution of a satisfaction model was found and enumeration is off.
    Satisfied,
    /// A termination condition or the observer stopped the search.
    Interrupted,
    /// A propagator widened a domain; the solve has to be aborted.
    Invalid(InvalidNarrowing),
}

/// Receives the solutions of a worker and shares information between workers.
pub(crate) trait SearchObserver {
    /// Called once per solution, when every variable of `store` is fixed. `objective_value` is
    /// the internal (minimised) objective value.
    fn on_solution(&mut self, store: &VariableStore, objective_value: Option<i64>);

    /// The best internal objective value found by any worker.
    fn shared_bound(&self) -> Option<i64> {
        None
    }

    /// Whether the search has been concluded elsewhere.
    fn should_stop(&self) -> bool {
        false
    }
}

/// A node on the decision stack: the trail mark before the decision was applied, and the
/// alternative still to try.
#[derive(Clone, Copy, Debug)]
struct ChoicePoint {
    mark: TrailMark,
    alternative: Option<Predicate>,
}

/// What a worker does besides searching.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct WorkerOptions {
    pub(crate) index: usize,
    pub(crate) random_seed: u64,
    pub(crate) enumerate_all_solutions: bool,
    pub(crate) log_search_progress: bool,
}

/// A single-threaded depth-first search over a private copy of the variable store.
#[derive(Debug)]
pub(crate) struct SearchWorker<'model, B> {
    store: VariableStore,
    engine: PropagationEngine<'model>,
    brancher: B,
    random: SmallRng,
    decisions: Vec<ChoicePoint>,
    objective: Option<ObjectiveManager>,
    /// The internal objective lower bound after the root propagation.
    root_bound: Option<i64>,
    options: WorkerOptions,
    statistics: SolverStatistics,
}

impl<'model, B: Brancher> SearchWorker<'model, B> {
    pub(crate) fn new(
        store: VariableStore,
        records: &'model [ConstraintRecord],
        objective: Option<&Objective>,
        brancher: B,
        options: WorkerOptions,
    ) -> Self {
        let engine = PropagationEngine::new(records, store.num_variables());
        let random =
            SmallRng::seed_from_u64(options.random_seed.wrapping_add(options.index as u64));

        SearchWorker {
            store,
            engine,
            brancher,
            random,
            decisions: Vec::new(),
            objective: objective.map(ObjectiveManager::new),
            root_bound: None,
            options,
            statistics: SolverStatistics::default(),
        }
    }

    pub(crate) fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    /// The objective value no solution can improve on, as proven by the root propagation.
    pub(crate) fn root_bound(&self) -> Option<i64> {
        self.root_bound
    }

    /// Searches until the tree is exhausted, a satisfaction model is solved, or the search is
    /// interrupted.
    pub(crate) fn search(
        &mut self,
        termination: &mut impl TerminationCondition,
        observer: &mut impl SearchObserver,
    ) -> SearchOutcome {
        let start = Instant::now();
        debug!("Worker {} starts searching", self.options.index);

        self.store.clear_trail();
        self.engine.enqueue_all();
        let outcome = self.run(termination, observer);

        self.statistics.time_spent_in_solver_ms =
            u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(
            "Worker {} stopped with {outcome:?} after {} decisions",
            self.options.index, self.statistics.num_decisions
        );
        outcome
    }

    fn run(
        &mut self,
        termination: &mut impl TerminationCondition,
        observer: &mut impl SearchObserver,
    ) -> SearchOutcome {
        let mut state = SearchState::Propagating;

        loop {
            state = match state {
                SearchState::Propagating => match self.propagate() {
                    Ok(next) => next,
                    Err(invalid) => return SearchOutcome::Invalid(invalid),
                },
                SearchState::Branching => {
                    if termination.should_stop() || observer.should_stop() {
                        return SearchOutcome::Interrupted;
                    }
                    if let Some(next) = self.import_shared_bound(observer) {
                        next
                    } else {
                        self.branch(termination)
                    }
                }
                SearchState::Backtracking => self.backtrack(),
                SearchState::SolutionFound => {
                    self.statistics.num_solutions += 1;
                    match self.record_solution(observer) {
                        Some(next) => next,
                        None => return SearchOutcome::Satisfied,
                    }
                }
                SearchState::Exhausted => return SearchOutcome::Exhausted,
            }
        }
    }

    fn propagate(&mut self) -> Result<SearchState, InvalidNarrowing> {
        let result = self
            .engine
            .propagate_to_fixpoint(&mut self.store, &mut self.statistics);

        if self.decisions.is_empty() && self.root_bound.is_none() && result.is_ok() {
            self.root_bound = self
                .objective
                .as_ref()
                .map(|objective| objective.lower_bound(&self.store));
        }

        match result {
            Ok(()) if self.store.all_fixed() => Ok(SearchState::SolutionFound),
            Ok(()) => Ok(SearchState::Branching),
            Err(Inconsistency::InvalidNarrowing(invalid)) => Err(invalid),
            Err(_) => {
                self.statistics.num_conflicts += 1;
                Ok(SearchState::Backtracking)
            }
        }
    }

    /// Installs a bound found by another worker if it improves on the own one.
    fn import_shared_bound(&mut self, observer: &impl SearchObserver) -> Option<SearchState> {
        let objective = self.objective.as_mut()?;
        let shared = observer.shared_bound()?;
        if objective.best().is_some_and(|best| best <= shared) {
            return None;
        }

        match objective.tighten(shared) {
            Some(record) => {
                self.engine.set_objective_bound(record);
                Some(SearchState::Propagating)
            }
            None => Some(SearchState::Exhausted),
        }
    }

    fn branch(&mut self, termination: &mut impl TerminationCondition) -> SearchState {
        let mut context = SelectionContext::new(&self.store, &mut self.random);
        let Some(decision) = self.brancher.next_decision(&mut context) else {
            gourd_assert_moderate!(self.store.all_fixed());
            return SearchState::SolutionFound;
        };

        termination.decision_has_been_made();
        self.statistics.num_decisions += 1;
        self.decisions.push(ChoicePoint {
            mark: self.store.snapshot(),
            alternative: Some(!decision),
        });
        self.statistics.peak_depth = self.statistics.peak_depth.max(self.decisions.len() as u64);

        match self.store.post_predicate(decision) {
            Ok(_) => SearchState::Propagating,
            Err(_) => {
                self.statistics.num_conflicts += 1;
                SearchState::Backtracking
            }
        }
    }

    /// Pops choice points until one with an untried alternative is found, and applies it.
    fn backtrack(&mut self) -> SearchState {
        while let Some(choice_point) = self.decisions.pop() {
            self.statistics.num_backtracks += 1;
            self.store.restore(choice_point.mark);
            self.engine.enqueue_objective_bound();

            let Some(alternative) = choice_point.alternative else {
                continue;
            };
            match self.store.post_predicate(alternative) {
                Ok(_) => return SearchState::Propagating,
                Err(_) => self.statistics.num_conflicts += 1,
            }
        }

        SearchState::Exhausted
    }

    /// Reports the solution and decides how to continue; [`None`] ends the search.
    fn record_solution(&mut self, observer: &mut impl SearchObserver) -> Option<SearchState> {
        let Some(objective) = self.objective.as_mut() else {
            if self.options.log_search_progress {
                info!(
                    "Worker {} found solution #{}",
                    self.options.index, self.statistics.num_solutions
                );
            }
            observer.on_solution(&self.store, None);
            return self
                .options
                .enumerate_all_solutions
                .then_some(SearchState::Backtracking);
        };

        let value = objective.evaluate(&self.store);
        if self.options.log_search_progress {
            info!(
                "Worker {} found a solution with objective {}",
                self.options.index,
                objective.user_value(value)
            );
        }
        observer.on_solution(&self.store, Some(value));

        let bound = observer.shared_bound().map_or(value, |shared| shared.min(value));
        match objective.tighten(bound) {
            Some(record) => {
                self.engine.set_objective_bound(record);
                Some(SearchState::Backtracking)
            }
            None => Some(SearchState::Exhausted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::branchers::IndependentVariableValueBrancher;
    use crate::branching::value_selection::InDomainMin;
    use crate::branching::variable_selection::InputOrder;
    use crate::engine::termination::decision_budget::DecisionBudget;
    use crate::engine::termination::indefinite::Indefinite;
    use crate::engine::variables::DomainId;
    use crate::engine::Domain;
    use crate::model::Constraint;
    use crate::model::LinearExpr;
    use crate::propagators::AllDifferent;
    use crate::propagators::LinearConstraint;

    /// Collects every reported assignment.
    #[derive(Debug, Default)]
    struct Collector {
        solutions: Vec<(Vec<i64>, Option<i64>)>,
    }

    impl SearchObserver for Collector {
        fn on_solution(&mut self, store: &VariableStore, objective_value: Option<i64>) {
            let values = store
                .variables()
                .map(|variable| store.lower_bound(variable))
                .collect();
            self.solutions.push((values, objective_value));
        }
    }

    fn store_with(num_variables: usize, lower_bound: i64, upper_bound: i64) -> VariableStore {
        let mut store = VariableStore::default();
        for _ in 0..num_variables {
            let _ = store.new_variable(Domain::new(lower_bound, upper_bound));
        }
        store
    }

    fn brancher(
        store: &VariableStore,
    ) -> IndependentVariableValueBrancher<DomainId, InputOrder<DomainId>, InDomainMin> {
        let variables = store.variables().collect::<Vec<_>>();
        IndependentVariableValueBrancher::new(InputOrder::new(&variables), InDomainMin)
    }

    fn all_different(store: &VariableStore) -> ConstraintRecord {
        ConstraintRecord::new(Constraint::AllDifferent(AllDifferent::new(
            store.variables().map(Into::into),
        )))
    }

    #[test]
    fn enumeration_visits_every_permutation_once() {
        let store = store_with(3, 0, 2);
        let records = [all_different(&store)];
        let options = WorkerOptions {
            enumerate_all_solutions: true,
            ..Default::default()
        };
        let mut worker = SearchWorker::new(store.clone(), &records, None, brancher(&store), options);
        let mut collector = Collector::default();

        let outcome = worker.search(&mut Indefinite, &mut collector);

        assert_eq!(SearchOutcome::Exhausted, outcome);
        let mut solutions = collector
            .solutions
            .into_iter()
            .map(|(values, _)| values)
            .collect::<Vec<_>>();
        solutions.sort();
        solutions.dedup();
        assert_eq!(6, solutions.len());
        assert_eq!(6, worker.statistics().num_solutions);
    }

    #[test]
    fn satisfaction_stops_at_the_first_solution() {
        let store = store_with(3, 0, 2);
        let records = [all_different(&store)];
        let mut worker = SearchWorker::new(
            store.clone(),
            &records,
            None,
            brancher(&store),
            WorkerOptions::default(),
        );
        let mut collector = Collector::default();

        let outcome = worker.search(&mut Indefinite, &mut collector);

        assert_eq!(SearchOutcome::Satisfied, outcome);
        assert_eq!(vec![(vec![0, 1, 2], None)], collector.solutions);
    }

    #[test]
    fn optimisation_reports_strictly_improving_solutions() {
        let store = store_with(2, 0, 3);
        let variables = store.variables().collect::<Vec<_>>();
        let records = [ConstraintRecord::new(Constraint::Linear(LinearConstraint::new(
            [(1, variables[0]), (1, variables[1])],
            Domain::new(2, i64::MAX),
        )))];
        // Maximise x - y subject to x + y >= 2.
        let objective = Objective::Maximize(LinearExpr::from(variables[0]) - variables[1]);
        let mut worker = SearchWorker::new(
            store.clone(),
            &records,
            Some(&objective),
            brancher(&store),
            WorkerOptions::default(),
        );
        let mut collector = Collector::default();

        let outcome = worker.search(&mut Indefinite, &mut collector);

        assert_eq!(SearchOutcome::Exhausted, outcome);
        let values = collector
            .solutions
            .iter()
            .filter_map(|(_, value)| *value)
            .collect::<Vec<_>>();
        assert!(values.windows(2).all(|pair| pair[1] < pair[0]));
        assert_eq!(Some(&(vec![3, 0], Some(-3))), collector.solutions.last());
    }

    #[test]
    fn infeasible_model_is_exhausted_without_solutions() {
        let store = store_with(4, 0, 2);
        let records = [all_different(&store)];
        let mut worker = SearchWorker::new(
            store.clone(),
            &records,
            None,
            brancher(&store),
            WorkerOptions::default(),
        );
        let mut collector = Collector::default();

        let outcome = worker.search(&mut Indefinite, &mut collector);

        assert_eq!(SearchOutcome::Exhausted, outcome);
        assert!(collector.solutions.is_empty());
    }

    #[test]
    fn decision_budget_interrupts_the_search() {
        let store = store_with(3, 0, 5);
        let records = [];
        let mut worker = SearchWorker::new(
            store.clone(),
            &records,
            None,
            brancher(&store),
            WorkerOptions::default(),
        );
        let mut collector = Collector::default();

        let outcome = worker.search(&mut DecisionBudget::new(1), &mut collector);

        assert_eq!(SearchOutcome::Interrupted, outcome);
        assert_eq!(1, worker.statistics().num_decisions);
    }
}
