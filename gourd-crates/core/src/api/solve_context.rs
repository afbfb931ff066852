use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Instant;

use super::SolutionView;
use crate::engine::search::SearchObserver;
use crate::engine::termination::stop_flag::StopFlag;
use crate::engine::Objective;
use crate::engine::ObjectiveManager;
use crate::engine::VariableStore;

/// The callback of a solve; invoked under the incumbent lock.
pub(crate) type SolutionCallback<'a> = dyn FnMut(&SolutionView<'_>) + Send + 'a;

/// The best solution reported so far.
#[derive(Debug, Default)]
pub(crate) struct Incumbent {
    pub(crate) values: Option<Vec<i64>>,
    /// The internal objective value of `values`.
    pub(crate) objective_value: Option<i64>,
    pub(crate) num_solutions: u64,
}

struct SharedState<'a> {
    incumbent: Incumbent,
    callback: &'a mut SolutionCallback<'a>,
}

/// Everything the workers of one solve share: the incumbent and callback behind a mutex, the
/// best internal objective value as an atomic, and a flag raised once a worker has concluded the
/// search.
pub(crate) struct SolveContext<'a> {
    started_at: Instant,
    objective: Option<ObjectiveManager>,
    /// `i64::MAX` while no solution has been found.
    best_bound: AtomicI64,
    shared: Mutex<SharedState<'a>>,
    finished: StopFlag,
}

impl<'a> SolveContext<'a> {
    pub(crate) fn new(
        objective: Option<&Objective>,
        started_at: Instant,
        callback: &'a mut SolutionCallback<'a>,
    ) -> Self {
        SolveContext {
            started_at,
            objective: objective.map(ObjectiveManager::new),
            best_bound: AtomicI64::new(i64::MAX),
            shared: Mutex::new(SharedState {
                incumbent: Incumbent::default(),
                callback,
            }),
            finished: StopFlag::new(),
        }
    }

    pub(crate) fn objective(&self) -> Option<&ObjectiveManager> {
        self.objective.as_ref()
    }

    /// Records the solution held by `store` and reports it to the callback, unless it does not
    /// improve on the incumbent.
    pub(crate) fn report_solution(&self, store: &VariableStore, objective_value: Option<i64>) {
        let values = store
            .variables()
            .map(|variable| store.lower_bound(variable))
            .collect::<Vec<_>>();

        let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        if let (Some(value), Some(best)) = (objective_value, shared.incumbent.objective_value) {
            if best <= value {
                return;
            }
        }
        if let Some(value) = objective_value {
            let _ = self.best_bound.fetch_min(value, Ordering::SeqCst);
        }

        let user_value = self
            .objective
            .as_ref()
            .zip(objective_value)
            .map(|(objective, value)| objective.user_value(value));
        let view = SolutionView::new(
            &values,
            user_value,
            shared.incumbent.num_solutions,
            self.started_at.elapsed(),
        );
        (shared.callback)(&view);

        shared.incumbent.num_solutions += 1;
        shared.incumbent.values = Some(values);
        shared.incumbent.objective_value = objective_value;
    }

    /// The best internal objective value any worker has found.
    pub(crate) fn shared_bound(&self) -> Option<i64> {
        match self.best_bound.load(Ordering::SeqCst) {
            i64::MAX => None,
            bound => Some(bound),
        }
    }

    /// Signals the other workers that the search is over.
    pub(crate) fn finish(&self) {
        self.finished.raise();
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished.is_raised()
    }

    pub(crate) fn into_incumbent(self) -> Incumbent {
        self.shared
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .incumbent
    }
}

/// Connects a search worker to the [`SolveContext`].
#[derive(Clone, Copy)]
pub(crate) struct WorkerObserver<'context, 'a> {
    context: &'context SolveContext<'a>,
}

impl<'context, 'a> WorkerObserver<'context, 'a> {
    pub(crate) fn new(context: &'context SolveContext<'a>) -> Self {
        WorkerObserver { context }
    }
}

impl SearchObserver for WorkerObserver<'_, '_> {
    fn on_solution(&mut self, store: &VariableStore, objective_value: Option<i64>) {
        self.context.report_solution(store, objective_value);
    }

    fn shared_bound(&self) -> Option<i64> {
        self.context.shared_bound()
    }

    fn should_stop(&self) -> bool {
        self.context.is_finished()
    }
}
