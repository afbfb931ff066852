use std::thread;
use std::time::Instant;

use log::debug;
use log::info;
use log::warn;

use super::parameters::create_brancher;
use super::solve_context::SolveContext;
use super::solve_context::WorkerObserver;
use super::SolutionView;
use super::SolveResponse;
use super::SolverParameters;
use super::SolverStatus;
use crate::basic_types::InvalidNarrowing;
use crate::engine::search::SearchOutcome;
use crate::engine::search::SearchWorker;
use crate::engine::search::WorkerOptions;
use crate::engine::termination::combinator::Combinator;
use crate::engine::termination::decision_budget::DecisionBudget;
use crate::engine::termination::stop_flag::StopFlag;
use crate::engine::termination::time_budget::TimeBudget;
use crate::engine::SolverStatistics;
use crate::model::Model;

/// What a worker sends to the driver when its search ends.
#[derive(Debug, Clone, Copy)]
struct WorkerReport {
    index: usize,
    outcome: SearchOutcome,
    statistics: SolverStatistics,
    /// The internal objective bound after root propagation.
    root_bound: Option<i64>,
}

/// Solves [`Model`]s, either with a single depth-first search or with a portfolio of workers
/// using different strategies.
///
/// ```
/// # use gourd_core::api::CpSolver;
/// # use gourd_core::api::SolverParameters;
/// # use gourd_core::api::SolverStatus;
/// # use gourd_core::model::LinearExpr;
/// # use gourd_core::model::Model;
/// let mut model = Model::default();
/// let x = model.new_int_var(0, 10, "x");
/// let y = model.new_int_var(0, 10, "y");
/// let _ = model.add_linear(LinearExpr::from(x) + y, 0, 12);
/// let _ = model.add_less_than(y, x);
/// model.maximize(LinearExpr::from(x) * 2 + y);
///
/// let response = CpSolver::new().solve(&model, &SolverParameters::default());
///
/// assert_eq!(SolverStatus::Optimal, response.status());
/// assert_eq!(Some(22), response.objective_value());
/// assert_eq!(Some(10), response.value(x));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CpSolver {
    stop_flag: StopFlag,
}

impl CpSolver {
    pub fn new() -> Self {
        CpSolver::default()
    }

    /// The cancellation flag of this solver. Raising it makes every worker stop before its next
    /// decision; the flag stays raised for later solves.
    pub fn stop_handle(&self) -> StopFlag {
        self.stop_flag.clone()
    }

    pub fn solve(&self, model: &Model, parameters: &SolverParameters) -> SolveResponse {
        self.solve_with_callback(model, parameters, |_| {})
    }

    /// Solves `model`, invoking `callback` once for every reported solution. Calls are
    /// serialised across workers; when optimising only strictly improving solutions are reported.
    pub fn solve_with_callback(
        &self,
        model: &Model,
        parameters: &SolverParameters,
        mut callback: impl FnMut(&SolutionView<'_>) + Send,
    ) -> SolveResponse {
        let started_at = Instant::now();

        if let Err(error) = model.validate() {
            warn!("The model is invalid: {error}");
            return SolveResponse::model_invalid(Some(error), started_at.elapsed());
        }

        let num_workers = parameters.effective_num_workers();
        if parameters.enumerate_all_solutions && parameters.num_workers > 1 {
            warn!(
                "Enumerating all solutions uses a single worker instead of {}",
                parameters.num_workers
            );
        }

        let context = SolveContext::new(model.objective(), started_at, &mut callback);
        let reports = if num_workers == 1 {
            vec![self.run_worker(model, parameters, &context, 0, started_at)]
        } else {
            self.run_portfolio(model, parameters, &context, num_workers, started_at)
        };

        let response = conclude(context, &reports, started_at);
        if parameters.log_search_progress {
            info!(
                "Search finished with status {} after {} ms",
                response.status,
                response.wall_time.as_millis()
            );
        }
        response
    }

    /// Runs one worker per thread and collects their reports over a channel.
    fn run_portfolio(
        &self,
        model: &Model,
        parameters: &SolverParameters,
        context: &SolveContext<'_>,
        num_workers: usize,
        started_at: Instant,
    ) -> Vec<WorkerReport> {
        let (sender, receiver) = crossbeam_channel::unbounded();

        thread::scope(|scope| {
            for index in 0..num_workers {
                let sender = sender.clone();
                let _ = scope.spawn(move || {
                    let report = self.run_worker(model, parameters, context, index, started_at);
                    // The driver keeps the receiver until every worker has reported.
                    let _ = sender.send(report);
                });
            }
            drop(sender);

            receiver
                .iter()
                .inspect(|report| debug!("Worker {} reported {:?}", report.index, report.outcome))
                .collect()
        })
    }

    fn run_worker(
        &self,
        model: &Model,
        parameters: &SolverParameters,
        context: &SolveContext<'_>,
        index: usize,
        started_at: Instant,
    ) -> WorkerReport {
        let variables = model.variables().collect::<Vec<_>>();
        let (variable_selection, value_selection) = parameters.strategy_of_worker(index);
        let brancher = create_brancher(&variables, variable_selection, value_selection);

        let options = WorkerOptions {
            index,
            random_seed: parameters.random_seed,
            enumerate_all_solutions: parameters.enumerate_all_solutions,
            log_search_progress: parameters.log_search_progress,
        };
        let mut worker = SearchWorker::new(
            model.initial_store(),
            model.constraints(),
            model.objective(),
            brancher,
            options,
        );

        let mut termination = Combinator::new(
            Combinator::new(
                parameters
                    .time_limit
                    .map(|time_limit| TimeBudget::starting_at(started_at, time_limit)),
                parameters.decision_limit.map(DecisionBudget::new),
            ),
            self.stop_flag.clone(),
        );
        let outcome = worker.search(&mut termination, &mut WorkerObserver::new(context));
        if outcome != SearchOutcome::Interrupted {
            context.finish();
        }

        WorkerReport {
            index,
            outcome,
            statistics: *worker.statistics(),
            root_bound: worker.root_bound(),
        }
    }
}

/// Combines the worker reports and the incumbent into the response.
fn conclude(
    context: SolveContext<'_>,
    reports: &[WorkerReport],
    started_at: Instant,
) -> SolveResponse {
    let mut statistics = SolverStatistics::default();
    for report in reports {
        statistics.merge(&report.statistics);
    }

    let invalid: Option<InvalidNarrowing> = reports.iter().find_map(|report| match report.outcome {
        SearchOutcome::Invalid(invalid) => Some(invalid),
        _ => None,
    });
    let concluded = reports.iter().any(|report| {
        matches!(
            report.outcome,
            SearchOutcome::Exhausted | SearchOutcome::Satisfied
        )
    });

    let objective = context.objective().cloned();
    let incumbent = context.into_incumbent();
    let has_solution = incumbent.values.is_some();

    let status = match (invalid, concluded, has_solution) {
        (Some(invalid), _, _) => {
            warn!("Aborting: {invalid}");
            SolverStatus::ModelInvalid
        }
        (None, true, true) => SolverStatus::Optimal,
        (None, true, false) => SolverStatus::Infeasible,
        (None, false, true) => SolverStatus::Feasible,
        (None, false, false) => SolverStatus::Unknown,
    };

    let objective_value = objective
        .as_ref()
        .zip(incumbent.objective_value)
        .map(|(objective, value)| objective.user_value(value));
    let best_objective_bound = match status {
        SolverStatus::Optimal => objective_value,
        SolverStatus::Feasible | SolverStatus::Unknown => objective.as_ref().and_then(|objective| {
            reports
                .iter()
                .filter_map(|report| report.root_bound)
                .min()
                .map(|bound| objective.user_value(bound))
        }),
        SolverStatus::Infeasible | SolverStatus::ModelInvalid => None,
    };

    SolveResponse {
        status,
        objective_value,
        best_objective_bound,
        solution: if status == SolverStatus::ModelInvalid {
            None
        } else {
            incumbent.values
        },
        num_solutions: incumbent.num_solutions,
        statistics,
        wall_time: started_at.elapsed(),
        model_error: None,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::engine::variables::AffineView;
    use crate::model::LinearExpr;

    fn queens(n: i64) -> Model {
        let mut model = Model::default();
        let queens = (0..n)
            .map(|row| model.new_int_var(0, n - 1, &format!("q{row}")))
            .collect::<Vec<_>>();
        let _ = model.add_all_different(queens.iter().copied());
        let _ = model.add_all_different(
            queens
                .iter()
                .zip(0..)
                .map(|(&queen, row)| AffineView::new(queen, 1, row)),
        );
        let _ = model.add_all_different(
            queens
                .iter()
                .zip(0..)
                .map(|(&queen, row)| AffineView::new(queen, 1, -row)),
        );
        model
    }

    #[test]
    fn enumeration_reports_every_solution() {
        let model = queens(4);
        let mut count = 0;

        let response = CpSolver::new().solve_with_callback(
            &model,
            &SolverParameters::default().with_enumerate_all_solutions(true),
            |_| count += 1,
        );

        assert_eq!(SolverStatus::Optimal, response.status());
        assert_eq!(2, count);
        assert_eq!(2, response.num_solutions());
    }

    #[test]
    fn invalid_models_are_not_searched() {
        let mut model = Model::default();
        let _ = model.new_int_var(1, 0, "empty");

        let response = CpSolver::new().solve(&model, &SolverParameters::default());

        assert_eq!(SolverStatus::ModelInvalid, response.status());
        assert!(response.model_error().is_some());
        assert!(response.solution().is_none());
    }

    #[test]
    fn raised_stop_flag_yields_unknown() {
        let model = queens(6);
        let solver = CpSolver::new();
        solver.stop_handle().raise();

        let response = solver.solve(&model, &SolverParameters::default());

        assert_eq!(SolverStatus::Unknown, response.status());
        assert_eq!(0, response.statistics().num_decisions);
    }

    #[test]
    fn portfolio_proves_the_same_optimum() {
        let mut model = Model::default();
        let items = (0..6)
            .map(|item| model.new_bool_var(&format!("take{item}")))
            .collect::<Vec<_>>();
        let weights = [5, 4, 6, 3, 7, 2];
        let values = [10, 40, 30, 50, 35, 12];
        let weight = items
            .iter()
            .zip(weights)
            .fold(LinearExpr::default(), |sum, (&item, weight)| {
                sum + LinearExpr::from(item) * weight
            });
        let value = items
            .iter()
            .zip(values)
            .fold(LinearExpr::default(), |sum, (&item, value)| {
                sum + LinearExpr::from(item) * value
            });
        let _ = model.add_linear(weight, 0, 12);
        model.maximize(value);

        let single = CpSolver::new().solve(&model, &SolverParameters::default());
        let portfolio = CpSolver::new().solve(
            &model,
            &SolverParameters::default()
                .with_num_workers(4)
                .with_time_limit(Duration::from_secs(60)),
        );

        assert_eq!(SolverStatus::Optimal, single.status());
        assert_eq!(SolverStatus::Optimal, portfolio.status());
        assert_eq!(Some(102), single.objective_value());
        assert_eq!(single.objective_value(), portfolio.objective_value());
        assert_eq!(single.objective_value(), single.best_objective_bound());
    }
}
