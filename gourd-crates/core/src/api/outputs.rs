use std::fmt::Display;
use std::time::Duration;

use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;
use crate::engine::SolverStatistics;
use crate::model::LinearExpr;
use crate::model::ModelError;
use crate::statistics::log_statistic;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The conclusion of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverStatus {
    /// The reported solution is optimal, or (without an objective) a solution was found.
    Optimal,
    /// A solution was found but the search was interrupted before proving optimality.
    Feasible,
    /// The model has no solution.
    Infeasible,
    /// The search was interrupted before finding a solution.
    Unknown,
    /// The model failed validation, or a propagator misbehaved.
    ModelInvalid,
}

impl SolverStatus {
    pub fn has_solution(&self) -> bool {
        matches!(self, SolverStatus::Optimal | SolverStatus::Feasible)
    }
}

impl Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SolverStatus::Optimal => "OPTIMAL",
            SolverStatus::Feasible => "FEASIBLE",
            SolverStatus::Infeasible => "INFEASIBLE",
            SolverStatus::Unknown => "UNKNOWN",
            SolverStatus::ModelInvalid => "MODEL_INVALID",
        };
        write!(f, "{name}")
    }
}

/// An immutable view on one complete assignment, handed to solution callbacks.
#[derive(Debug, Clone, Copy)]
pub struct SolutionView<'a> {
    values: &'a [i64],
    objective_value: Option<i64>,
    solution_index: u64,
    wall_time: Duration,
}

impl<'a> SolutionView<'a> {
    pub(crate) fn new(
        values: &'a [i64],
        objective_value: Option<i64>,
        solution_index: u64,
        wall_time: Duration,
    ) -> Self {
        SolutionView {
            values,
            objective_value,
            solution_index,
            wall_time,
        }
    }

    /// The value of `variable`; [`None`] for variables not in the model.
    pub fn value(&self, variable: DomainId) -> Option<i64> {
        self.values.get(variable.id() as usize).copied()
    }

    pub fn boolean_value(&self, literal: Literal) -> Option<bool> {
        self.value(literal.variable())
            .map(|value| literal.evaluate(&|_: DomainId| value))
    }

    /// The value of `expression`, or [`None`] if it refers to unknown variables, overflowed while
    /// being built or does not fit in an `i64`.
    pub fn expression_value(&self, expression: impl Into<LinearExpr>) -> Option<i64> {
        let expression = expression.into();
        if expression.has_overflowed()
            || expression
                .terms()
                .iter()
                .any(|&(_, variable)| self.value(variable).is_none())
        {
            return None;
        }

        let value = expression.evaluate(&|variable| self.values[variable.id() as usize]);
        i64::try_from(value).ok()
    }

    /// The objective value of the solution, if the model has an objective.
    pub fn objective_value(&self) -> Option<i64> {
        self.objective_value
    }

    /// The values of all variables, indexed by [`DomainId::id`].
    pub fn values(&self) -> &'a [i64] {
        self.values
    }

    /// How many solutions were reported before this one.
    pub fn solution_index(&self) -> u64 {
        self.solution_index
    }

    /// The time since the solve started.
    pub fn wall_time(&self) -> Duration {
        self.wall_time
    }
}

/// The result of [`CpSolver::solve`](super::CpSolver::solve).
#[derive(Debug, Clone)]
pub struct SolveResponse {
    pub(crate) status: SolverStatus,
    pub(crate) objective_value: Option<i64>,
    pub(crate) best_objective_bound: Option<i64>,
    pub(crate) solution: Option<Vec<i64>>,
    pub(crate) num_solutions: u64,
    pub(crate) statistics: SolverStatistics,
    pub(crate) wall_time: Duration,
    pub(crate) model_error: Option<ModelError>,
}

impl SolveResponse {
    pub(crate) fn model_invalid(model_error: Option<ModelError>, wall_time: Duration) -> Self {
        SolveResponse {
            status: SolverStatus::ModelInvalid,
            objective_value: None,
            best_objective_bound: None,
            solution: None,
            num_solutions: 0,
            statistics: SolverStatistics::default(),
            wall_time,
            model_error,
        }
    }

    pub fn status(&self) -> SolverStatus {
        self.status
    }

    /// The objective value of the best solution found.
    pub fn objective_value(&self) -> Option<i64> {
        self.objective_value
    }

    /// A bound no solution can improve on: the objective value when optimal, otherwise the bound
    /// proven by the root propagation.
    pub fn best_objective_bound(&self) -> Option<i64> {
        self.best_objective_bound
    }

    /// The best (or, without an objective, the last) solution found.
    pub fn solution(&self) -> Option<SolutionView<'_>> {
        self.solution.as_deref().map(|values| {
            SolutionView::new(
                values,
                self.objective_value,
                self.num_solutions.saturating_sub(1),
                self.wall_time,
            )
        })
    }

    pub fn value(&self, variable: DomainId) -> Option<i64> {
        self.solution()?.value(variable)
    }

    pub fn boolean_value(&self, literal: Literal) -> Option<bool> {
        self.solution()?.boolean_value(literal)
    }

    pub fn expression_value(&self, expression: impl Into<LinearExpr>) -> Option<i64> {
        self.solution()?.expression_value(expression)
    }

    /// The number of solutions reported to the callback.
    pub fn num_solutions(&self) -> u64 {
        self.num_solutions
    }

    /// The counters of all workers, merged.
    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    pub fn wall_time(&self) -> Duration {
        self.wall_time
    }

    /// Why the model was rejected, if it was rejected during validation.
    pub fn model_error(&self) -> Option<&ModelError> {
        self.model_error.as_ref()
    }

    /// Writes the status, objective and counters through the statistic logger, if statistic
    /// logging is enabled.
    pub fn log_statistics(&self) {
        if !should_log_statistics() {
            return;
        }

        log_statistic("status", self.status);
        if let Some(objective_value) = self.objective_value {
            log_statistic("objective", objective_value);
        }
        if let Some(bound) = self.best_objective_bound {
            log_statistic("objectiveBound", bound);
        }
        log_statistic("numberOfSolutions", self.num_solutions);
        log_statistic("wallTimeMs", self.wall_time.as_millis());
        self.statistics.log(StatisticLogger::default());
        log_statistic_postfix();
    }
}
