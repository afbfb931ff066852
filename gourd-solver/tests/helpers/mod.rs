//! Helpers shared by the integration tests.
#![allow(
    dead_code,
    reason = "every integration test binary only uses some of the helpers"
)]

use gourd_solver::api::CpSolver;
use gourd_solver::api::SolveResponse;
use gourd_solver::api::SolverParameters;
use gourd_solver::model::Model;

/// Enumerates all solutions of `model`, returning them sorted.
pub(crate) fn enumerate_solutions(model: &Model) -> (SolveResponse, Vec<Vec<i64>>) {
    let mut solutions = Vec::new();
    let response = CpSolver::new().solve_with_callback(
        model,
        &SolverParameters::default().with_enumerate_all_solutions(true),
        |solution| solutions.push(solution.values().to_vec()),
    );
    solutions.sort();
    (response, solutions)
}

/// Whether every constraint record of `model` holds under `values`.
pub(crate) fn satisfies_all_constraints(model: &Model, values: &[i64]) -> bool {
    model
        .constraints()
        .iter()
        .all(|record| record.is_satisfied(&|variable| values[variable.id() as usize]))
}
