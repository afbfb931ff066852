#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use gourd_solver::api::CpSolver;
use gourd_solver::api::SolverParameters;
use gourd_solver::api::SolverStatus;
use gourd_solver::model::LinearExpr;
use gourd_solver::model::Model;
use gourd_solver::model::ModelError;
use gourd_solver::samples;
use gourd_solver::variables::DomainId;
use helpers::enumerate_solutions;

/// Six pairwise different variables over `[0, 10]`, maximising the first.
fn spread_out() -> (Model, DomainId) {
    let mut model = Model::default();
    let variables = (0..6)
        .map(|i| model.new_int_var(0, 10, &format!("x{i}")))
        .collect::<Vec<_>>();
    let _ = model.add_all_different(variables.iter().copied());
    model.maximize(variables[0]);
    (model, variables[0])
}

#[test]
fn portfolio_reaches_the_same_optimum_as_a_single_worker() {
    let distances = vec![
        vec![0, 12, 10, 19, 8, 14],
        vec![12, 0, 3, 7, 2, 11],
        vec![10, 3, 0, 6, 20, 4],
        vec![19, 7, 6, 0, 4, 9],
        vec![8, 2, 20, 4, 0, 13],
        vec![14, 11, 4, 9, 13, 0],
    ];
    let sample = samples::tsp(&distances);

    let single = CpSolver::new().solve(&sample.model, &SolverParameters::default());
    let portfolio = CpSolver::new().solve(
        &sample.model,
        &SolverParameters::default().with_num_workers(4),
    );

    assert_eq!(SolverStatus::Optimal, single.status());
    assert_eq!(SolverStatus::Optimal, portfolio.status());
    assert_eq!(single.objective_value(), portfolio.objective_value());
}

#[test]
fn portfolio_reports_strictly_improving_solutions() {
    let (model, first) = spread_out();

    let mut objective_values = Vec::new();
    let response = CpSolver::new().solve_with_callback(
        &model,
        &SolverParameters::default().with_num_workers(3),
        |solution| objective_values.push(solution.objective_value().unwrap()),
    );

    assert_eq!(SolverStatus::Optimal, response.status());
    assert_eq!(Some(10), response.value(first));
    assert_eq!(Some(&10), objective_values.last());
    assert!(objective_values.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn zero_time_limit_returns_unknown() {
    let sample = samples::n_queens(8);
    let response = CpSolver::new().solve(
        &sample.model,
        &SolverParameters::default().with_time_limit_seconds(0.0),
    );

    assert_eq!(SolverStatus::Unknown, response.status());
    assert!(response.solution().is_none());
}

#[test]
fn decision_limit_before_the_first_solution_returns_unknown() {
    let sample = samples::n_queens(8);
    let response = CpSolver::new().solve(
        &sample.model,
        &SolverParameters::default().with_decision_limit(1),
    );

    assert_eq!(SolverStatus::Unknown, response.status());
    assert_eq!(0, response.num_solutions());
}

#[test]
fn decision_limit_after_the_first_solution_returns_feasible() {
    let (model, first) = spread_out();
    let response = CpSolver::new().solve(
        &model,
        &SolverParameters::default().with_decision_limit(6),
    );

    assert_eq!(SolverStatus::Feasible, response.status());
    let value = response.value(first).unwrap();
    assert!(value < 10);
    assert_eq!(Some(value), response.objective_value());
    assert!(response.best_objective_bound().unwrap() >= value);
}

#[test]
fn overflowing_linear_constraint_fails_closed() {
    let mut model = Model::default();
    let x = model.new_int_var(0, 10, "x");
    let y = model.new_int_var(0, 10, "y");
    let _ = model.add_linear(
        LinearExpr::weighted_sum([x, y], [i64::MAX, i64::MAX]),
        i64::MIN,
        5,
    );

    let (response, solutions) = enumerate_solutions(&model);

    assert_eq!(SolverStatus::Infeasible, response.status());
    assert!(solutions.is_empty());
}

#[test]
fn overflowing_offset_makes_the_model_invalid() {
    let mut model = Model::default();
    let x = model.new_int_var(0, 0, "x");
    let _ = model.add_linear(LinearExpr::from(x) + i64::MAX + 5, i64::MAX, i64::MAX);

    let response = CpSolver::new().solve(&model, &SolverParameters::default());

    assert_eq!(SolverStatus::ModelInvalid, response.status());
    assert_eq!(
        Some(&ModelError::LinearOverflow { constraint: 0 }),
        response.model_error()
    );
}

#[test]
fn overflowing_coefficient_merge_makes_the_model_invalid() {
    let mut model = Model::default();
    let x = model.new_int_var(1, 1, "x");
    let _ = model.add_linear(LinearExpr::from(x) * i64::MAX + x, i64::MAX, i64::MAX);

    let response = CpSolver::new().solve(&model, &SolverParameters::default());

    assert_eq!(SolverStatus::ModelInvalid, response.status());
    assert!(response.solution().is_none());
}

#[test]
fn violated_enforced_constraint_forces_its_literal_false() {
    let mut model = Model::default();
    let x = model.new_int_var(0, 10, "x");
    let b = model.new_bool_var("b");
    let _ = model.add_linear(x, 5, i64::MAX).only_enforce_if([b]);
    let _ = model.add_linear(x, i64::MIN, 3);

    let (response, solutions) = enumerate_solutions(&model);

    assert_eq!(SolverStatus::Optimal, response.status());
    assert_eq!(
        vec![vec![0, 0], vec![1, 0], vec![2, 0], vec![3, 0]],
        solutions
    );
}

#[test]
fn raised_stop_handle_interrupts_the_solve() {
    let solver = CpSolver::new();
    solver.stop_handle().raise();

    let sample = samples::n_queens(8);
    let response = solver.solve(&sample.model, &SolverParameters::default());

    assert_eq!(SolverStatus::Unknown, response.status());
}

#[test]
fn invalid_models_are_reported_as_such() {
    let mut model = Model::default();
    let x = model.new_int_var(0, 3, "x");
    let _ = model.add_allowed_assignments([x], [vec![0, 1]]);

    let response = CpSolver::new().solve(&model, &SolverParameters::default());

    assert_eq!(SolverStatus::ModelInvalid, response.status());
    assert!(response.model_error().is_some());
}
