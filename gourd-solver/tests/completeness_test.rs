#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use gourd_solver::api::CpSolver;
use gourd_solver::api::SolverParameters;
use gourd_solver::api::SolverStatus;
use gourd_solver::model::LinearExpr;
use gourd_solver::model::Model;
use gourd_solver::samples;
use gourd_solver::samples::Sample;
use gourd_solver::variables::AffineView;
use gourd_solver::variables::DomainId;
use gourd_solver::variables::IntervalVar;
use helpers::enumerate_solutions;
use helpers::satisfies_all_constraints;

/// Eight variables over `[0, 3]` tied together by a mix of constraint kinds.
fn small_csp() -> (Model, [DomainId; 8]) {
    let mut model = Model::default();
    let x: [DomainId; 8] = std::array::from_fn(|i| model.new_int_var(0, 3, &format!("x{i}")));

    let _ = model.add_all_different([x[0], x[1], x[2]]);
    let _ = model.add_linear(LinearExpr::from(x[3]) + x[4], 0, 4);
    let _ = model.add_not_equal(x[5], x[6]);
    let _ = model.add_element(x[7], [x[0], x[1], x[2], x[3]], x[5]);
    let _ = model.add_allowed_assignments(
        [x[3], x[6]],
        [vec![0, 1], vec![1, 2], vec![2, 3], vec![3, 0], vec![1, 1]],
    );
    let _ = model.add_max_equality(x[4], [x[0], x[7]]);

    (model, x)
}

/// The same constraints as [`small_csp`], evaluated directly.
fn brute_force_small_csp() -> Vec<Vec<i64>> {
    let allowed = [(0, 1), (1, 2), (2, 3), (3, 0), (1, 1)];

    let mut solutions = Vec::new();
    for code in 0..4_i64.pow(8) {
        let x: Vec<i64> = (0..8).map(|i| (code / 4_i64.pow(i)) % 4).collect();

        let all_different = x[0] != x[1] && x[0] != x[2] && x[1] != x[2];
        let linear = x[3] + x[4] <= 4;
        let not_equal = x[5] != x[6];
        let element = x[x[7] as usize] == x[5];
        let table = allowed.contains(&(x[3], x[6]));
        let maximum = x[4] == x[0].max(x[7]);

        if all_different && linear && not_equal && element && table && maximum {
            solutions.push(x);
        }
    }
    solutions.sort();
    solutions
}

#[test]
fn enumeration_matches_brute_force() {
    let (model, _) = small_csp();
    let (response, solutions) = enumerate_solutions(&model);

    let expected = brute_force_small_csp();
    assert!(!expected.is_empty());
    assert_eq!(expected, solutions);
    assert_eq!(expected.len() as u64, response.num_solutions());
    assert_eq!(SolverStatus::Optimal, response.status());
}

#[test]
fn enumeration_matches_brute_force_for_every_search_strategy() {
    use gourd_solver::api::ValueSelection;
    use gourd_solver::api::VariableSelection;

    let (model, _) = small_csp();
    let expected = brute_force_small_csp();

    for variable_selection in [
        VariableSelection::InputOrder,
        VariableSelection::FirstFail,
        VariableSelection::AntiFirstFail,
        VariableSelection::Random,
    ] {
        for value_selection in [
            ValueSelection::Min,
            ValueSelection::Max,
            ValueSelection::Split,
            ValueSelection::ReverseSplit,
            ValueSelection::Random,
        ] {
            let mut solutions = Vec::new();
            let _ = CpSolver::new().solve_with_callback(
                &model,
                &SolverParameters::default()
                    .with_enumerate_all_solutions(true)
                    .with_search_strategy(variable_selection, value_selection),
                |solution| solutions.push(solution.values().to_vec()),
            );
            solutions.sort();

            assert_eq!(
                expected, solutions,
                "strategy {variable_selection:?}/{value_selection:?}"
            );
        }
    }
}

#[test]
fn every_enumerated_solution_satisfies_the_model() {
    let (model, _) = small_csp();
    let (_, solutions) = enumerate_solutions(&model);

    for solution in solutions {
        assert!(satisfies_all_constraints(&model, &solution), "{solution:?}");
    }
}

/// Every assignment within `domains`, in lexicographic order.
fn all_assignments(domains: &[(i64, i64)]) -> Vec<Vec<i64>> {
    domains
        .iter()
        .fold(vec![Vec::new()], |prefixes, &(lower_bound, upper_bound)| {
            prefixes
                .iter()
                .flat_map(|prefix| {
                    (lower_bound..=upper_bound).map(move |value| {
                        let mut assignment = prefix.clone();
                        assignment.push(value);
                        assignment
                    })
                })
                .collect()
        })
}

/// Enumerates `model` under several search strategies and compares the solutions with the
/// assignments of `domains` (one entry per variable, in creation order) accepted by `holds`.
fn assert_enumeration_matches(
    model: &Model,
    domains: &[(i64, i64)],
    holds: impl Fn(&[i64]) -> bool,
) {
    use gourd_solver::api::ValueSelection;
    use gourd_solver::api::VariableSelection;

    let candidates = all_assignments(domains);
    let expected = candidates
        .iter()
        .filter(|assignment| holds(assignment.as_slice()))
        .cloned()
        .collect::<Vec<_>>();
    assert!(!expected.is_empty());
    assert!(expected.len() < candidates.len());

    for (variable_selection, value_selection) in [
        (VariableSelection::InputOrder, ValueSelection::Min),
        (VariableSelection::FirstFail, ValueSelection::Max),
        (VariableSelection::AntiFirstFail, ValueSelection::Split),
    ] {
        let mut solutions = Vec::new();
        let response = CpSolver::new().solve_with_callback(
            model,
            &SolverParameters::default()
                .with_enumerate_all_solutions(true)
                .with_search_strategy(variable_selection, value_selection),
            |solution| solutions.push(solution.values().to_vec()),
        );
        solutions.sort();

        assert_eq!(SolverStatus::Optimal, response.status());
        assert_eq!(
            expected, solutions,
            "strategy {variable_selection:?}/{value_selection:?}"
        );
    }
}

#[test]
fn cumulative_enumeration_matches_brute_force() {
    let sizes = [2, 1, 2];
    let mut model = Model::default();
    let starts: [DomainId; 3] = std::array::from_fn(|i| model.new_int_var(0, 3, &format!("s{i}")));
    let demand = model.new_int_var(1, 2, "demand");
    let tasks = (0..3)
        .map(|i| model.new_fixed_size_interval_var(starts[i], sizes[i], &format!("task{i}")))
        .collect::<Vec<_>>();
    let _ = model.add_cumulative(
        tasks,
        [AffineView::from(2), AffineView::from(1), AffineView::from(demand)],
        3,
    );

    assert_enumeration_matches(&model, &[(0, 3), (0, 3), (0, 3), (1, 2)], |x| {
        let tasks = [(x[0], 2, 2), (x[1], 1, 1), (x[2], 2, x[3])];
        (0..6).all(|time| {
            tasks
                .iter()
                .filter(|&&(start, size, _)| start <= time && time < start + size)
                .map(|&(_, _, demand)| demand)
                .sum::<i64>()
                <= 3
        })
    });
}

/// Whether the level after every active event, counting all events up to its time, is within
/// `[min_level, max_level]`.
fn reservoir_holds(events: &[(i64, i64)], min_level: i64, max_level: i64) -> bool {
    events.iter().all(|&(time, _)| {
        let level = events
            .iter()
            .filter(|&&(other, _)| other <= time)
            .map(|&(_, change)| change)
            .sum::<i64>();
        (min_level..=max_level).contains(&level)
    })
}

#[test]
fn reservoir_enumeration_matches_brute_force() {
    let changes = [2, -1, -1];
    let mut model = Model::default();
    let times: [DomainId; 3] = std::array::from_fn(|i| model.new_int_var(0, 3, &format!("t{i}")));
    let _ = model.add_reservoir(times, changes, 0, 2);

    assert_enumeration_matches(&model, &[(0, 3); 3], |x| {
        let events = (0..3).map(|i| (x[i], changes[i])).collect::<Vec<_>>();
        reservoir_holds(&events, 0, 2)
    });
}

#[test]
fn reservoir_with_optional_events_matches_brute_force() {
    let changes = [1, 1, -1];
    let mut model = Model::default();
    let times: [DomainId; 3] = std::array::from_fn(|i| model.new_int_var(0, 2, &format!("t{i}")));
    let actives: [_; 3] = std::array::from_fn(|i| model.new_bool_var(&format!("active{i}")));
    let _ = model.add_reservoir_with_active(times, changes, actives, 0, 1);

    let mut domains = vec![(0, 2); 3];
    domains.extend([(0, 1); 3]);
    assert_enumeration_matches(&model, &domains, |x| {
        let events = (0..3)
            .filter(|&i| x[3 + i] == 1)
            .map(|i| (x[i], changes[i]))
            .collect::<Vec<_>>();
        reservoir_holds(&events, 0, 1)
    });
}

#[test]
fn no_overlap_2d_enumeration_matches_brute_force() {
    let widths = [2, 1, 2];
    let heights = [1, 2, 2];
    let mut model = Model::default();
    let xs: [DomainId; 3] = std::array::from_fn(|i| model.new_int_var(0, 2, &format!("x{i}")));
    let ys: [DomainId; 3] = std::array::from_fn(|i| model.new_int_var(0, 1, &format!("y{i}")));
    let x_intervals: Vec<IntervalVar> = (0..3)
        .map(|i| model.new_fixed_size_interval_var(xs[i], widths[i], &format!("width{i}")))
        .collect();
    let y_intervals: Vec<IntervalVar> = (0..3)
        .map(|i| model.new_fixed_size_interval_var(ys[i], heights[i], &format!("height{i}")))
        .collect();
    let _ = model.add_no_overlap_2d(x_intervals, y_intervals);

    let mut domains = vec![(0, 2); 3];
    domains.extend([(0, 1); 3]);
    assert_enumeration_matches(&model, &domains, |x| {
        let rectangles = (0..3)
            .map(|i| (x[i], x[i] + widths[i], x[3 + i], x[3 + i] + heights[i]))
            .collect::<Vec<_>>();
        rectangles.iter().enumerate().all(|(i, a)| {
            rectangles[i + 1..]
                .iter()
                .all(|b| a.1 <= b.0 || b.1 <= a.0 || a.3 <= b.2 || b.3 <= a.2)
        })
    });
}

#[test]
fn automaton_enumeration_matches_brute_force() {
    let mut model = Model::default();
    let word: [DomainId; 5] = std::array::from_fn(|i| model.new_int_var(0, 2, &format!("w{i}")));
    // State 1 means the last letter was a 2; two 2s in a row have no transition.
    let _ = model.add_automaton(
        word,
        0,
        [0],
        [(0, 0, 0), (0, 1, 0), (0, 2, 1), (1, 0, 0), (1, 1, 0)],
    );

    assert_enumeration_matches(&model, &[(0, 2); 5], |x| {
        x.windows(2).all(|pair| pair[0] != 2 || pair[1] != 2) && x[4] != 2
    });
}

#[test]
fn optional_intervals_with_enforcement_match_brute_force() {
    let mut model = Model::default();
    let first_start = model.new_int_var(0, 3, "first_start");
    let first_present = model.new_bool_var("first_present");
    let second_start = model.new_int_var(0, 3, "second_start");
    let second_size = model.new_int_var(1, 2, "second_size");
    let second_end = model.new_int_var(0, 4, "second_end");
    let second_present = model.new_bool_var("second_present");
    let separated = model.new_bool_var("separated");

    let first =
        model.new_optional_fixed_size_interval_var(first_start, 2, first_present, "first");
    let second = model.new_optional_interval_var(
        second_start,
        second_size,
        second_end,
        second_present,
        "second",
    );
    let _ = model
        .add_no_overlap([first, second])
        .only_enforce_if([separated]);
    let _ = model.add_bool_or([first_present, second_present]);
    let _ = model
        .add_linear(first_start, 0, 1)
        .only_enforce_if([!separated]);

    let domains = [(0, 3), (0, 1), (0, 3), (1, 2), (0, 4), (0, 1), (0, 1)];
    assert_enumeration_matches(&model, &domains, |x| {
        let (first_start, first_present) = (x[0], x[1] == 1);
        let (second_start, second_size) = (x[2], x[3]);
        let (second_end, second_present) = (x[4], x[5] == 1);
        let separated = x[6] == 1;

        let length = !second_present || second_start + second_size == second_end;
        let disjoint = !separated
            || !first_present
            || !second_present
            || first_start + 2 <= second_start
            || second_end <= first_start;
        let early = separated || first_start <= 1;

        length && disjoint && (first_present || second_present) && early
    });
}

#[test]
fn sample_solutions_satisfy_their_models() {
    let models = [
        samples::n_queens(6).model().clone(),
        samples::send_more_money().model().clone(),
        samples::bin_packing(&[3, 5, 2], 10).model().clone(),
        samples::tsp(&[
            vec![0, 3, 9, 4, 7],
            vec![3, 0, 5, 8, 2],
            vec![9, 5, 0, 6, 4],
            vec![4, 8, 6, 0, 5],
            vec![7, 2, 4, 5, 0],
        ])
        .model()
        .clone(),
    ];

    for model in &models {
        let mut reported = Vec::new();
        let response = CpSolver::new().solve_with_callback(
            model,
            &SolverParameters::default(),
            |solution| reported.push(solution.values().to_vec()),
        );

        assert!(response.status().has_solution());
        for values in &reported {
            assert!(satisfies_all_constraints(model, values));
        }
    }
}

#[test]
fn tsp_finds_the_shortest_tour() {
    let distances = vec![
        vec![0, 3, 9, 4, 7],
        vec![3, 0, 5, 8, 2],
        vec![9, 5, 0, 6, 4],
        vec![4, 8, 6, 0, 5],
        vec![7, 2, 4, 5, 0],
    ];
    let sample = samples::tsp(&distances);
    let response = CpSolver::new().solve(&sample.model, &SolverParameters::default());

    // Every tour starts and ends in city 0; the other cities can be visited in any order.
    let mut best = i64::MAX;
    let mut permutation = vec![1, 2, 3, 4];
    permutations(&mut permutation, 0, &mut |order| {
        let mut length = distances[0][order[0]] + distances[order[order.len() - 1]][0];
        for pair in order.windows(2) {
            length += distances[pair[0]][pair[1]];
        }
        best = best.min(length);
    });

    assert_eq!(SolverStatus::Optimal, response.status());
    assert_eq!(Some(best), response.objective_value());
}

fn permutations(items: &mut Vec<usize>, start: usize, visit: &mut impl FnMut(&[usize])) {
    if start == items.len() {
        visit(items);
        return;
    }
    for i in start..items.len() {
        items.swap(start, i);
        permutations(items, start + 1, visit);
        items.swap(start, i);
    }
}
