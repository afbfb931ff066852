use gourd_core::api::SolutionView;
use gourd_core::model::LinearExpr;
use gourd_core::model::Model;
use gourd_core::variables::Literal;

use super::Sample;

/// A travelling salesperson tour through all cities of a square distance matrix, minimising the
/// total distance.
#[derive(Clone, Debug)]
pub struct Tsp {
    pub model: Model,
    /// The arcs `(from, to, literal)` between distinct cities.
    pub arcs: Vec<(usize, usize, Literal)>,
}

/// Builds the model; `distances[from][to]` is the length of the arc, and rows shorter than the
/// number of cities leave the missing arcs out.
pub fn tsp(distances: &[Vec<i64>]) -> Tsp {
    let mut model = Model::default();

    let arcs = distances
        .iter()
        .enumerate()
        .flat_map(|(from, row)| {
            row.iter()
                .enumerate()
                .filter(move |&(to, _)| to != from)
                .map(move |(to, _)| (from, to))
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|(from, to)| (from, to, model.new_bool_var(&format!("arc_{from}_{to}"))))
        .collect::<Vec<_>>();

    let _ = model.add_circuit(arcs.iter().copied());

    let length = LinearExpr::new(
        arcs.iter()
            .map(|&(from, to, literal)| (distances[from][to], literal.variable())),
        0,
    );
    model.minimize(length);

    Tsp { model, arcs }
}

impl Sample for Tsp {
    fn model(&self) -> &Model {
        &self.model
    }

    fn format_solution(&self, solution: &SolutionView<'_>) -> String {
        let successor = |city: usize| {
            self.arcs
                .iter()
                .find(|&&(from, _, literal)| {
                    from == city && solution.boolean_value(literal) == Some(true)
                })
                .map(|&(_, to, _)| to)
        };

        let mut tour = vec![0];
        let mut current = 0;
        while let Some(next) = successor(current) {
            if next == 0 || tour.len() > self.arcs.len() {
                break;
            }
            tour.push(next);
            current = next;
        }
        tour.push(0);

        let tour = tour
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        match solution.objective_value() {
            Some(length) => format!("tour: {tour}, length: {length}"),
            None => format!("tour: {tour}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use gourd_core::api::CpSolver;
    use gourd_core::api::SolverParameters;
    use gourd_core::api::SolverStatus;

    use super::*;

    #[test]
    fn the_shortest_tour_goes_around_the_square() {
        // Four corners of a square with side 1 (distances scaled by 10); the diagonals are longer.
        let distances = vec![
            vec![0, 10, 14, 10],
            vec![10, 0, 10, 14],
            vec![14, 10, 0, 10],
            vec![10, 14, 10, 0],
        ];
        let sample = tsp(&distances);
        let response = CpSolver::new().solve(&sample.model, &SolverParameters::default());

        assert_eq!(SolverStatus::Optimal, response.status());
        assert_eq!(Some(40), response.objective_value());

        let tour = sample.format_solution(&response.solution().unwrap());
        assert!(
            tour == "tour: 0 -> 1 -> 2 -> 3 -> 0, length: 40"
                || tour == "tour: 0 -> 3 -> 2 -> 1 -> 0, length: 40"
        );
    }
}
