use gourd_core::api::SolutionView;
use gourd_core::model::Model;
use gourd_core::variables::DomainId;
use gourd_core::variables::TransformableVariable;

use super::Sample;

/// Places `n` queens on an `n × n` board; `queens[column]` is the row of the queen in `column`.
#[derive(Clone, Debug)]
pub struct NQueens {
    pub model: Model,
    pub queens: Vec<DomainId>,
}

pub fn n_queens(n: u32) -> NQueens {
    let mut model = Model::default();
    let upper_bound = i64::from(n) - 1;

    let queens = (0..n)
        .map(|column| model.new_int_var(0, upper_bound, &format!("queen_{column}")))
        .collect::<Vec<_>>();

    let _ = model.add_all_different(queens.iter().copied());
    let _ = model.add_all_different(
        queens
            .iter()
            .enumerate()
            .map(|(column, queen)| queen.offset(column as i64)),
    );
    let _ = model.add_all_different(
        queens
            .iter()
            .enumerate()
            .map(|(column, queen)| queen.offset(-(column as i64))),
    );

    NQueens { model, queens }
}

impl Sample for NQueens {
    fn model(&self) -> &Model {
        &self.model
    }

    fn format_solution(&self, solution: &SolutionView<'_>) -> String {
        let rows = self
            .queens
            .iter()
            .filter_map(|&queen| solution.value(queen))
            .collect::<Vec<_>>();

        (0..rows.len() as i64)
            .map(|row| {
                rows.iter()
                    .map(|&queen_row| if queen_row == row { 'Q' } else { '.' })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
