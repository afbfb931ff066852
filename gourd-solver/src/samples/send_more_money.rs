use gourd_core::api::SolutionView;
use gourd_core::model::LinearExpr;
use gourd_core::model::Model;
use gourd_core::variables::DomainId;

use super::Sample;

/// The cryptarithm `SEND + MORE = MONEY`, where every letter is a distinct digit and the leading
/// digits are non-zero.
#[derive(Clone, Debug)]
pub struct SendMoreMoney {
    pub model: Model,
    /// The digits of `S, E, N, D, M, O, R, Y` in that order.
    pub letters: [DomainId; 8],
}

pub fn send_more_money() -> SendMoreMoney {
    let mut model = Model::default();

    let letters = ["S", "E", "N", "D", "M", "O", "R", "Y"].map(|name| {
        let lower_bound = if matches!(name, "S" | "M") { 1 } else { 0 };
        model.new_int_var(lower_bound, 9, name)
    });
    let [s, e, n, d, m, o, r, y] = letters;

    let _ = model.add_all_different(letters);

    let send = LinearExpr::weighted_sum([s, e, n, d], [1000, 100, 10, 1]);
    let more = LinearExpr::weighted_sum([m, o, r, e], [1000, 100, 10, 1]);
    let money = LinearExpr::weighted_sum([m, o, n, e, y], [10000, 1000, 100, 10, 1]);
    let _ = model.add_equality(send + more, money);

    SendMoreMoney { model, letters }
}

impl Sample for SendMoreMoney {
    fn model(&self) -> &Model {
        &self.model
    }

    fn format_solution(&self, solution: &SolutionView<'_>) -> String {
        let digit = |index: usize| {
            solution
                .value(self.letters[index])
                .map_or_else(|| "?".to_owned(), |value| value.to_string())
        };
        let word = |indices: &[usize]| {
            indices
                .iter()
                .map(|&index| digit(index))
                .collect::<String>()
        };

        format!(
            "{} + {} = {}",
            word(&[0, 1, 2, 3]),
            word(&[4, 5, 6, 1]),
            word(&[4, 5, 2, 1, 7])
        )
    }
}
