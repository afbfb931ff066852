use gourd_core::api::SolutionView;
use gourd_core::model::LinearExpr;
use gourd_core::model::Model;
use gourd_core::variables::DomainId;
use gourd_core::variables::Literal;

use super::Sample;

/// Packs every item into a single bin of the given capacity.
///
/// The load of the bin is the weighted sum of the items which are packed, and all items have to be
/// packed; the model is infeasible exactly when the total weight exceeds the capacity.
#[derive(Clone, Debug)]
pub struct BinPacking {
    pub model: Model,
    /// Whether item `i` is in the bin.
    pub packed: Vec<Literal>,
    pub load: DomainId,
}

pub fn bin_packing(weights: &[i64], capacity: i64) -> BinPacking {
    let mut model = Model::default();

    let packed = (0..weights.len())
        .map(|item| model.new_bool_var(&format!("packed_{item}")))
        .collect::<Vec<_>>();
    let load = model.new_int_var(0, capacity.max(0), "load");

    let contents = LinearExpr::weighted_sum(
        packed.iter().map(|literal| literal.variable()),
        weights.iter().copied(),
    );
    let _ = model.add_equality(contents, load);
    let _ = model.add_bool_and(packed.iter().copied());

    BinPacking {
        model,
        packed,
        load,
    }
}

impl Sample for BinPacking {
    fn model(&self) -> &Model {
        &self.model
    }

    fn format_solution(&self, solution: &SolutionView<'_>) -> String {
        let items = self
            .packed
            .iter()
            .enumerate()
            .filter(|(_, literal)| solution.boolean_value(**literal) == Some(true))
            .map(|(item, _)| item.to_string())
            .collect::<Vec<_>>();

        format!(
            "bin: [{}], load: {}",
            items.join(", "),
            solution
                .value(self.load)
                .map_or_else(|| "?".to_owned(), |load| load.to_string())
        )
    }
}
