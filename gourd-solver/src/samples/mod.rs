//! Small, well-known models which exercise the different constraint kinds of the solver.
//!
//! Every builder returns a struct holding the [`Model`] together with the variables of interest,
//! so a caller can solve it and read the answer back from a [`SolutionView`].

mod bin_packing;
mod job_shop;
mod n_queens;
mod send_more_money;
mod tsp;

pub use bin_packing::bin_packing;
pub use bin_packing::BinPacking;
pub use job_shop::job_shop;
pub use job_shop::JobShop;
pub use job_shop::Operation;
pub use n_queens::n_queens;
pub use n_queens::NQueens;
pub use send_more_money::send_more_money;
pub use send_more_money::SendMoreMoney;
pub use tsp::tsp;
pub use tsp::Tsp;

use gourd_core::api::SolutionView;
use gourd_core::model::Model;

/// A sample model which knows how to present its solutions.
pub trait Sample {
    fn model(&self) -> &Model;

    /// A human readable rendition of the solution.
    fn format_solution(&self, solution: &SolutionView<'_>) -> String;
}
