//! Tie-breakers decide between variables which a selection strategy values equally.
mod in_order_tie_breaker;

pub use in_order_tie_breaker::InOrderTieBreaker;

/// Whether the tie-breaker looks for the variable with the largest or the smallest value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Maximum,
    Minimum,
}

/// A trait for tie-breaking between variables whose values are compared by a selector.
pub trait TieBreaker<Var, Value> {
    /// Offers `variable` with its `value`; the best one offered so far is kept.
    fn consider(&mut self, variable: Var, value: Value);

    /// Returns the selected variable and resets the tie-breaker for the next selection.
    fn select(&mut self) -> Option<Var>;

    fn get_direction(&self) -> Direction;
}
