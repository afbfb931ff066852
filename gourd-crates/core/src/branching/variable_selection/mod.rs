//! Strategies for choosing the next variable to branch on.
mod anti_first_fail;
mod first_fail;
mod input_order;
mod random;
mod variable_selector;

pub use anti_first_fail::AntiFirstFail;
pub use first_fail::FirstFail;
pub use input_order::InputOrder;
pub use random::RandomSelector;
pub use variable_selector::VariableSelector;
