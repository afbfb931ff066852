//! Atomic constraints over a single variable, used as search decisions.

mod predicate;
mod predicate_constructor;

pub use predicate::Predicate;
pub use predicate_constructor::PredicateConstructor;
