//! Contains the propagators of every constraint kind.
//!
//! A propagator reads the domains in a [`crate::engine::VariableStore`], removes values which
//! cannot be part of a solution and reports an [`crate::basic_types::Inconsistency`] when its
//! constraint cannot be satisfied. Every propagator is a complete checker: once all of its
//! variables are fixed it fails exactly when the assignment violates the constraint.

mod all_different;
mod automaton;
mod bool_or;
mod circuit;
mod cumulative;
mod element;
mod linear;
mod maximum;
mod no_overlap;
mod no_overlap_2d;
mod product;
mod reservoir;
mod table;

pub use all_different::AllDifferent;
pub use automaton::Automaton;
pub use bool_or::BoolOr;
pub use circuit::Circuit;
pub use circuit::CircuitArc;
pub use cumulative::Cumulative;
pub use cumulative::CumulativeTask;
pub use element::Element;
pub use linear::LinearConstraint;
pub use maximum::Maximum;
pub use no_overlap::NoOverlap;
pub use no_overlap_2d::NoOverlap2D;
pub use no_overlap_2d::Rectangle;
pub use product::Product;
pub use reservoir::Reservoir;
pub use reservoir::ReservoirEvent;
pub use table::Table;

/// The priority of a propagator in the queue of the fixpoint engine.
///
/// Propagators with low computational complexity should be assigned a high priority (i.e.,
/// should be propagated before computationally expensive propagators).
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    #[default]
    VeryLow = 3,
}

impl Priority {
    pub(crate) const NUM_LEVELS: usize = 4;
}
