//! A variable, in the context of the solver, is a view onto a domain held by the
//! [`VariableStore`](crate::engine::VariableStore). It may forward domain information unaltered, or
//! apply an affine transformation which can be performed without the need of constraints.

mod affine_view;
mod domain_id;
mod integer_variable;
mod interval_var;
mod literal;
mod transformable_variable;

pub use affine_view::AffineView;
pub use domain_id::DomainId;
pub use integer_variable::IntegerVariable;
pub use interval_var::IntervalVar;
pub use literal::Literal;
pub use transformable_variable::TransformableVariable;
